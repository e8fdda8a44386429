//! Degree-granular sine/cosine lookup.
//!
//! The table keeps its own scale, [`TRIG_ONE`], independent of the
//! position scale in [`super::fixed`]. Values come back as [`TrigFixed`] so
//! they cannot be added to a [`Fixed`](super::Fixed) by accident; the only
//! bridge is [`FixedVec::rotated`](super::FixedVec::rotated).

use once_cell::sync::Lazy;

/// Bits of fraction in a table entry.
pub const TRIG_SHIFT: u32 = 14;
/// Raw table value of 1.0.
pub const TRIG_ONE: i32 = 1 << TRIG_SHIFT;

const DEGREES: usize = 360;

/// A sine or cosine in table scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrigFixed(i32);

impl TrigFixed {
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

struct TrigTable {
    sin: [i32; DEGREES],
    cos: [i32; DEGREES],
}

impl TrigTable {
    fn build() -> Self {
        let mut sin = [0; DEGREES];
        let mut cos = [0; DEGREES];
        for deg in 0..DEGREES {
            let (s, c) = (deg as f64).to_radians().sin_cos();
            sin[deg] = (s * f64::from(TRIG_ONE)).round() as i32;
            cos[deg] = (c * f64::from(TRIG_ONE)).round() as i32;
        }
        Self { sin, cos }
    }
}

static TABLE: Lazy<TrigTable> = Lazy::new(TrigTable::build);

/// Fold any whole-degree angle into `0..360` (`-3` → `357`).
#[inline]
pub fn normalize_degrees(deg: i32) -> usize {
    deg.rem_euclid(DEGREES as i32) as usize
}

#[inline]
pub fn sin(deg: i32) -> TrigFixed {
    TrigFixed(TABLE.sin[normalize_degrees(deg)])
}

#[inline]
pub fn cos(deg: i32) -> TrigFixed {
    TrigFixed(TABLE.cos[normalize_degrees(deg)])
}
