//! Position-space fixed point.
//!
//! Everything the camera and the ray-caster touch is an `i32` scaled by
//! [`FIXED_ONE`] (1.0 ≡ 1024). Products are widened to `i64` before the
//! shift so a `dir * step` or `plane * cameraX` never wraps.

use std::ops::{Add, Mul, Neg, Sub};

use glam::IVec2;

use super::trig::{TRIG_SHIFT, TrigFixed};

/// Bits of fraction in a [`Fixed`].
pub const FIXED_SHIFT: u32 = 10;
/// Raw value of 1.0.
pub const FIXED_ONE: i32 = 1 << FIXED_SHIFT;

/// A 22.10 fixed-point scalar in map units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed(i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(FIXED_ONE);

    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Whole map units, e.g. a tile index.
    #[inline]
    pub const fn from_int(n: i32) -> Self {
        Self(n << FIXED_SHIFT)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Index of the tile containing this coordinate (floor, not truncation).
    #[inline]
    pub const fn tile(self) -> i32 {
        self.0 >> FIXED_SHIFT
    }

    /// Distance from the low edge of the containing tile, `0 ..FIXED_ONE`.
    #[inline]
    pub const fn frac(self) -> i32 {
        self.0 - (self.tile() << FIXED_SHIFT)
    }

}

impl Add for Fixed {
    type Output = Fixed;
    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 + rhs.0)
    }
}

/// Both operands in position scale; the product is widened before the shift.
impl Mul for Fixed {
    type Output = Fixed;
    #[inline]
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed(((i64::from(self.0) * i64::from(rhs.0)) >> FIXED_SHIFT) as i32)
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 - rhs.0)
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    #[inline]
    fn neg(self) -> Fixed {
        Fixed(-self.0)
    }
}

/// Two [`Fixed`] components: a map position or a direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FixedVec {
    pub x: Fixed,
    pub y: Fixed,
}

impl FixedVec {
    #[inline]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn from_raw(x: i32, y: i32) -> Self {
        Self::new(Fixed::from_raw(x), Fixed::from_raw(y))
    }

    /// Lower-left corner of tile `t`.
    #[inline]
    pub const fn from_tile(t: IVec2) -> Self {
        Self::new(Fixed::from_int(t.x), Fixed::from_int(t.y))
    }

    #[inline]
    pub const fn tile(self) -> IVec2 {
        IVec2::new(self.x.tile(), self.y.tile())
    }

    /// Component-wise multiply by a position-scale scalar.
    #[inline]
    pub fn scale(self, s: Fixed) -> FixedVec {
        FixedVec::new(self.x * s, self.y * s)
    }

    /// The vector turned a quarter clockwise: `(x, y) -> (y, -x)`.
    ///
    /// For a camera this is the side the plane vector points to.
    #[inline]
    pub fn perp_right(self) -> FixedVec {
        FixedVec::new(self.y, -self.x)
    }

    /// Apply the rotation matrix given by a table `cos`/`sin` pair.
    ///
    /// The table lives in its own scale; the `>> TRIG_SHIFT` is the one
    /// place the two scales meet, and it lands back in position scale.
    /// Both outputs are computed from the old components.
    pub fn rotated(self, cos: TrigFixed, sin: TrigFixed) -> FixedVec {
        let (x, y) = (i64::from(self.x.raw()), i64::from(self.y.raw()));
        let (c, s) = (i64::from(cos.raw()), i64::from(sin.raw()));
        FixedVec::from_raw(
            ((x * c - y * s) >> TRIG_SHIFT) as i32,
            ((x * s + y * c) >> TRIG_SHIFT) as i32,
        )
    }
}

impl Add for FixedVec {
    type Output = FixedVec;
    #[inline]
    fn add(self, rhs: FixedVec) -> FixedVec {
        FixedVec::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Neg for FixedVec {
    type Output = FixedVec;
    #[inline]
    fn neg(self) -> FixedVec {
        FixedVec::new(-self.x, -self.y)
    }
}
