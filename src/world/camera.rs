use glam::IVec2;
use tracing::debug;

use super::Map;
use crate::math::{Fixed, FixedVec, trig};

/// Rotation direction for [`Camera::rotate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

impl Turn {
    /// Signed angle for a `step`-degree turn.
    ///
    /// The plane vector points to screen-right, a clockwise quarter turn
    /// from `dir`, so turning right is a negative (clockwise) rotation.
    #[inline]
    pub const fn degrees(self, step: i32) -> i32 {
        match self {
            Turn::Left => step,
            Turn::Right => -step,
        }
    }
}

/// Forward/backward along the view direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Travel {
    Forward,
    Backward,
}

/// Sideways, relative to the view direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strafe {
    Left,
    Right,
}

/// Player view-point on the tile grid.
///
/// * `dir` has length 1.0 in fixed point.
/// * `plane` is perpendicular to `dir`; its length sets the field of view
///   (0.66 ≈ 66°).
/// * There is no stored angle. Turning rotates `dir` and `plane` together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Camera {
    pos: FixedVec,
    dir: FixedVec,
    plane: FixedVec,
}

/// 0.66 in position scale.
pub const DEFAULT_PLANE: Fixed = Fixed::from_raw(676);

impl Camera {
    #[inline]
    pub const fn new(pos: FixedVec, dir: FixedVec, plane: FixedVec) -> Self {
        Self { pos, dir, plane }
    }

    /// Standing on the corner of `tile`, looking toward −x.
    pub const fn spawn(tile: IVec2) -> Self {
        Self::new(
            FixedVec::from_tile(tile),
            FixedVec::from_raw(-Fixed::ONE.raw(), 0),
            FixedVec::new(Fixed::ZERO, DEFAULT_PLANE),
        )
    }

    #[inline]
    pub fn pos(&self) -> FixedVec {
        self.pos
    }

    #[inline]
    pub fn dir(&self) -> FixedVec {
        self.dir
    }

    #[inline]
    pub fn plane(&self) -> FixedVec {
        self.plane
    }

    #[inline]
    pub fn tile(&self) -> IVec2 {
        self.pos.tile()
    }

    /*──────────────────────── rotation ──────────────────────────────*/

    /// Turn by `step` degrees, accumulating onto the current vectors.
    pub fn rotate(&mut self, turn: Turn, step: i32) {
        let deg = turn.degrees(step);
        let (c, s) = (trig::cos(deg), trig::sin(deg));
        self.dir = self.dir.rotated(c, s);
        self.plane = self.plane.rotated(c, s);
    }

    /*──────────────────────── movement ──────────────────────────────*/

    /// Walk `step` map units along (or against) the view direction.
    pub fn advance(&mut self, map: &Map, travel: Travel, step: Fixed) {
        let delta = self.dir.scale(step);
        let delta = match travel {
            Travel::Forward => delta,
            Travel::Backward => -delta,
        };
        self.slide(map, delta);
    }

    /// Side-step `step` map units, perpendicular to the view direction.
    pub fn strafe(&mut self, map: &Map, side: Strafe, step: Fixed) {
        let delta = self.dir.perp_right().scale(step);
        let delta = match side {
            Strafe::Right => delta,
            Strafe::Left => -delta,
        };
        self.slide(map, delta);
    }

    /// Per-axis collision, X first.
    ///
    /// The X move is tested against the current row; the Y move is then
    /// tested against the column the camera occupies *after* the X move.
    /// A diagonal step into a corner therefore stops on Y instead of
    /// cutting through the corner cell.
    fn slide(&mut self, map: &Map, delta: FixedVec) {
        let next_x = self.pos.x + delta.x;
        if map.is_open(IVec2::new(next_x.tile(), self.pos.y.tile())) {
            self.pos.x = next_x;
        }

        let next_y = self.pos.y + delta.y;
        if map.is_open(IVec2::new(self.pos.x.tile(), next_y.tile())) {
            self.pos.y = next_y;
        }

        debug!(x = self.pos.x.raw(), y = self.pos.y.raw(), "camera moved");
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
