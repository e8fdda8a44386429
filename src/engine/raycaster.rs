//! Per-column DDA ray-caster.
//!
//! Every screen column gets one ray; the ray walks the tile grid one cell
//! boundary at a time until it enters a wall, and the perpendicular distance
//! to that wall sets the height of a single flat-coloured stripe.
//!
//! All distances are position-scale fixed point carried in `i64`, so the
//! "never crosses" sentinel for an axis-parallel ray can be added to without
//! wrapping.

use glam::IVec2;

use crate::{
    math::{FIXED_ONE, FIXED_SHIFT, Fixed, FixedVec},
    renderer::{Canvas, Rgb},
    world::{Camera, Map, Material},
};

/// Stand-in for `1 / 0`: a delta distance no real crossing can beat.
pub const NO_CROSSING: i64 = 2_147_483_640;

/// Which family of grid lines the ray crossed last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// A vertical grid line (the ray stepped in x). Drawn at full brightness.
    X,
    /// A horizontal grid line (the ray stepped in y). Drawn at half brightness.
    Y,
}

/// Result of walking one ray.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnHit {
    pub ray_dir: FixedVec,
    /// Tile the ray stopped in. May lie outside the map if the border is open.
    pub tile: IVec2,
    pub side: Side,
    /// Distance along the view direction, position scale.
    pub perp_dist: i64,
    pub material: Material,
    /// Grid cells visited before stopping.
    pub steps: u32,
}

/// Vertical extent and colour of one column's wall stripe, inclusive rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallSlice {
    pub top: i32,
    pub bottom: i32,
    pub color: Rgb,
}

/// Column `x` mapped to camera space: −1.0 at the left edge, 0 at the
/// centre, approaching +1.0 at the right edge.
pub fn camera_x(x: u32, width: u32) -> Fixed {
    let w = i64::from(width.max(1));
    Fixed::from_raw((2 * i64::from(x) * i64::from(FIXED_ONE) / w) as i32 - FIXED_ONE)
}

/// `|1 / r|` in position scale, or [`NO_CROSSING`] when the ray never
/// crosses this axis.
#[inline]
fn delta_dist(r: Fixed) -> i64 {
    match r.raw() {
        0 => NO_CROSSING,
        r => (i64::from(FIXED_ONE) * i64::from(FIXED_ONE) / i64::from(r)).abs(),
    }
}

/// Step direction and distance to the first grid line along one axis.
#[inline]
fn first_crossing(pos: Fixed, ray: Fixed, delta: i64) -> (i32, i64) {
    if ray.raw() < 0 {
        (-1, (i64::from(pos.frac()) * delta) >> FIXED_SHIFT)
    } else {
        (1, (i64::from(FIXED_ONE - pos.frac()) * delta) >> FIXED_SHIFT)
    }
}

/// Walk the ray through `map` from `pos` until it enters a wall.
///
/// X is stepped only when its side distance is strictly smaller, so ties go
/// to Y. Leaving the grid counts as an X-side hit, which keeps the loop
/// finite even on a map with holes in its border.
pub fn cast_ray(pos: FixedVec, ray: FixedVec, map: &Map) -> ColumnHit {
    let mut tile = pos.tile();

    let delta_x = delta_dist(ray.x);
    let delta_y = delta_dist(ray.y);
    let (step_x, mut side_x) = first_crossing(pos.x, ray.x, delta_x);
    let (step_y, mut side_y) = first_crossing(pos.y, ray.y, delta_y);

    let mut steps = 0;
    let side = loop {
        let side = if side_x < side_y {
            side_x += delta_x;
            tile.x += step_x;
            Side::X
        } else {
            side_y += delta_y;
            tile.y += step_y;
            Side::Y
        };
        steps += 1;

        match map.cell(tile) {
            None => break Side::X,
            Some(0) => continue,
            Some(_) => break side,
        }
    };

    let perp_dist = match side {
        Side::X => side_x - delta_x,
        Side::Y => side_y - delta_y,
    };

    ColumnHit {
        ray_dir: ray,
        tile,
        side,
        perp_dist,
        material: map.cell(tile).unwrap_or(0),
        steps,
    }
}

/// Cast the ray for screen column `x` of a `width`-column view.
pub fn cast_column(camera: &Camera, map: &Map, x: u32, width: u32) -> ColumnHit {
    let ray = camera.dir() + camera.plane().scale(camera_x(x, width));
    cast_ray(camera.pos(), ray, map)
}

/// Flat colour for a wall material.
pub fn material_color(material: Material) -> Rgb {
    match material {
        1 => Rgb::new(255, 0, 0),
        2 => Rgb::new(0, 255, 0),
        3 => Rgb::new(0, 0, 255),
        4 => Rgb::WHITE,
        _ => Rgb::new(255, 255, 0),
    }
}

impl ColumnHit {
    /// Projected wall height on a `height`-row screen.
    pub fn line_height(&self, height: u32) -> i64 {
        let h = i64::from(height);
        if self.perp_dist > 0 {
            h * i64::from(FIXED_ONE) / self.perp_dist
        } else {
            h
        }
    }

    /// The stripe to draw, centred on the horizon and clamped to the screen.
    pub fn slice(&self, height: u32) -> WallSlice {
        let h = i64::from(height);
        let half_line = self.line_height(height) / 2;
        let top = (h / 2 - half_line).max(0);
        let bottom = (h / 2 + half_line).min(h - 1);

        let color = material_color(self.material);
        let color = match self.side {
            Side::X => color,
            Side::Y => color.halved(),
        };

        WallSlice {
            top: top as i32,
            bottom: bottom as i32,
            color,
        }
    }
}

/// Ceiling and floor halves first, then one wall stripe per column.
pub fn render_view<C: Canvas>(canvas: &mut C, camera: &Camera, map: &Map, ceiling: Rgb, floor: Rgb) {
    let (w, h) = (canvas.width(), canvas.height());
    if w == 0 || h == 0 {
        return;
    }
    let half = (h / 2) as i32;
    canvas.fill_rect(0, 0, w as i32, half, ceiling);
    canvas.fill_rect(0, half, w as i32, h as i32 - half, floor);

    for x in 0..w {
        let s = cast_column(camera, map, x, w).slice(h);
        canvas.fill_rect(x as i32, s.top, 1, s.bottom - s.top + 1, s.color);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Framebuffer, SurfaceInfo, Target};
    use crate::world::{MAP_H, MAP_W};
    use proptest::prelude::*;

    fn spawn() -> Camera {
        Camera::spawn(IVec2::new(22, 12))
    }

    #[test]
    fn camera_x_spans_minus_one_to_one() {
        assert_eq!(camera_x(0, 640), -Fixed::ONE);
        assert_eq!(camera_x(320, 640), Fixed::ZERO);
        assert_eq!(camera_x(639, 640).raw(), 2 * 639 * 1024 / 640 - 1024);
    }

    #[test]
    fn centre_column_from_spawn_hits_west_wall() {
        let cam = spawn();
        let hit = cast_column(&cam, &Map::reference(), 320, 640);

        assert_eq!(hit.ray_dir, cam.dir());
        assert_eq!(hit.tile, IVec2::new(0, 12));
        assert_eq!(hit.side, Side::X);
        assert_eq!(hit.material, 1);
        // from x = 22.0 to the east face of column 0 at x = 1.0
        assert_eq!(hit.perp_dist, 21 * i64::from(FIXED_ONE));
        assert_eq!(hit.steps, 22);
    }

    #[test]
    fn centre_slice_on_480_rows() {
        let hit = cast_column(&spawn(), &Map::reference(), 320, 640);
        assert_eq!(hit.line_height(480), 22);
        assert_eq!(
            hit.slice(480),
            WallSlice {
                top: 229,
                bottom: 251,
                color: Rgb::new(255, 0, 0)
            }
        );
    }

    #[test]
    fn axis_parallel_ray_uses_sentinel_and_y_side_is_dimmed() {
        let cam = Camera::new(
            FixedVec::from_raw(12 * FIXED_ONE + 512, 12 * FIXED_ONE + 512),
            FixedVec::from_raw(0, FIXED_ONE),
            FixedVec::from_raw(-676, 0),
        );
        let hit = cast_ray(cam.pos(), cam.dir(), &Map::arena());
        assert_eq!(hit.tile, IVec2::new(12, 23));
        assert_eq!(hit.side, Side::Y);
        assert_eq!(hit.perp_dist, 10 * i64::from(FIXED_ONE) + 512);
        assert_eq!(hit.slice(100).color, Rgb::new(127, 0, 0));
    }

    #[test]
    fn ties_advance_y() {
        // exactly on a tile corner, 45° ray: both side distances start at 0
        let pos = FixedVec::from_tile(IVec2::new(3, 3));
        let map = Map::arena().with_cell(IVec2::new(3, 2), 2).with_cell(IVec2::new(2, 3), 3);
        let hit = cast_ray(pos, FixedVec::from_raw(-724, -724), &map);
        assert_eq!(hit.tile, IVec2::new(3, 2));
        assert_eq!(hit.side, Side::Y);
        assert_eq!(hit.steps, 1);
    }

    #[test]
    fn touching_a_wall_fills_the_column() {
        let map = Map::arena().with_cell(IVec2::new(5, 5), 3);
        let pos = FixedVec::from_raw(6 * FIXED_ONE, 5 * FIXED_ONE + 512);
        let hit = cast_ray(pos, FixedVec::from_raw(-FIXED_ONE, 0), &map);
        assert_eq!(hit.perp_dist, 0);
        assert_eq!(hit.line_height(200), 200);
        let s = hit.slice(200);
        assert_eq!((s.top, s.bottom), (0, 199));
    }

    #[test]
    fn leaving_an_open_map_is_an_x_side_hit() {
        let map = Map::arena().with_cell(IVec2::new(23, 10), 0);
        let pos = FixedVec::from_raw(20 * FIXED_ONE + 512, 10 * FIXED_ONE + 512);
        let hit = cast_ray(pos, FixedVec::from_raw(FIXED_ONE, 0), &map);
        assert_eq!(hit.tile, IVec2::new(24, 10));
        assert_eq!(hit.side, Side::X);
        assert_eq!(hit.material, 0);
        assert_eq!(hit.slice(10).color, Rgb::new(255, 255, 0));
    }

    #[test]
    fn every_column_from_spawn_stops_on_a_wall() {
        let map = Map::reference();
        let cam = spawn();
        for x in 0..320 {
            let hit = cast_column(&cam, &map, x, 320);
            assert_ne!(map.cell(hit.tile), Some(0), "column {x} stopped in the open");
            assert!(hit.perp_dist > 0, "column {x}");
        }
    }

    #[test]
    fn render_view_draws_sky_wall_floor() {
        let info = SurfaceInfo::packed(64, 48);
        let mut mem = vec![0; info.required_words()];
        let mut fb = Framebuffer::new(&mut mem, info).unwrap();
        let ceiling = Rgb::new(20, 20, 20);
        let floor = Rgb::new(50, 50, 50);
        render_view(&mut fb, &spawn(), &Map::reference(), ceiling, floor);

        let fmt = fb.format();
        let at = |x, y| fb.pixel(Target::Back, x, y).map(|p| fmt.unpack(p));
        assert_eq!(at(32, 0), Some(ceiling));
        assert_eq!(at(32, 47), Some(floor));
        // 48 * 1024 / 21504 = 2 rows tall, centred on row 24
        assert_eq!(at(32, 23), Some(Rgb::new(255, 0, 0)));
        assert_eq!(at(32, 25), Some(Rgb::new(255, 0, 0)));
        assert_eq!(at(32, 22), Some(ceiling));
        assert_eq!(at(32, 26), Some(floor));
    }

    proptest! {
        #[test]
        fn dda_terminates_within_map_diameter(
            tx in 1i32..23, ty in 1i32..23,
            fx in 0i32..1024, fy in 0i32..1024,
            rx in -2048i32..2048, ry in -2048i32..2048,
        ) {
            let map = Map::reference();
            prop_assume!(map.is_open(IVec2::new(tx, ty)));
            let pos = FixedVec::from_raw(tx * FIXED_ONE + fx, ty * FIXED_ONE + fy);
            let hit = cast_ray(pos, FixedVec::from_raw(rx, ry), &map);
            prop_assert!(hit.steps as usize <= MAP_W + MAP_H, "{} steps", hit.steps);
            prop_assert!(Map::contains(hit.tile));
            prop_assert_ne!(map.cell(hit.tile), Some(0));
        }
    }
}
