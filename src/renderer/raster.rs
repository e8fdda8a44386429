//! Line and triangle primitives over a [`Framebuffer`].
//!
//! Integer only. Lines go through the clipped `fill_rect`, triangles through
//! the bounds-checked pixel writer, so no primitive can address memory
//! outside the surface however far off-screen its vertices are.

use glam::IVec2;

use super::{Framebuffer, Rgb, Target};

/// A screen-space corner of a filled triangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Vertex {
    pub pos: IVec2,
    pub color: Rgb,
}

impl Vertex {
    #[inline]
    pub const fn new(x: i32, y: i32, color: Rgb) -> Self {
        Self {
            pos: IVec2::new(x, y),
            color,
        }
    }
}

/// Twice the signed area of `(a, b, p)`: positive when `p` lies on the
/// interior side of edge `a → b` for the accepted winding.
///
/// Coordinates are widened before subtracting; with vertices anywhere in
/// `i32` a difference needs 33 bits and a product 66.
#[inline]
fn edge(a: IVec2, b: IVec2, p: IVec2) -> i128 {
    let d = |u: i32, v: i32| i128::from(u) - i128::from(v);
    d(b.x, a.x) * d(p.y, a.y) - d(b.y, a.y) * d(p.x, a.x)
}

/// `(w0·c0 + w1·c1 + w2·c2) / area`, one division per channel.
#[inline]
fn blend(w: [i128; 3], c: [u8; 3], area: i128) -> u8 {
    let sum = w[0] * i128::from(c[0]) + w[1] * i128::from(c[1]) + w[2] * i128::from(c[2]);
    (sum / area) as u8
}

impl Framebuffer<'_> {
    /// Integer Bresenham line into the back surface, both endpoints included.
    pub fn draw_line(&mut self, from: IVec2, to: IVec2, color: Rgb) {
        let (mut x, mut y) = (i64::from(from.x), i64::from(from.y));
        let (x1, y1) = (i64::from(to.x), i64::from(to.y));

        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.fill_rect(x as i32, y as i32, 1, 1, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Outline `p0 → p1 → p2 → p0`.
    pub fn draw_triangle_wireframe(&mut self, p0: IVec2, p1: IVec2, p2: IVec2, color: Rgb) {
        self.draw_line(p0, p1, color);
        self.draw_line(p1, p2, color);
        self.draw_line(p2, p0, color);
    }

    /// Gouraud-filled triangle using edge functions.
    ///
    /// Only triangles with `cross(v1 - v0, v2 - v0) > 0` are drawn; the
    /// reverse winding and degenerate triangles are culled. Pixels on an
    /// edge count as inside.
    pub fn draw_triangle_filled(&mut self, target: Target, v0: Vertex, v1: Vertex, v2: Vertex) {
        let (p0, p1, p2) = (v0.pos, v1.pos, v2.pos);

        let area = edge(p0, p1, p2);
        if area <= 0 {
            return;
        }

        /* bounding box, clipped to the surface ------------------------------*/
        let min_x = p0.x.min(p1.x).min(p2.x).max(0);
        let min_y = p0.y.min(p1.y).min(p2.y).max(0);
        let max_x = p0.x.max(p1.x).max(p2.x).min(self.width() as i32 - 1);
        let max_y = p0.y.max(p1.y).max(p2.y).min(self.height() as i32 - 1);
        if min_x > max_x || min_y > max_y {
            return;
        }

        let reds = [v0.color.r, v1.color.r, v2.color.r];
        let greens = [v0.color.g, v1.color.g, v2.color.g];
        let blues = [v0.color.b, v1.color.b, v2.color.b];
        let format = self.format();

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = IVec2::new(x, y);
                // w_i belongs to the edge opposite vertex i
                let w = [edge(p1, p2, p), edge(p2, p0, p), edge(p0, p1, p)];
                if w.iter().any(|&wi| wi < 0) {
                    continue;
                }
                let color = Rgb::new(
                    blend(w, reds, area),
                    blend(w, greens, area),
                    blend(w, blues, area),
                );
                self.put_pixel(target, x, y, format.pack(color));
            }
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
