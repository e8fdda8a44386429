//! Calibration screens for checking a surface's channel order by eye.
//! Both draw into the back surface; call `present` to see them.

use super::{Framebuffer, Pixel, Rgb, Target};

/// W Y C G M R B K
const BARS: [Rgb; 8] = [
    Rgb::new(255, 255, 255),
    Rgb::new(255, 255, 0),
    Rgb::new(0, 255, 255),
    Rgb::new(0, 255, 0),
    Rgb::new(255, 0, 255),
    Rgb::new(255, 0, 0),
    Rgb::new(0, 0, 255),
    Rgb::new(0, 0, 0),
];

/// Raw words with exactly one byte lane set, lowest lane first.
const LANES: [Pixel; 4] = [0x0000_00FF, 0x0000_FF00, 0x00FF_0000, 0xFF00_0000];

const CUBE_CELLS: u32 = 6;

impl Framebuffer<'_> {
    /// Colour bars on top, a grey ramp and R/G/B/W blocks in the middle, a
    /// small RGB cube sampler at the bottom. Sections that do not fit the
    /// surface are skipped.
    pub fn color_sanity(&mut self) {
        let (w, h) = (self.width(), self.height());
        self.fill_rect(0, 0, w as i32, h as i32, Rgb::BLACK);

        /*----------- bars ------------------------------------------------*/
        let mut bar_h = h / 5;
        if bar_h < 60 {
            bar_h = h.min(60);
        }
        let bar_w = w / 8;
        for (i, &c) in BARS.iter().enumerate() {
            let x = i as u32 * bar_w;
            // last bar soaks up the remainder
            let bw = if i == BARS.len() - 1 { w - x } else { bar_w };
            self.fill_rect(x as i32, 0, bw as i32, bar_h as i32, c);
        }

        /*----------- grey ramp -------------------------------------------*/
        let ramp_y = bar_h + 10;
        if ramp_y >= h {
            return;
        }
        let ramp_h = (h - ramp_y) / 2;
        let ramp_w = w / 2;
        let span = ramp_w.saturating_sub(1).max(1);
        for x in 0..ramp_w {
            let t = (x * 255 / span) as u8;
            self.fill_rect(x as i32, ramp_y as i32, 1, ramp_h as i32, Rgb::new(t, t, t));
        }

        /*----------- primaries -------------------------------------------*/
        let bx = ramp_w + 10;
        let sq = (ramp_h / 2).saturating_sub(5).min(120);
        if sq > 0 && bx + sq * 2 + 10 < w && ramp_y + sq * 2 + 10 < h {
            let blocks = [
                (0, 0, Rgb::new(255, 0, 0)),
                (1, 0, Rgb::new(0, 255, 0)),
                (0, 1, Rgb::new(0, 0, 255)),
                (1, 1, Rgb::WHITE),
            ];
            for (col, row, c) in blocks {
                let x = bx + col * (sq + 10);
                let y = ramp_y + row * (sq + 10);
                self.fill_rect(x as i32, y as i32, sq as i32, sq as i32, c);
            }
        }

        /*----------- cube sampler ----------------------------------------*/
        let grid_y = ramp_y + ramp_h + 10;
        if grid_y >= h {
            return;
        }
        let cell = (w / (CUBE_CELLS + 2)).max(20);
        let last = CUBE_CELLS - 1;
        for gy in 0..CUBE_CELLS {
            for gx in 0..CUBE_CELLS {
                let x = 10 + gx * (cell + 4);
                let y = grid_y + gy * (cell + 4);
                if x + cell >= w || y + cell >= h {
                    continue;
                }
                // blue wraps for the xor'd corners, same as the byte store it models
                let c = Rgb::new(
                    (gx * 255 / last) as u8,
                    (gy * 255 / last) as u8,
                    ((gx ^ gy) * 255 / last) as u8,
                );
                self.fill_rect(x as i32, y as i32, cell as i32, cell as i32, c);
            }
        }
    }

    /// Four bars across the top, each lighting a single byte of the pixel
    /// word. On a BGRX surface they read blue, green, red, black.
    pub fn byte_lane_probe(&mut self) {
        let (w, h) = (self.width(), self.height());
        self.fill_rect(0, 0, w as i32, h as i32, Rgb::BLACK);

        let mut bar_h = if h > 120 { 120 } else { h / 4 };
        if bar_h < 40 {
            bar_h = h / 4;
        }
        let quarter = (w / 4).max(1);

        for y in 0..bar_h {
            let row = self.row_mut(Target::Back, y);
            for (x, px) in row.iter_mut().enumerate() {
                let lane = (x as u32 / quarter).min(3) as usize;
                *px = LANES[lane];
            }
        }
    }
}
