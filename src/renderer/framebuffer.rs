//! ---------------------------------------------------------------------------
//! Double-buffered linear framebuffer
//!
//! * The **front** surface is memory handed over by the boot environment:
//!   `pitch` bytes per row, `width × height` visible pixels. It is borrowed,
//!   never owned.
//! * The **back** surface is a `Vec` sized to exactly `width × height`,
//!   zeroed at creation, written by the rasterizer every frame and copied to
//!   the front by [`Framebuffer::present`].
//!
//! All row addressing goes through [`Framebuffer::row_mut`]; nothing else
//! computes an offset into the front slice.
//! ---------------------------------------------------------------------------

use thiserror::Error;
use tracing::info;

use super::{Canvas, Pixel, PixelFormat, Rgb, Target};

/// Largest back surface we agree to allocate, in pixels.
pub const BACK_SURFACE_CAPACITY: usize = 1920 * 1200;

/// Geometry of the front surface as reported by the boot environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceInfo {
    /// Bytes per scanline.
    pub pitch: u32,
    pub width: u32,
    pub height: u32,
    pub bpp: u8,
}

impl SurfaceInfo {
    /// A tightly packed 32 bpp surface. An absurd width saturates the pitch
    /// and is left for [`validate`](Self::validate) to refuse.
    pub const fn packed(width: u32, height: u32) -> Self {
        Self {
            pitch: width.saturating_mul(4),
            width,
            height,
            bpp: 32,
        }
    }

    /// Words the front slice must hold for this geometry.
    pub const fn required_words(&self) -> usize {
        (self.pitch / 4) as usize * self.height as usize
    }

    /// Every check that needs no memory: format, capacity, pitch.
    ///
    /// Run it before sizing a front surface from untrusted geometry.
    pub fn validate(&self) -> Result<PixelFormat, FramebufferError> {
        let format = PixelFormat::from_bpp(self.bpp)
            .ok_or(FramebufferError::UnsupportedFormat { bpp: self.bpp })?;

        if self.pixels() > BACK_SURFACE_CAPACITY {
            return Err(FramebufferError::CapacityExceeded {
                width: self.width,
                height: self.height,
                capacity: BACK_SURFACE_CAPACITY,
            });
        }

        if self.pitch % 4 != 0 || self.pitch / 4 < self.width {
            return Err(FramebufferError::InvalidPitch {
                pitch: self.pitch,
                width: self.width,
            });
        }
        Ok(format)
    }

    #[inline]
    fn pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Reasons a surface is refused at start-up. All of them are fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FramebufferError {
    #[error("unsupported pixel format: {bpp} bits per pixel (only 32 is supported)")]
    UnsupportedFormat { bpp: u8 },

    #[error("{width}x{height} surface exceeds back-surface capacity of {capacity} pixels")]
    CapacityExceeded {
        width: u32,
        height: u32,
        capacity: usize,
    },

    #[error("pitch {pitch} cannot hold a {width}-pixel row of 32-bit words")]
    InvalidPitch { pitch: u32, width: u32 },

    #[error("front surface holds {got} words, geometry needs {need}")]
    SurfaceTooSmall { got: usize, need: usize },
}

pub struct Framebuffer<'a> {
    front: &'a mut [Pixel],
    back: Vec<Pixel>,
    /// Row length of the front surface in words (`pitch / 4`).
    stride: usize,
    width: u32,
    height: u32,
    format: PixelFormat,
}

impl<'a> Framebuffer<'a> {
    /// Validate `info` against `front` and allocate the back surface.
    pub fn new(front: &'a mut [Pixel], info: SurfaceInfo) -> Result<Self, FramebufferError> {
        let format = info.validate()?;
        let pixels = info.pixels();

        let need = info.required_words();
        if front.len() < need {
            return Err(FramebufferError::SurfaceTooSmall {
                got: front.len(),
                need,
            });
        }

        info!(
            pitch = info.pitch,
            width = info.width,
            height = info.height,
            bpp = info.bpp,
            ?format,
            back_bytes = pixels * 4,
            "framebuffer ready"
        );

        Ok(Self {
            front,
            back: vec![0; pixels],
            stride: (info.pitch / 4) as usize,
            width: info.width,
            height: info.height,
            format,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Front surface row length in words.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The scanned-out memory, including any padding past `width`.
    #[inline]
    pub fn front(&self) -> &[Pixel] {
        &*self.front
    }

    /// The off-screen surface, `width × height` words, row-major.
    #[inline]
    pub fn back(&self) -> &[Pixel] {
        &self.back
    }

    /// Packed word at `(x, y)`, or `None` off-surface.
    pub fn pixel(&self, target: Target, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some(match target {
            Target::Front => self.front[y * self.stride + x],
            Target::Back => self.back[y * self.width as usize + x],
        })
    }

    /// Visible part of row `y` (exactly `width` words).
    pub(super) fn row_mut(&mut self, target: Target, y: u32) -> &mut [Pixel] {
        debug_assert!(y < self.height);
        let w = self.width as usize;
        let y = y as usize;
        match target {
            Target::Front => &mut self.front[y * self.stride..y * self.stride + w],
            Target::Back => &mut self.back[y * w..(y + 1) * w],
        }
    }

    /// Write one packed word; silently drops off-surface coordinates.
    #[inline]
    pub(super) fn put_pixel(&mut self, target: Target, x: i32, y: i32, px: Pixel) {
        if (0..self.width as i32).contains(&x) && (0..self.height as i32).contains(&y) {
            self.row_mut(target, y as u32)[x as usize] = px;
        }
    }

    /// Paint the whole *front* surface, bypassing the back buffer.
    pub fn clear(&mut self, color: Rgb) {
        let px = self.format.pack(color);
        for y in 0..self.height {
            self.row_mut(Target::Front, y).fill(px);
        }
    }

    /// Fill a rectangle of the back surface, clipped to the surface bounds.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        // widen so x + w cannot wrap
        let x0 = i64::from(x).max(0);
        let y0 = i64::from(y).max(0);
        let x1 = (i64::from(x) + i64::from(w)).min(i64::from(self.width));
        let y1 = (i64::from(y) + i64::from(h)).min(i64::from(self.height));
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let px = self.format.pack(color);
        let (x0, x1) = (x0 as usize, x1 as usize);
        for row in y0 as u32..y1 as u32 {
            self.row_mut(Target::Back, row)[x0..x1].fill(px);
        }
    }

    /// Copy the back surface into the front surface, one row at a time.
    pub fn present(&mut self) {
        let w = self.width as usize;
        for (y, src) in self.back.chunks_exact(w.max(1)).enumerate() {
            let start = y * self.stride;
            self.front[start..start + w].copy_from_slice(&src[..w]);
        }
    }

    /// FNV-1a over the visible front surface; a cheap frame fingerprint for
    /// diagnostics and replay logs.
    pub fn checksum(&self) -> u64 {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;
        let w = self.width as usize;
        let mut hash = OFFSET;
        for y in 0..self.height as usize {
            for &px in &self.front[y * self.stride..y * self.stride + w] {
                for b in px.to_le_bytes() {
                    hash ^= u64::from(b);
                    hash = hash.wrapping_mul(PRIME);
                }
            }
        }
        hash
    }
}

impl Canvas for Framebuffer<'_> {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        Framebuffer::fill_rect(self, x, y, w, h, color);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RED: Rgb = Rgb::new(255, 0, 0);

    fn back_pixels_set(fb: &Framebuffer<'_>) -> Vec<(u32, u32)> {
        let mut out = Vec::new();
        for y in 0..fb.height() {
            for x in 0..fb.width() {
                if fb.pixel(Target::Back, x, y) != Some(0) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn rejects_non_32_bpp() {
        let mut mem = vec![0; 64];
        let info = SurfaceInfo {
            bpp: 24,
            ..SurfaceInfo::packed(8, 8)
        };
        let err = Framebuffer::new(&mut mem, info).err();
        assert_eq!(err, Some(FramebufferError::UnsupportedFormat { bpp: 24 }));
    }

    #[test]
    fn rejects_surface_above_capacity() {
        let mut mem = Vec::new();
        let err = Framebuffer::new(&mut mem, SurfaceInfo::packed(4096, 4096)).err();
        assert!(matches!(err, Some(FramebufferError::CapacityExceeded { .. })));
    }

    #[test]
    fn huge_packed_width_is_refused_not_overflowed() {
        let info = SurfaceInfo::packed(1 << 30, 1);
        assert_eq!(info.pitch, u32::MAX);
        let mut mem = Vec::new();
        let err = Framebuffer::new(&mut mem, info).err();
        assert!(matches!(err, Some(FramebufferError::CapacityExceeded { width: 0x4000_0000, height: 1, .. })));
    }

    #[test]
    fn validate_runs_before_any_allocation() {
        // what a hostile boot block can claim: ~17 GB of front surface
        let info = SurfaceInfo {
            pitch: 262_140,
            width: 65_535,
            height: 65_535,
            bpp: 32,
        };
        assert!(matches!(info.validate(), Err(FramebufferError::CapacityExceeded { .. })));

        let odd = SurfaceInfo { pitch: 30, ..SurfaceInfo::packed(8, 8) };
        assert!(matches!(odd.validate(), Err(FramebufferError::InvalidPitch { .. })));
        assert_eq!(
            SurfaceInfo { bpp: 16, ..odd }.validate(),
            Err(FramebufferError::UnsupportedFormat { bpp: 16 })
        );
        assert_eq!(SurfaceInfo::packed(640, 480).validate(), Ok(PixelFormat::Bgrx8888));
    }

    #[test]
    fn capacity_covers_1024_by_768() {
        let info = SurfaceInfo::packed(1024, 768);
        let mut mem = vec![0; info.required_words()];
        assert!(Framebuffer::new(&mut mem, info).is_ok());
    }

    #[test]
    fn rejects_bad_pitch_and_short_memory() {
        let mut mem = vec![0; 64];
        let narrow = SurfaceInfo {
            pitch: 28,
            ..SurfaceInfo::packed(8, 8)
        };
        assert!(matches!(
            Framebuffer::new(&mut mem, narrow).err(),
            Some(FramebufferError::InvalidPitch { .. })
        ));

        let unaligned = SurfaceInfo {
            pitch: 33,
            ..SurfaceInfo::packed(8, 8)
        };
        assert!(matches!(
            Framebuffer::new(&mut mem, unaligned).err(),
            Some(FramebufferError::InvalidPitch { .. })
        ));

        let mut short = vec![0; 63];
        assert_eq!(
            Framebuffer::new(&mut short, SurfaceInfo::packed(8, 8)).err(),
            Some(FramebufferError::SurfaceTooSmall { got: 63, need: 64 })
        );
    }

    #[test]
    fn back_surface_starts_zeroed_and_front_untouched() {
        let mut mem = vec![0xDEAD_BEEF; 16];
        let fb = Framebuffer::new(&mut mem, SurfaceInfo::packed(4, 4)).unwrap();
        assert!(fb.back().iter().all(|&p| p == 0));
        assert!(fb.front().iter().all(|&p| p == 0xDEAD_BEEF));
    }

    #[test]
    fn clear_writes_front_only_and_respects_pitch() {
        // 3 visible pixels per row, 5-word stride
        let info = SurfaceInfo {
            pitch: 20,
            ..SurfaceInfo::packed(3, 2)
        };
        let mut mem = vec![7; 10];
        let mut fb = Framebuffer::new(&mut mem, info).unwrap();
        fb.clear(RED);
        assert!(fb.back().iter().all(|&p| p == 0));
        drop(fb);
        assert_eq!(mem, [0xFF0000, 0xFF0000, 0xFF0000, 7, 7, 0xFF0000, 0xFF0000, 0xFF0000, 7, 7]);
    }

    #[test]
    fn fill_rect_clips_negative_origin() {
        let mut mem = vec![0; 16];
        let mut fb = Framebuffer::new(&mut mem, SurfaceInfo::packed(4, 4)).unwrap();
        fb.fill_rect(-2, -2, 3, 3, RED);
        assert_eq!(back_pixels_set(&fb), vec![(0, 0)]);
    }

    #[test]
    fn fill_rect_fully_outside_is_noop() {
        let mut mem = vec![0; 16];
        let mut fb = Framebuffer::new(&mut mem, SurfaceInfo::packed(4, 4)).unwrap();
        fb.fill_rect(4, 0, 10, 10, RED);
        fb.fill_rect(0, -5, 4, 5, RED);
        fb.fill_rect(1, 1, 0, 3, RED);
        fb.fill_rect(i32::MAX, i32::MAX, i32::MAX, i32::MAX, RED);
        assert!(back_pixels_set(&fb).is_empty());
    }

    #[test]
    fn present_copies_back_to_front_row_by_row() {
        let info = SurfaceInfo {
            pitch: 16,
            ..SurfaceInfo::packed(2, 2)
        };
        let mut mem = vec![9; 8];
        let mut fb = Framebuffer::new(&mut mem, info).unwrap();
        fb.fill_rect(1, 0, 1, 2, Rgb::new(0, 0, 1));
        assert_eq!(fb.pixel(Target::Front, 1, 0), Some(9));
        fb.present();
        assert_eq!(fb.pixel(Target::Front, 0, 0), Some(0));
        assert_eq!(fb.pixel(Target::Front, 1, 1), Some(1));
        drop(fb);
        // padding words beyond the visible width are left alone
        assert_eq!(mem, [0, 1, 9, 9, 0, 1, 9, 9]);
    }

    #[test]
    fn checksum_tracks_front_contents() {
        let mut mem = vec![0; 16];
        let mut fb = Framebuffer::new(&mut mem, SurfaceInfo::packed(4, 4)).unwrap();
        let before = fb.checksum();
        fb.fill_rect(0, 0, 1, 1, RED);
        assert_eq!(fb.checksum(), before, "back writes are invisible");
        fb.present();
        assert_ne!(fb.checksum(), before);
    }

    proptest! {
        #[test]
        fn fill_rect_writes_exactly_the_clipped_rect(
            sw in 1u32..24, sh in 1u32..24,
            x in -30i32..30, y in -30i32..30,
            w in -5i32..40, h in -5i32..40,
        ) {
            let info = SurfaceInfo::packed(sw, sh);
            let mut mem = vec![0; info.required_words()];
            let mut fb = Framebuffer::new(&mut mem, info).unwrap();
            fb.fill_rect(x, y, w, h, RED);

            for py in 0..sh {
                for px in 0..sw {
                    let (pxi, pyi) = (px as i32, py as i32);
                    let inside = pxi >= x && pxi < x + w && pyi >= y && pyi < y + h;
                    let written = fb.pixel(Target::Back, px, py) == Some(0xFF0000);
                    prop_assert_eq!(inside, written, "pixel ({}, {})", px, py);
                }
            }
        }
    }
}
