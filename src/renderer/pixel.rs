use super::{Pixel, Rgb};

/// Channel layout of a hardware surface.
///
/// Callers never shift bytes themselves; they hand an [`Rgb`] to
/// [`PixelFormat::pack`] so a new layout only touches this file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// 32 bpp, memory order B, G, R, unused. A little-endian `0x00RRGGBB`.
    Bgrx8888,
}

impl PixelFormat {
    /// Pick the layout for a surface reporting `bpp` bits per pixel.
    pub fn from_bpp(bpp: u8) -> Option<Self> {
        match bpp {
            32 => Some(PixelFormat::Bgrx8888),
            _ => None,
        }
    }

    #[inline]
    pub const fn pack(self, c: Rgb) -> Pixel {
        match self {
            PixelFormat::Bgrx8888 => ((c.r as u32) << 16) | ((c.g as u32) << 8) | c.b as u32,
        }
    }

    /// Inverse of [`pack`](Self::pack); the unused byte is ignored.
    #[inline]
    pub const fn unpack(self, px: Pixel) -> Rgb {
        match self {
            PixelFormat::Bgrx8888 => Rgb::new((px >> 16) as u8, (px >> 8) as u8, px as u8),
        }
    }
}
