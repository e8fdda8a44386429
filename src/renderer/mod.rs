//! Rasterization backend.
//!
//! *The ray-caster never touches a pixel word directly.*
//! It issues clipped rectangle fills through [`Canvas`]; the
//! [`Framebuffer`] packs colours for its [`PixelFormat`], keeps the back
//! surface, and copies it to the front surface on `present`.
//!
//! * [`Display`] is the other end of the pipe: whoever owns the physical
//!   surface gets the finished front surface once per frame.

mod framebuffer;
mod patterns;
mod pixel;
mod raster;

pub use framebuffer::{BACK_SURFACE_CAPACITY, Framebuffer, FramebufferError, SurfaceInfo};
pub use pixel::PixelFormat;
pub use raster::Vertex;

/// One packed pixel word as stored in a surface.
pub type Pixel = u32;

/// An 8-bit-per-channel colour, independent of any surface layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Every channel at half intensity.
    #[inline]
    pub const fn halved(self) -> Self {
        Self::new(self.r / 2, self.g / 2, self.b / 2)
    }
}

/// Which of the two surfaces a primitive writes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// The surface being scanned out. Writes show up immediately.
    Front,
    /// The off-screen buffer; visible after the next `present`.
    Back,
}

/// Anything the ray-caster can paint columns into.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Fill `w × h` pixels at `(x, y)`, clipped to the surface.
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb);
}

/// Receiver of the finished front surface.
///
/// On bare metal the surface *is* the display and this is a no-op; a hosted
/// build forwards the words to its window.
pub trait Display {
    type Error;

    /// `front` is row-major with `stride` words per row and `height` rows.
    fn scanout(&mut self, front: &[Pixel], stride: usize, height: usize)
    -> Result<(), Self::Error>;
}
