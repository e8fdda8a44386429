//! The view: ray-casting a [`Map`](crate::world::Map) from a
//! [`Camera`](crate::world::Camera) and driving the per-frame loop.

mod headless;
pub mod raycaster;
mod session;

pub use headless::Headless;
pub use raycaster::{ColumnHit, Side, WallSlice};
pub use session::{FrameReport, RenderSession, SessionConfig};
