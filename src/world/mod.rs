mod camera;
mod map;

pub use camera::{Camera, DEFAULT_PLANE, Strafe, Travel, Turn};
pub use map::{MAP_H, MAP_W, Map, Material};
