//! Integer-only math shared by the camera and the ray-caster.

pub mod fixed;
pub mod trig;

pub use fixed::{FIXED_ONE, FIXED_SHIFT, Fixed, FixedVec};
pub use trig::{TRIG_ONE, TRIG_SHIFT, TrigFixed};
