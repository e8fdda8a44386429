pub mod boot;
pub mod engine;
pub mod input;
pub mod math;
pub mod renderer;
pub mod world;
