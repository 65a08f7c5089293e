pub mod color_scale;
pub mod sample;
pub mod store;

pub use color_scale::*;
pub use store::*;
