pub mod code;
pub mod registry;
pub mod resolver;

pub use code::*;
pub use registry::*;
pub use resolver::*;
