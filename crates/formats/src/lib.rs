pub mod payload;
pub mod topology;
pub mod vector_chunk;

pub use payload::*;
pub use topology::*;
pub use vector_chunk::*;
