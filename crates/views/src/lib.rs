//! Keeps the sphere texture and the flat map in step with a [`values::ValueStore`].

pub mod coordinator;
pub mod error;
pub mod projection_engine;
pub mod source;
pub mod surface;

pub use coordinator::*;
pub use error::*;
pub use projection_engine::*;
pub use source::*;
pub use surface::*;

#[cfg(test)]
pub(crate) mod test_support;
