pub mod listeners;
pub mod metrics;

pub use listeners::*;
pub use metrics::*;
