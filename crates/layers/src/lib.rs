pub mod choropleth;
pub mod raster;
pub mod stipple;
pub mod symbology;
pub mod vector;

#[cfg(test)]
pub(crate) mod fixtures;

pub use choropleth::*;
pub use raster::*;
pub use stipple::*;
pub use symbology::*;
pub use vector::*;
