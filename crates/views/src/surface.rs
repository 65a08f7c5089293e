use std::str::FromStr;

use layers::RasterBuffer;
use serde::{Deserialize, Serialize};

/// Raster size in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid size {0:?}: expected WIDTHxHEIGHT")]
pub struct ParseViewportError(pub String);

impl FromStr for Viewport {
    type Err = ParseViewportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseViewportError(s.to_string());
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(err)?;
        let width = w.trim().parse().map_err(|_| err())?;
        let height = h.trim().parse().map_err(|_| err())?;
        Ok(Self { width, height })
    }
}

/// Receives the equirectangular texture wrapped around the 3D sphere.
pub trait TextureSurface {
    fn upload_texture(&mut self, raster: RasterBuffer);
}

/// The 2D map canvas.
pub trait CanvasSurface {
    /// Current drawable size; the flat projection is fitted to it.
    fn viewport(&self) -> Viewport;

    fn paint(&mut self, raster: RasterBuffer);
}
