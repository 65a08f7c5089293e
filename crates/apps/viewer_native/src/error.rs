use std::path::PathBuf;

use views::{InitError, RenderError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to read config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read values file {}: {source}", path.display())]
    Values {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("raster {width}x{height} has an inconsistent pixel buffer")]
    RasterShape { width: u32, height: u32 },
    #[error("{0} produced no output yet")]
    NothingRendered(&'static str),
    #[error(transparent)]
    Init(#[from] InitError),
    #[error(transparent)]
    Render(#[from] RenderError),
}
