use std::path::PathBuf;

use formats::PayloadError;

/// Failure to obtain country boundaries.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("failed to decode feature payload: {0}")]
    Decode(#[from] PayloadError),
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("coordinator already initialized")]
    AlreadyInitialized,
    #[error("feature source produced no polygonal features")]
    EmptyRegistry,
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("coordinator is not initialized")]
    NotReady,
}
