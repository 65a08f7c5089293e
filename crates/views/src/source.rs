use std::future::Future;

use formats::{VectorChunk, decode_feature_payload};

use crate::error::SourceError;

/// Asynchronous provider of country boundaries.
pub trait FeatureSource {
    fn load_features(&self) -> impl Future<Output = Result<VectorChunk, SourceError>>;
}

/// GeoJSON or TopoJSON text already held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadSource {
    payload: String,
    object: String,
}

impl PayloadSource {
    /// `object` names the TopoJSON object to extract; ignored for GeoJSON.
    pub fn new(payload: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            object: object.into(),
        }
    }
}

impl FeatureSource for PayloadSource {
    async fn load_features(&self) -> Result<VectorChunk, SourceError> {
        Ok(decode_feature_payload(&self.payload, &self.object)?)
    }
}

impl FeatureSource for VectorChunk {
    async fn load_features(&self) -> Result<VectorChunk, SourceError> {
        Ok(self.clone())
    }
}
