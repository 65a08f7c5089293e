use serde_json::Value;

use crate::topology::{Topology, TopologyError};
use crate::vector_chunk::{VectorChunk, VectorChunkError};

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    GeoJson(#[from] VectorChunkError),
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error("unsupported document type {0:?} (expected Topology or FeatureCollection)")]
    UnsupportedType(String),
}

/// Decode a country boundary document.
///
/// TopoJSON topologies are expanded from `object`; GeoJSON feature
/// collections are used as-is and `object` is ignored.
pub fn decode_feature_payload(payload: &str, object: &str) -> Result<VectorChunk, PayloadError> {
    let value: Value = serde_json::from_str(payload)?;
    let kind = value
        .get("type")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    match kind.as_str() {
        "Topology" => Ok(Topology::from_json_value(value)?.feature_collection(object)?),
        "FeatureCollection" => Ok(VectorChunk::from_geojson_value(&value)?),
        _ => Err(PayloadError::UnsupportedType(kind)),
    }
}
