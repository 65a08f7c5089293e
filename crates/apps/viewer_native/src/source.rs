use std::path::PathBuf;

use formats::{VectorChunk, decode_feature_payload};
use tracing::info;
use views::{FeatureSource, SourceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File(PathBuf),
    Http(String),
}

impl Location {
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Location::Http(location.to_string())
        } else {
            Location::File(PathBuf::from(location))
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::File(path) => write!(f, "{}", path.display()),
            Location::Http(url) => f.write_str(url),
        }
    }
}

/// Country boundaries read from disk or fetched over HTTP.
#[derive(Debug, Clone)]
pub struct TopologySource {
    location: Location,
    object: String,
    http: reqwest::Client,
}

impl TopologySource {
    pub fn new(location: Location, object: impl Into<String>) -> Self {
        Self {
            location,
            object: object.into(),
            http: reqwest::Client::new(),
        }
    }

    async fn payload(&self) -> Result<String, SourceError> {
        match &self.location {
            Location::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| SourceError::Io {
                        path: path.clone(),
                        source,
                    })
            }
            Location::Http(url) => {
                let fetch_err = |err: reqwest::Error| SourceError::Fetch {
                    url: url.clone(),
                    reason: err.to_string(),
                };
                self.http
                    .get(url)
                    .send()
                    .await
                    .and_then(|resp| resp.error_for_status())
                    .map_err(fetch_err)?
                    .text()
                    .await
                    .map_err(fetch_err)
            }
        }
    }
}

impl FeatureSource for TopologySource {
    async fn load_features(&self) -> Result<VectorChunk, SourceError> {
        let payload = self.payload().await?;
        info!(location = %self.location, bytes = payload.len(), "feature payload loaded");
        Ok(decode_feature_payload(&payload, &self.object)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{Location, TopologySource};
    use std::path::PathBuf;
    use views::{FeatureSource, SourceError};

    #[test]
    fn urls_and_paths_are_told_apart() {
        assert_eq!(
            Location::parse("https://cdn.example/countries.json"),
            Location::Http("https://cdn.example/countries.json".into())
        );
        assert_eq!(
            Location::parse("data/countries.json"),
            Location::File(PathBuf::from("data/countries.json"))
        );
    }

    #[tokio::test]
    async fn reads_topology_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("land.json");
        std::fs::write(
            &path,
            r#"{"type": "Topology", "arcs": [[[0, 0], [5, 0], [5, 5], [0, 0]]],
                "objects": {"land": {"type": "GeometryCollection", "geometries": [
                    {"type": "Polygon", "id": "076", "arcs": [[0]]}
                ]}}}"#,
        )
        .unwrap();

        let chunk = TopologySource::new(Location::File(path.clone()), "land")
            .load_features()
            .await
            .unwrap();
        assert_eq!(chunk.features.len(), 1);
    }

    #[tokio::test]
    async fn missing_files_are_io_errors() {
        let source = TopologySource::new(
            Location::File(PathBuf::from("/definitely/not/here.json")),
            "countries",
        );
        let err = source.load_features().await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }
}
