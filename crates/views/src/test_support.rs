use std::sync::Arc;

use catalog::{CountryCode, CountryCodeResolver, CountryRegistry};
use formats::VectorChunk;
use layers::RasterBuffer;

use crate::error::SourceError;
use crate::source::FeatureSource;
use crate::surface::{CanvasSurface, TextureSurface, Viewport};

pub const USA: CountryCode = CountryCode::from_static("USA");
pub const BRA: CountryCode = CountryCode::from_static("BRA");

pub const WORLD: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "id": "840",
         "geometry": {"type": "Polygon", "coordinates": [[[-120, 25], [-70, 25], [-70, 50], [-120, 50], [-120, 25]]]}},
        {"type": "Feature", "id": "076",
         "geometry": {"type": "Polygon", "coordinates": [[[-70, -30], [-40, -30], [-40, 0], [-70, 0], [-70, -30]]]}},
        {"type": "Feature", "id": "-99",
         "geometry": {"type": "Polygon", "coordinates": [[[100, -10], [120, -10], [120, 10], [100, 10], [100, -10]]]}}
    ]
}"#;

pub fn chunk() -> VectorChunk {
    VectorChunk::from_geojson_str(WORLD).expect("geojson")
}

pub fn registry() -> Arc<CountryRegistry> {
    Arc::new(CountryRegistry::build(&chunk(), &CountryCodeResolver::builtin()))
}

pub struct FailingSource;

impl FeatureSource for FailingSource {
    async fn load_features(&self) -> Result<VectorChunk, SourceError> {
        Err(SourceError::Fetch {
            url: "https://example.invalid/countries.json".into(),
            reason: "offline".into(),
        })
    }
}

#[derive(Debug, Default)]
pub struct RecordingTexture {
    pub uploads: Vec<RasterBuffer>,
}

impl TextureSurface for RecordingTexture {
    fn upload_texture(&mut self, raster: RasterBuffer) {
        self.uploads.push(raster);
    }
}

#[derive(Debug)]
pub struct RecordingCanvas {
    pub viewport: Viewport,
    pub paints: Vec<RasterBuffer>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            paints: Vec::new(),
        }
    }
}

impl CanvasSurface for RecordingCanvas {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn paint(&mut self, raster: RasterBuffer) {
        self.paints.push(raster);
    }
}
