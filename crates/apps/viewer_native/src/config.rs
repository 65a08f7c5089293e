use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use values::ColorScale;
use views::{RenderSettings, Viewport};

use crate::error::AppError;

pub const DEFAULT_TOPOLOGY_URL: &str =
    "https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json";
pub const DEFAULT_OBJECT: &str = "countries";

/// `--config` file contents. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Local path or http(s) URL of a TopoJSON/GeoJSON document.
    pub topology: String,
    /// TopoJSON object holding the country polygons.
    pub object: String,
    /// Initial flat map size.
    pub flat_size: Viewport,
    pub out_dir: PathBuf,
    /// Seed the store with the demonstration dataset.
    pub load_sample: bool,
    pub color_scale: ColorScale,
    pub render: RenderSettings,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            topology: DEFAULT_TOPOLOGY_URL.to_string(),
            object: DEFAULT_OBJECT.to_string(),
            flat_size: Viewport::new(960, 600),
            out_dir: PathBuf::from("out"),
            load_sample: false,
            color_scale: ColorScale::default(),
            render: RenderSettings::default(),
        }
    }
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_TOPOLOGY_URL, ViewerConfig};
    use foundation::Rgba8;
    use layers::{NeutralCoverage, ViewStyle};
    use pretty_assertions::assert_eq;
    use views::Viewport;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ViewerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.topology, DEFAULT_TOPOLOGY_URL);
        assert_eq!(config.render.sphere_size, Viewport::new(2048, 1024));
        assert_eq!(config.render.stipple.spacing, 4);
        assert_eq!(config.render.symbology.flat, ViewStyle::flat());
    }

    #[test]
    fn nested_overrides_merge_with_defaults() {
        let config = ViewerConfig::from_json_str(
            r##"{
                "topology": "data/countries-110m.json",
                "flat_size": {"width": 400, "height": 300},
                "color_scale": {"dark": "#800000"},
                "render": {
                    "sphere_size": {"width": 1024, "height": 512},
                    "symbology": {"neutral_coverage": "all_features"}
                }
            }"##,
        )
        .unwrap();

        assert_eq!(config.topology, "data/countries-110m.json");
        assert_eq!(config.object, "countries");
        assert_eq!(config.flat_size, Viewport::new(400, 300));
        assert_eq!(config.color_scale.dark, Rgba8::rgb(128, 0, 0));
        assert_eq!(config.color_scale.light, Rgba8::rgb(255, 224, 178));
        assert_eq!(config.render.sphere_size, Viewport::new(1024, 512));
        assert_eq!(
            config.render.symbology.neutral_coverage,
            NeutralCoverage::AllFeatures
        );
        assert_eq!(config.render.symbology.sphere, ViewStyle::sphere());
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(ViewerConfig::from_json_str(r#"{"flat_size": "big"}"#).is_err());
    }
}
