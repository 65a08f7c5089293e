use foundation::Rgba8;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Rgba8,
    /// Line width in pixels.
    pub width: f64,
}

/// Paint parameters for one view. Missing fields fall back to the sphere
/// look.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewStyle {
    pub ocean: Rgba8,
    pub neutral_fill: Rgba8,
    /// Applied to the neutral base, the value fills and the borders.
    pub overlay_opacity: f32,
    pub stroke: StrokeStyle,
}

impl ViewStyle {
    pub fn sphere() -> Self {
        Self {
            ocean: Rgba8::with_alpha(10, 20, 40, 0.3),
            neutral_fill: Rgba8::with_alpha(255, 255, 255, 0.8),
            overlay_opacity: 0.8,
            stroke: StrokeStyle {
                color: Rgba8::with_alpha(255, 255, 255, 0.2),
                width: 0.5,
            },
        }
    }

    pub fn flat() -> Self {
        Self {
            ocean: Rgba8::with_alpha(10, 20, 40, 0.5),
            stroke: StrokeStyle {
                color: Rgba8::with_alpha(255, 255, 255, 0.3),
                width: 1.0,
            },
            ..Self::sphere()
        }
    }
}

impl Default for ViewStyle {
    fn default() -> Self {
        Self::sphere()
    }
}

/// Which features receive the neutral base fill.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeutralCoverage {
    /// Only features with a resolved country code.
    #[default]
    ResolvedOnly,
    AllFeatures,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Symbology {
    pub sphere: ViewStyle,
    pub flat: ViewStyle,
    pub neutral_coverage: NeutralCoverage,
}

impl Default for Symbology {
    fn default() -> Self {
        Self {
            sphere: ViewStyle::sphere(),
            flat: ViewStyle::flat(),
            neutral_coverage: NeutralCoverage::default(),
        }
    }
}
