use foundation::Rgba8;
use serde::{Deserialize, Serialize};

pub const MAX_VALUE: u8 = 100;

/// Sequential light -> dark color ramp over `[0, 100]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScale {
    pub light: Rgba8,
    pub dark: Rgba8,
}

impl Default for ColorScale {
    fn default() -> Self {
        Self {
            light: Rgba8::rgb(255, 224, 178),
            dark: Rgba8::rgb(204, 85, 0),
        }
    }
}

impl ColorScale {
    pub fn new(light: Rgba8, dark: Rgba8) -> Self {
        Self { light, dark }
    }

    /// Interpolated color, including the light endpoint at 0.
    pub fn sample(&self, value: u8) -> Rgba8 {
        let t = value.min(MAX_VALUE) as f64 / MAX_VALUE as f64;
        self.light.lerp(self.dark, t)
    }

    /// Choropleth color: 0 means "not colored" rather than the light endpoint.
    pub fn color_for(&self, value: u8) -> Option<Rgba8> {
        (value > 0).then(|| self.sample(value))
    }
}
