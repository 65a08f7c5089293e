use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 8-bit RGBA color with straight (non-premultiplied) alpha.
///
/// Serialized as a CSS hex string (`#rrggbb` or `#rrggbbaa`).
#[repr(C)]
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Pod, Zeroable, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {input:?}: expected #rrggbb or #rrggbbaa")]
pub struct ParseColorError {
    pub input: String,
}

impl Rgba8 {
    pub const TRANSPARENT: Rgba8 = Rgba8::new(0, 0, 0, 0);
    pub const WHITE: Rgba8 = Rgba8::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// CSS-style `rgba(r, g, b, alpha)` with a fractional alpha.
    pub fn with_alpha(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self::new(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    pub fn alpha(self) -> f32 {
        self.a as f32 / 255.0
    }

    /// Per-channel linear interpolation, rounded to the nearest integer.
    pub fn lerp(self, other: Rgba8, t: f64) -> Rgba8 {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba8::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    pub fn parse_hex(input: &str) -> Result<Self, ParseColorError> {
        let err = || ParseColorError {
            input: input.to_string(),
        };
        let hex = input.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Rgba8::new(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgba8::parse_hex(&value)
    }
}

impl From<Rgba8> for String {
    fn from(value: Rgba8) -> Self {
        value.to_hex()
    }
}

impl std::fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}
