//! Planar map projections (lon/lat degrees -> raster pixels).
//!
//! Both projections use the usual raster convention: x grows east, y grows
//! south, and `translate` is the pixel position of (0°, 0°).

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use super::{LonLat, Vec2};

/// Latitude at which the Mercator world extent becomes square (y = ±π·scale).
pub const MERCATOR_MAX_LAT_DEG: f64 = 85.051_128_779_806_6;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProjectionKind {
    Equirectangular,
    Mercator,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    pub kind: ProjectionKind,
    /// Pixels per radian.
    pub scale: f64,
    pub translate: Vec2,
}

/// Hashable identity of a projection instance, used as a cache key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectionKey {
    pub kind: ProjectionKind,
    scale_bits: u64,
    translate_bits: [u64; 2],
}

impl Projection {
    pub fn new(kind: ProjectionKind, scale: f64, translate: Vec2) -> Self {
        Self {
            kind,
            scale,
            translate,
        }
    }

    /// Equirectangular projection where 360°×180° covers the raster exactly.
    pub fn equirectangular_fit(width: u32, height: u32) -> Self {
        Self::new(
            ProjectionKind::Equirectangular,
            width as f64 / TAU,
            Vec2::new(width as f64 / 2.0, height as f64 / 2.0),
        )
    }

    /// Mercator projection centred in the viewport, one world ≈ 1.05 widths.
    pub fn mercator_fit(width: u32, height: u32) -> Self {
        Self::new(
            ProjectionKind::Mercator,
            width as f64 / 6.0,
            Vec2::new(width as f64 / 2.0, height as f64 / 2.0),
        )
    }

    pub fn project(&self, p: LonLat) -> Vec2 {
        let lambda = p.lon_rad();
        let y = match self.kind {
            ProjectionKind::Equirectangular => p.lat_rad(),
            ProjectionKind::Mercator => {
                let phi = p
                    .lat_deg
                    .clamp(-MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG)
                    .to_radians();
                (FRAC_PI_4 + phi / 2.0).tan().ln()
            }
        };
        Vec2::new(
            self.translate.x + self.scale * lambda,
            self.translate.y - self.scale * y,
        )
    }

    pub fn invert(&self, p: Vec2) -> LonLat {
        let lambda = (p.x - self.translate.x) / self.scale;
        let y = (self.translate.y - p.y) / self.scale;
        let phi = match self.kind {
            ProjectionKind::Equirectangular => y,
            ProjectionKind::Mercator => 2.0 * y.exp().atan() - FRAC_PI_2,
        };
        LonLat::new(lambda.to_degrees(), phi.to_degrees())
    }

    pub fn key(&self) -> ProjectionKey {
        ProjectionKey {
            kind: self.kind,
            scale_bits: self.scale.to_bits(),
            translate_bits: [self.translate.x.to_bits(), self.translate.y.to_bits()],
        }
    }
}
