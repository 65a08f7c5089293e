use std::collections::BTreeMap;

use foundation::Rgba8;
use foundation::math::{ProjectionKey, ProjectionKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::raster::RasterBuffer;
use crate::vector::ProjectedView;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StippleStyle {
    /// Grid pitch in pixels; the grid starts at (0, 0).
    pub spacing: u32,
    pub dot_radius: f64,
    pub dot_color: Rgba8,
    pub dot_opacity: f32,
}

impl Default for StippleStyle {
    fn default() -> Self {
        Self {
            spacing: 4,
            dot_radius: 1.0,
            dot_color: Rgba8::WHITE,
            dot_opacity: 0.15,
        }
    }
}

/// Binary land/water mask: union of every feature, filled solid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandMask {
    width: u32,
    height: u32,
    land: Vec<bool>,
}

impl LandMask {
    pub fn render(view: &ProjectedView) -> Self {
        let (width, height) = (view.width(), view.height());
        let mut land = vec![false; width as usize * height as usize];
        for path in view.paths() {
            path.for_each_covered_pixel(width, height, |x, y| {
                land[(y * width + x) as usize] = true;
            });
        }
        Self {
            width,
            height,
            land,
        }
    }

    pub fn is_land(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.land[(y * self.width + x) as usize]
    }

    pub fn land_pixels(&self) -> usize {
        self.land.iter().filter(|l| **l).count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct StippleMaskRenderer {
    style: StippleStyle,
}

impl StippleMaskRenderer {
    pub fn new(style: StippleStyle) -> Self {
        Self { style }
    }

    /// Transparent raster with one dot per land grid point.
    pub fn render(&self, view: &ProjectedView) -> RasterBuffer {
        let mask = LandMask::render(view);
        let mut out = view.raster();
        let step = self.style.spacing.max(1) as usize;

        for gy in (0..view.height()).step_by(step) {
            for gx in (0..view.width()).step_by(step) {
                if mask.is_land(gx, gy) {
                    self.paint_dot(&mut out, gx as f64, gy as f64);
                }
            }
        }
        out
    }

    fn paint_dot(&self, raster: &mut RasterBuffer, cx: f64, cy: f64) {
        let r = self.style.dot_radius;
        let reach = r + 0.5;
        let x0 = (cx - reach).floor().max(0.0) as u32;
        let y0 = (cy - reach).floor().max(0.0) as u32;
        let x1 = ((cx + reach).ceil() as u32).min(raster.width());
        let y1 = ((cy + reach).ceil() as u32).min(raster.height());

        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                let coverage = (reach - (dx * dx + dy * dy).sqrt()).clamp(0.0, 1.0) as f32;
                if coverage > 0.0 {
                    raster.blend_pixel(x, y, self.style.dot_color, self.style.dot_opacity * coverage);
                }
            }
        }
    }
}

/// Identity of a stipple raster: which projection, at which size.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StippleKey {
    pub projection: ProjectionKey,
    pub width: u32,
    pub height: u32,
}

impl StippleKey {
    pub fn of(view: &ProjectedView) -> Self {
        Self {
            projection: view.projection().key(),
            width: view.width(),
            height: view.height(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Hit,
    Miss,
}

/// Last stipple raster per projection kind.
///
/// Valid only while the features behind the views do not change; the
/// registry is immutable once built, so a key match means identical output.
#[derive(Debug, Default)]
pub struct StippleCache {
    renderer: StippleMaskRenderer,
    entries: BTreeMap<ProjectionKind, (StippleKey, RasterBuffer)>,
}

impl StippleCache {
    pub fn new(renderer: StippleMaskRenderer) -> Self {
        Self {
            renderer,
            entries: BTreeMap::new(),
        }
    }

    pub fn stipple_for(&mut self, view: &ProjectedView) -> (&RasterBuffer, CacheLookup) {
        let key = StippleKey::of(view);
        let kind = key.projection.kind;

        let hit = self
            .entries
            .get(&kind)
            .is_some_and(|(cached, _)| *cached == key);
        if !hit {
            debug!(?kind, width = key.width, height = key.height, "rendering stipple mask");
            self.entries.remove(&kind);
        }

        let renderer = &self.renderer;
        let (_, raster) = self
            .entries
            .entry(kind)
            .or_insert_with(|| (key, renderer.render(view)));
        let lookup = if hit { CacheLookup::Hit } else { CacheLookup::Miss };
        (&*raster, lookup)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
