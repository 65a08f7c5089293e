use std::collections::HashMap;
use std::sync::Arc;

use catalog::{CountryCode, CountryGeometry, CountryRegistry};
use foundation::math::{Projection, Vec2, distance_to_segment};
use foundation::{Aabb2, Rgba8};

use crate::raster::RasterBuffer;

/// Feature boundary in pixel space under one projection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedPath {
    rings: Vec<Vec<Vec2>>,
    bounds: Option<Aabb2>,
}

impl ProjectedPath {
    pub fn project(geometry: &CountryGeometry, projection: &Projection) -> Self {
        let rings: Vec<Vec<Vec2>> = geometry
            .rings()
            .map(|ring| {
                ring.iter()
                    .filter(|p| p.is_finite())
                    .map(|p| projection.project(*p))
                    .collect::<Vec<_>>()
            })
            .filter(|ring| ring.len() >= 3)
            .collect();
        let bounds = Aabb2::from_points(rings.iter().flatten());
        Self { rings, bounds }
    }

    pub fn rings(&self) -> &[Vec<Vec2>] {
        &self.rings
    }

    pub fn bounds(&self) -> Option<Aabb2> {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Even-odd point test across all rings.
    pub fn contains(&self, p: Vec2) -> bool {
        let mut inside = false;
        for ring in &self.rings {
            for (a, b) in edges(ring) {
                if (a.y > p.y) != (b.y > p.y) {
                    let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                    if p.x < x {
                        inside = !inside;
                    }
                }
            }
        }
        inside
    }

    /// Visit every pixel whose centre lies inside the path (even-odd rule),
    /// clipped to `width × height`.
    pub fn for_each_covered_pixel(&self, width: u32, height: u32, mut f: impl FnMut(u32, u32)) {
        let Some(bounds) = self.bounds else {
            return;
        };
        let y_start = (bounds.min[1] - 0.5).ceil().max(0.0) as u32;
        let y_end = ((bounds.max[1] - 0.5).floor() + 1.0).clamp(0.0, height as f64) as u32;

        let mut crossings: Vec<f64> = Vec::new();
        for y in y_start..y_end {
            let sy = y as f64 + 0.5;
            crossings.clear();
            for ring in &self.rings {
                for (a, b) in edges(ring) {
                    if (a.y <= sy && sy < b.y) || (b.y <= sy && sy < a.y) {
                        crossings.push(a.x + (sy - a.y) * (b.x - a.x) / (b.y - a.y));
                    }
                }
            }
            crossings.sort_by(f64::total_cmp);

            for span in crossings.chunks_exact(2) {
                let x0 = (span[0] - 0.5).ceil().max(0.0);
                let x1 = (span[1] - 0.5).ceil().min(width as f64);
                if x1 <= x0 {
                    continue;
                }
                for x in x0 as u32..x1 as u32 {
                    f(x, y);
                }
            }
        }
    }
}

fn edges(ring: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let n = ring.len();
    (0..n).map(move |i| (ring[i], ring[(i + 1) % n]))
}

/// Fill `path` with `color` composited at `opacity`.
pub fn fill_path(raster: &mut RasterBuffer, path: &ProjectedPath, color: Rgba8, opacity: f32) {
    let (w, h) = (raster.width(), raster.height());
    path.for_each_covered_pixel(w, h, |x, y| raster.blend_pixel(x, y, color, opacity));
}

/// Stroke every ring of `path`. Coverage is taken from the pixel-centre
/// distance to the nearest segment, so each pixel is blended once.
pub fn stroke_path(
    raster: &mut RasterBuffer,
    path: &ProjectedPath,
    color: Rgba8,
    line_width: f64,
    opacity: f32,
) {
    if line_width <= 0.0 {
        return;
    }
    let half = line_width / 2.0;
    let reach = half + 0.5;
    let (w, h) = (raster.width() as i64, raster.height() as i64);

    let mut coverage: HashMap<(u32, u32), f32> = HashMap::new();
    for ring in path.rings() {
        for (a, b) in edges(ring) {
            let x0 = ((a.x.min(b.x) - reach).floor() as i64).max(0);
            let x1 = ((a.x.max(b.x) + reach).ceil() as i64).min(w);
            let y0 = ((a.y.min(b.y) - reach).floor() as i64).max(0);
            let y1 = ((a.y.max(b.y) + reach).ceil() as i64).min(h);
            for y in y0..y1 {
                for x in x0..x1 {
                    let centre = Vec2::new(x as f64 + 0.5, y as f64 + 0.5);
                    let c = (reach - distance_to_segment(centre, a, b)).clamp(0.0, 1.0) as f32;
                    if c <= 0.0 {
                        continue;
                    }
                    let slot = coverage.entry((x as u32, y as u32)).or_insert(0.0);
                    *slot = slot.max(c.min(line_width as f32));
                }
            }
        }
    }

    for ((x, y), c) in coverage {
        raster.blend_pixel(x, y, color, opacity * c);
    }
}

/// Every registry feature projected under one projection at one raster size.
#[derive(Debug, Clone)]
pub struct ProjectedView {
    projection: Projection,
    width: u32,
    height: u32,
    registry: Arc<CountryRegistry>,
    paths: Vec<ProjectedPath>,
}

impl ProjectedView {
    pub fn new(
        registry: Arc<CountryRegistry>,
        projection: Projection,
        width: u32,
        height: u32,
    ) -> Self {
        let paths = registry
            .features()
            .iter()
            .map(|feature| ProjectedPath::project(&feature.geometry, &projection))
            .collect();
        Self {
            projection,
            width,
            height,
            registry,
            paths,
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn registry(&self) -> &Arc<CountryRegistry> {
        &self.registry
    }

    /// Paths aligned with `registry().features()`.
    pub fn paths(&self) -> &[ProjectedPath] {
        &self.paths
    }

    pub fn path(&self, index: usize) -> Option<&ProjectedPath> {
        self.paths.get(index)
    }

    pub fn path_for(&self, code: CountryCode) -> Option<&ProjectedPath> {
        self.registry.index_of(code).and_then(|i| self.paths.get(i))
    }

    pub fn raster(&self) -> RasterBuffer {
        RasterBuffer::new(self.width, self.height)
    }
}
