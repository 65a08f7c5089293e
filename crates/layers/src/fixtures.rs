use std::sync::Arc;

use catalog::{CountryCode, CountryCodeResolver, CountryRegistry};
use formats::VectorChunk;
use foundation::math::Projection;

use crate::vector::ProjectedView;

pub const USA: CountryCode = CountryCode::from_static("USA");
pub const CAN: CountryCode = CountryCode::from_static("CAN");
pub const BRA: CountryCode = CountryCode::from_static("BRA");

/// Three tracked countries plus one unresolved island, as coarse boxes.
pub const WORLD: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "id": "840",
         "geometry": {"type": "Polygon", "coordinates": [[[-120, 25], [-70, 25], [-70, 50], [-120, 50], [-120, 25]]]}},
        {"type": "Feature", "id": "124",
         "geometry": {"type": "Polygon", "coordinates": [[[-120, 52], [-60, 52], [-60, 70], [-120, 70], [-120, 52]]]}},
        {"type": "Feature", "id": "076",
         "geometry": {"type": "Polygon", "coordinates": [[[-70, -30], [-40, -30], [-40, 0], [-70, 0], [-70, -30]]]}},
        {"type": "Feature", "id": "-99",
         "geometry": {"type": "Polygon", "coordinates": [[[100, -10], [120, -10], [120, 10], [100, 10], [100, -10]]]}}
    ]
}"#;

pub fn registry() -> Arc<CountryRegistry> {
    let chunk = VectorChunk::from_geojson_str(WORLD).expect("geojson");
    Arc::new(CountryRegistry::build(&chunk, &CountryCodeResolver::builtin()))
}

pub fn sphere_view() -> ProjectedView {
    ProjectedView::new(registry(), Projection::equirectangular_fit(360, 180), 360, 180)
}

pub fn flat_view(width: u32, height: u32) -> ProjectedView {
    ProjectedView::new(registry(), Projection::mercator_fit(width, height), width, height)
}
