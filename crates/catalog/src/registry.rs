use std::collections::BTreeMap;

use formats::{Ring, VectorChunk};
use tracing::{debug, info};

use crate::code::CountryCode;
use crate::resolver::CountryCodeResolver;

/// Polygonal boundary normalised to a multipolygon in lon/lat degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryGeometry {
    pub polygons: Vec<Vec<Ring>>,
}

impl CountryGeometry {
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.polygons.iter().flatten()
    }

    pub fn vertex_count(&self) -> usize {
        self.rings().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryFeature {
    /// Identifier as found in the source data.
    pub id: String,
    pub code: Option<CountryCode>,
    pub geometry: CountryGeometry,
}

/// Immutable set of country features, indexed by resolved code.
///
/// Unresolved features are kept so they still contribute to the land mask.
#[derive(Debug, Clone, Default)]
pub struct CountryRegistry {
    features: Vec<CountryFeature>,
    by_code: BTreeMap<CountryCode, usize>,
}

impl CountryRegistry {
    pub fn build(chunk: &VectorChunk, resolver: &CountryCodeResolver) -> Self {
        let mut features = Vec::with_capacity(chunk.features.len());
        let mut by_code = BTreeMap::new();

        for (source_index, feature) in chunk.features.iter().enumerate() {
            let Some(polygons) = feature.geometry.as_ref().and_then(|g| g.polygons()) else {
                debug!(source_index, id = ?feature.id, "skipping non-polygonal feature");
                continue;
            };

            let id = feature.id.clone().unwrap_or_default();
            let code = resolver.resolve(&id);
            let index = features.len();
            if let Some(code) = code {
                if let Some(previous) = by_code.insert(code, index) {
                    debug!(%code, previous, index, "duplicate country code, later feature wins");
                }
            }

            features.push(CountryFeature {
                id,
                code,
                geometry: CountryGeometry { polygons },
            });
        }

        info!(
            features = features.len(),
            resolved = by_code.len(),
            "country registry built"
        );
        Self { features, by_code }
    }

    pub fn features(&self) -> &[CountryFeature] {
        &self.features
    }

    pub fn feature(&self, index: usize) -> Option<&CountryFeature> {
        self.features.get(index)
    }

    pub fn index_of(&self, code: CountryCode) -> Option<usize> {
        self.by_code.get(&code).copied()
    }

    pub fn feature_for(&self, code: CountryCode) -> Option<&CountryFeature> {
        self.index_of(code).and_then(|i| self.features.get(i))
    }

    /// Features that own their code, in registry order.
    pub fn resolved(&self) -> impl Iterator<Item = (usize, &CountryFeature)> {
        self.features.iter().enumerate().filter(|(index, feature)| {
            feature
                .code
                .is_some_and(|code| self.by_code.get(&code) == Some(index))
        })
    }

    pub fn codes(&self) -> Vec<CountryCode> {
        self.by_code.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::CountryRegistry;
    use crate::code::CountryCode;
    use crate::resolver::CountryCodeResolver;
    use formats::VectorChunk;
    use pretty_assertions::assert_eq;

    const DATA: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "id": "840",
             "geometry": {"type": "Polygon", "coordinates": [[[-120, 25], [-70, 25], [-70, 50], [-120, 50], [-120, 25]]]}},
            {"type": "Feature", "id": "-99",
             "geometry": {"type": "Polygon", "coordinates": [[[20, 42], [21, 42], [21, 43], [20, 42]]]}},
            {"type": "Feature", "id": "124",
             "geometry": {"type": "MultiPolygon", "coordinates": [
                [[[-120, 50], [-60, 50], [-60, 70], [-120, 50]]],
                [[[-80, 72], [-70, 72], [-70, 80], [-80, 72]]]
             ]}},
            {"type": "Feature", "id": "036", "geometry": {"type": "Point", "coordinates": [134, -25]}},
            {"type": "Feature", "id": "250", "geometry": null}
        ]
    }"#;

    fn registry() -> CountryRegistry {
        let chunk = VectorChunk::from_geojson_str(DATA).expect("geojson");
        CountryRegistry::build(&chunk, &CountryCodeResolver::builtin())
    }

    #[test]
    fn keeps_polygonal_features_and_indexes_resolved_codes() {
        let reg = registry();
        assert_eq!(reg.len(), 3);
        assert_eq!(
            reg.codes(),
            vec![CountryCode::from_static("CAN"), CountryCode::from_static("USA")]
        );

        let unresolved = reg.feature(1).expect("feature");
        assert_eq!(unresolved.id, "-99");
        assert!(unresolved.code.is_none());

        let can = reg
            .feature_for(CountryCode::from_static("CAN"))
            .expect("CAN");
        assert_eq!(can.geometry.polygons.len(), 2);
        assert_eq!(can.geometry.vertex_count(), 8);
    }

    #[test]
    fn non_polygonal_and_null_features_are_dropped() {
        let reg = registry();
        assert!(reg.feature_for(CountryCode::from_static("AUS")).is_none());
        assert!(reg.feature_for(CountryCode::from_static("FRA")).is_none());
    }

    #[test]
    fn duplicate_codes_keep_the_last_feature() {
        let data = DATA.replace("\"id\": \"124\"", "\"id\": \"840\"");
        let chunk = VectorChunk::from_geojson_str(&data).expect("geojson");
        let reg = CountryRegistry::build(&chunk, &CountryCodeResolver::builtin());

        let usa = CountryCode::from_static("USA");
        assert_eq!(reg.index_of(usa), Some(2));
        let resolved: Vec<usize> = reg.resolved().map(|(i, _)| i).collect();
        assert_eq!(resolved, vec![2]);
    }
}
