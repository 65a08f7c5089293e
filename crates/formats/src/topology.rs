//! TopoJSON decoding.
//!
//! A topology stores shared boundaries once as `arcs`; polygons reference
//! arcs by index, with `!i` (negative index) meaning "arc i reversed".
//! Quantized topologies delta-encode arc positions and carry a `transform`.

use std::collections::BTreeMap;

use foundation::math::LonLat;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::vector_chunk::{Ring, VectorChunk, VectorFeature, VectorGeometry, feature_id};

#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub transform: Option<TopologyTransform>,
    pub arcs: Vec<Vec<Vec<f64>>>,
    pub objects: BTreeMap<String, TopoGeometry>,
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct TopologyTransform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopoGeometry {
    /// `None` when the geometry type is `null`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub arcs: Option<Value>,
    #[serde(default)]
    pub coordinates: Option<Value>,
    #[serde(default)]
    pub geometries: Option<Vec<TopoGeometry>>,
}

#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a TopoJSON Topology, found type {0:?}")]
    NotATopology(String),
    #[error("topology has no object named {name:?} (available: {available:?})")]
    UnknownObject {
        name: String,
        available: Vec<String>,
    },
    #[error("arc {index} has a position with fewer than two coordinates")]
    InvalidPosition { index: usize },
    #[error("arc reference {index} is out of range ({count} arcs)")]
    InvalidArcIndex { index: i64, count: usize },
    #[error("geometry {index} has malformed arcs: {reason}")]
    InvalidArcs { index: usize, reason: String },
}

impl Topology {
    pub fn from_json_str(payload: &str) -> Result<Self, TopologyError> {
        let topology: Topology = serde_json::from_str(payload)?;
        topology.validate_kind()
    }

    pub fn from_json_value(value: Value) -> Result<Self, TopologyError> {
        let topology: Topology = serde_json::from_value(value)?;
        topology.validate_kind()
    }

    fn validate_kind(self) -> Result<Self, TopologyError> {
        if self.kind != "Topology" {
            return Err(TopologyError::NotATopology(self.kind));
        }
        Ok(self)
    }

    pub fn object_names(&self) -> Vec<String> {
        self.objects.keys().cloned().collect()
    }

    /// Arcs in absolute lon/lat, with delta decoding and transform applied.
    pub fn decode_arcs(&self) -> Result<Vec<Vec<LonLat>>, TopologyError> {
        let mut out = Vec::with_capacity(self.arcs.len());
        for (index, arc) in self.arcs.iter().enumerate() {
            let mut points = Vec::with_capacity(arc.len());
            let (mut x, mut y) = (0.0, 0.0);
            for position in arc {
                // Extra dimensions (elevation etc.) are ignored.
                if position.len() < 2 {
                    return Err(TopologyError::InvalidPosition { index });
                }
                points.push(self.apply_transform(&mut x, &mut y, position[0], position[1]));
            }
            out.push(points);
        }
        Ok(out)
    }

    fn apply_transform(&self, x: &mut f64, y: &mut f64, px: f64, py: f64) -> LonLat {
        match self.transform {
            Some(t) => {
                *x += px;
                *y += py;
                LonLat::new(
                    *x * t.scale[0] + t.translate[0],
                    *y * t.scale[1] + t.translate[1],
                )
            }
            None => LonLat::new(px, py),
        }
    }

    /// Convert one named object into a feature collection.
    ///
    /// A `GeometryCollection` yields one feature per member geometry; any
    /// other object yields a single feature.
    pub fn feature_collection(&self, object: &str) -> Result<VectorChunk, TopologyError> {
        let Some(root) = self.objects.get(object) else {
            return Err(TopologyError::UnknownObject {
                name: object.to_string(),
                available: self.object_names(),
            });
        };
        let arcs = self.decode_arcs()?;

        let members: Vec<&TopoGeometry> = match (root.kind.as_deref(), &root.geometries) {
            (Some("GeometryCollection"), Some(geometries)) => geometries.iter().collect(),
            (Some("GeometryCollection"), None) => Vec::new(),
            _ => vec![root],
        };

        let mut features = Vec::with_capacity(members.len());
        for (index, geom) in members.into_iter().enumerate() {
            features.push(VectorFeature {
                id: feature_id(geom.id.as_ref()),
                properties: geom.properties.clone().unwrap_or_default(),
                geometry: decode_geometry(geom, &arcs, index)?,
            });
        }
        Ok(VectorChunk { features })
    }
}

fn decode_geometry(
    geom: &TopoGeometry,
    arcs: &[Vec<LonLat>],
    index: usize,
) -> Result<Option<VectorGeometry>, TopologyError> {
    let malformed = |e: serde_json::Error| TopologyError::InvalidArcs {
        index,
        reason: e.to_string(),
    };
    let arc_refs = || geom.arcs.clone().unwrap_or(Value::Null);

    match geom.kind.as_deref() {
        Some("Polygon") => {
            let rings: Vec<Vec<i64>> = serde_json::from_value(arc_refs()).map_err(malformed)?;
            Ok(Some(VectorGeometry::Polygon(stitch_polygon(&rings, arcs)?)))
        }
        Some("MultiPolygon") => {
            let polys: Vec<Vec<Vec<i64>>> =
                serde_json::from_value(arc_refs()).map_err(malformed)?;
            let mut out = Vec::with_capacity(polys.len());
            for rings in &polys {
                out.push(stitch_polygon(rings, arcs)?);
            }
            Ok(Some(VectorGeometry::MultiPolygon(out)))
        }
        Some("LineString") => {
            let refs: Vec<i64> = serde_json::from_value(arc_refs()).map_err(malformed)?;
            Ok(Some(VectorGeometry::LineString(stitch_line(&refs, arcs)?)))
        }
        Some("MultiLineString") => {
            let lines: Vec<Vec<i64>> = serde_json::from_value(arc_refs()).map_err(malformed)?;
            let mut out = Vec::with_capacity(lines.len());
            for refs in &lines {
                out.push(stitch_line(refs, arcs)?);
            }
            Ok(Some(VectorGeometry::MultiLineString(out)))
        }
        // Points carry inline (possibly quantized) coordinates; nothing in the
        // renderer consumes them, so they are dropped like null geometries.
        _ => Ok(None),
    }
}

fn stitch_polygon(rings: &[Vec<i64>], arcs: &[Vec<LonLat>]) -> Result<Vec<Ring>, TopologyError> {
    let mut out = Vec::with_capacity(rings.len());
    for refs in rings {
        let mut ring = stitch_line(refs, arcs)?;
        if let Some(first) = ring.first().copied() {
            while ring.len() < 4 {
                ring.push(first);
            }
        }
        out.push(ring);
    }
    Ok(out)
}

/// Concatenate arcs, dropping the duplicated junction point between them.
fn stitch_line(refs: &[i64], arcs: &[Vec<LonLat>]) -> Result<Vec<LonLat>, TopologyError> {
    let mut points: Vec<LonLat> = Vec::new();
    for &r in refs {
        let (idx, reversed) = if r < 0 { (!r, true) } else { (r, false) };
        let arc = usize::try_from(idx)
            .ok()
            .and_then(|i| arcs.get(i))
            .ok_or(TopologyError::InvalidArcIndex {
                index: r,
                count: arcs.len(),
            })?;

        points.pop();
        let start = points.len();
        points.extend_from_slice(arc);
        if reversed {
            points[start..].reverse();
        }
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::{Topology, TopologyError};
    use crate::vector_chunk::VectorGeometry;
    use foundation::math::LonLat;
    use pretty_assertions::assert_eq;

    const TOPOLOGY: &str = r#"{
        "type": "Topology",
        "transform": {"scale": [2.0, 1.0], "translate": [100.0, -50.0]},
        "objects": {
            "countries": {"type": "GeometryCollection", "geometries": [
                {"type": "Polygon", "id": "840", "arcs": [[0, 1]]},
                {"type": "MultiPolygon", "id": 36, "arcs": [[[-1, 2]]], "properties": {"name": "Australia"}},
                {"type": null, "id": "010"}
            ]},
            "land": {"type": "Polygon", "arcs": [[0, 1]]}
        },
        "arcs": [
            [[0, 0], [0, 10]],
            [[0, 10], [10, 0], [0, -10], [-10, 0]],
            [[0, 0], [-10, 0], [0, 10], [10, 0]]
        ]
    }"#;

    fn ll(lon: f64, lat: f64) -> LonLat {
        LonLat::new(lon, lat)
    }

    #[test]
    fn decodes_quantized_delta_arcs() {
        let topo = Topology::from_json_str(TOPOLOGY).expect("topology");
        let arcs = topo.decode_arcs().expect("arcs");
        assert_eq!(arcs[0], vec![ll(100.0, -50.0), ll(100.0, -40.0)]);
        assert_eq!(arcs[2][1], ll(80.0, -50.0));
    }

    #[test]
    fn stitches_shared_and_reversed_arcs() {
        let topo = Topology::from_json_str(TOPOLOGY).expect("topology");
        let chunk = topo.feature_collection("countries").expect("countries");
        assert_eq!(chunk.features.len(), 3);

        assert_eq!(chunk.features[0].id.as_deref(), Some("840"));
        let Some(VectorGeometry::Polygon(rings)) = &chunk.features[0].geometry else {
            panic!("expected polygon");
        };
        assert_eq!(
            rings[0],
            vec![
                ll(100.0, -50.0),
                ll(100.0, -40.0),
                ll(120.0, -40.0),
                ll(120.0, -50.0),
                ll(100.0, -50.0),
            ]
        );

        assert_eq!(chunk.features[1].id.as_deref(), Some("36"));
        assert_eq!(
            chunk.features[1].properties.get("name").and_then(|v| v.as_str()),
            Some("Australia")
        );
        let Some(VectorGeometry::MultiPolygon(polys)) = &chunk.features[1].geometry else {
            panic!("expected multipolygon");
        };
        assert_eq!(
            polys[0][0],
            vec![
                ll(100.0, -40.0),
                ll(100.0, -50.0),
                ll(80.0, -50.0),
                ll(80.0, -40.0),
                ll(100.0, -40.0),
            ]
        );

        assert!(chunk.features[2].geometry.is_none());
    }

    #[test]
    fn single_geometry_objects_become_one_feature() {
        let topo = Topology::from_json_str(TOPOLOGY).expect("topology");
        let chunk = topo.feature_collection("land").expect("land");
        assert_eq!(chunk.features.len(), 1);
        assert_eq!(chunk.polygonal_feature_count(), 1);
    }

    #[test]
    fn reports_unknown_objects_and_bad_arc_refs() {
        let topo = Topology::from_json_str(TOPOLOGY).expect("topology");
        let err = topo.feature_collection("rivers").unwrap_err();
        let TopologyError::UnknownObject { available, .. } = err else {
            panic!("expected UnknownObject, got {err:?}");
        };
        assert_eq!(available, vec!["countries".to_string(), "land".to_string()]);

        let bad = TOPOLOGY.replace("[[0, 1]]}", "[[0, 7]]}");
        let topo = Topology::from_json_str(&bad).expect("topology");
        assert!(matches!(
            topo.feature_collection("countries"),
            Err(TopologyError::InvalidArcIndex { index: 7, count: 3 })
        ));
    }

    #[test]
    fn rejects_other_document_types() {
        let err = Topology::from_json_str(r#"{"type": "FeatureCollection", "arcs": [], "objects": {}}"#)
            .unwrap_err();
        assert!(matches!(err, TopologyError::NotATopology(kind) if kind == "FeatureCollection"));
    }
}
