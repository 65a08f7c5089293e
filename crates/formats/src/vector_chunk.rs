use foundation::math::LonLat;
use serde_json::{Map, Value};

pub type Ring = Vec<LonLat>;

#[derive(Debug, Clone, PartialEq)]
pub enum VectorGeometry {
    Point(LonLat),
    MultiPoint(Vec<LonLat>),
    LineString(Vec<LonLat>),
    MultiLineString(Vec<Vec<LonLat>>),
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl VectorGeometry {
    /// Polygonal geometry as a list of polygons; `None` for points and lines.
    pub fn polygons(&self) -> Option<Vec<Vec<Ring>>> {
        match self {
            VectorGeometry::Polygon(rings) => Some(vec![rings.clone()]),
            VectorGeometry::MultiPolygon(polys) => Some(polys.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorFeature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    /// `None` for features whose geometry is `null` in the source.
    pub geometry: Option<VectorGeometry>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorChunk {
    pub features: Vec<VectorFeature>,
}

#[derive(Debug, thiserror::Error)]
pub enum VectorChunkError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected GeoJSON FeatureCollection")]
    NotAFeatureCollection,
    #[error("invalid feature at index {index}: {reason}")]
    InvalidFeature { index: usize, reason: String },
}

impl VectorChunk {
    pub fn from_geojson_str(payload: &str) -> Result<Self, VectorChunkError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, VectorChunkError> {
        let obj = value
            .as_object()
            .ok_or(VectorChunkError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(VectorChunkError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(VectorChunkError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(VectorChunkError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.iter().enumerate() {
            let invalid = |reason: String| VectorChunkError::InvalidFeature { index, reason };

            let feat_obj = feat_val
                .as_object()
                .ok_or_else(|| invalid("feature must be an object".to_string()))?;

            let feat_type = feat_obj
                .get("type")
                .and_then(|v| v.as_str())
                .ok_or_else(|| invalid("feature missing type".to_string()))?;
            if feat_type != "Feature" {
                return Err(invalid(format!("unexpected feature type: {feat_type}")));
            }

            let geometry = match feat_obj.get("geometry") {
                None => return Err(invalid("feature missing geometry".to_string())),
                Some(Value::Null) => None,
                Some(geometry_val) => Some(parse_geometry(geometry_val).map_err(invalid)?),
            };

            features.push(VectorFeature {
                id: feature_id(feat_obj.get("id")),
                properties: feat_obj
                    .get("properties")
                    .and_then(|v| v.as_object())
                    .cloned()
                    .unwrap_or_default(),
                geometry,
            });
        }

        Ok(Self { features })
    }

    pub fn polygonal_feature_count(&self) -> usize {
        self.features
            .iter()
            .filter(|f| f.geometry.as_ref().and_then(|g| g.polygons()).is_some())
            .count()
    }
}

/// Feature ids may be strings or numbers; both are kept as text.
pub(crate) fn feature_id(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_geometry(value: &Value) -> Result<VectorGeometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(VectorGeometry::Point(parse_point(coords)?)),
        "MultiPoint" => Ok(VectorGeometry::MultiPoint(parse_points(coords)?)),
        "LineString" => Ok(VectorGeometry::LineString(parse_points(coords)?)),
        "MultiLineString" => Ok(VectorGeometry::MultiLineString(parse_lines(coords)?)),
        "Polygon" => Ok(VectorGeometry::Polygon(parse_polygon(coords)?)),
        "MultiPolygon" => Ok(VectorGeometry::MultiPolygon(parse_multi_polygon(coords)?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<LonLat, String> {
    let arr = coords
        .as_array()
        .ok_or("Point coordinates must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("Point coordinates must have [lon, lat]".to_string());
    }
    let lon = arr[0]
        .as_f64()
        .ok_or("Point lon must be a number".to_string())?;
    let lat = arr[1]
        .as_f64()
        .ok_or("Point lat must be a number".to_string())?;
    Ok(LonLat::new(lon, lat))
}

fn parse_points(coords: &Value) -> Result<Vec<LonLat>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?;
    arr.iter().map(parse_point).collect()
}

fn parse_lines(coords: &Value) -> Result<Vec<Vec<LonLat>>, String> {
    let arr = coords
        .as_array()
        .ok_or("MultiLineString coordinates must be an array".to_string())?;
    arr.iter().map(parse_points).collect()
}

fn parse_polygon(coords: &Value) -> Result<Vec<Ring>, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    rings.iter().map(parse_points).collect()
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Ring>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_polygon).collect()
}

#[cfg(test)]
mod tests {
    use super::{VectorChunk, VectorChunkError, VectorGeometry};
    use foundation::math::LonLat;

    const COUNTRIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "id": 840, "properties": {"name": "United States"},
             "geometry": {"type": "Polygon", "coordinates": [[[-120, 25], [-70, 25], [-70, 50], [-120, 50], [-120, 25]]]}},
            {"type": "Feature", "id": "036", "properties": {},
             "geometry": {"type": "MultiPolygon", "coordinates": [[[[115, -35], [150, -35], [150, -12], [115, -35]]]]}},
            {"type": "Feature", "id": "-99", "geometry": null},
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1, 2]}}
        ]
    }"#;

    #[test]
    fn parses_polygons_ids_and_null_geometry() {
        let chunk = VectorChunk::from_geojson_str(COUNTRIES).expect("parse VectorChunk");
        assert_eq!(chunk.features.len(), 4);
        assert_eq!(chunk.features[0].id.as_deref(), Some("840"));
        assert_eq!(chunk.features[1].id.as_deref(), Some("036"));
        assert!(chunk.features[2].geometry.is_none());
        assert!(chunk.features[3].id.is_none());
        assert_eq!(chunk.polygonal_feature_count(), 2);

        let Some(VectorGeometry::Polygon(rings)) = &chunk.features[0].geometry else {
            panic!("expected polygon");
        };
        assert_eq!(rings[0][1], LonLat::new(-70.0, 25.0));
    }

    #[test]
    fn rejects_non_collections_and_bad_features() {
        let err = VectorChunk::from_geojson_str(r#"{"type": "Feature"}"#).unwrap_err();
        assert!(matches!(err, VectorChunkError::NotAFeatureCollection));

        let err = VectorChunk::from_geojson_str(
            r#"{"type": "FeatureCollection", "features": [{"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[1]]]}}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, VectorChunkError::InvalidFeature { index: 0, .. }));

        let err = VectorChunk::from_geojson_str("{not json").unwrap_err();
        assert!(matches!(err, VectorChunkError::Json(_)));
    }
}
