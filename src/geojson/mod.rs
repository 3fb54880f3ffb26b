//! Minimal GeoJSON model covering what the delineation service exchanges.
//!
//! Catchments come back as a `FeatureCollection` of `Polygon` /
//! `MultiPolygon` features; outlets go out as `Point` features. Everything
//! round-trips through serde so the exported file is a drop-in replacement
//! for the service response, with `properties` preserved verbatim.

pub mod io;

use serde::{Deserialize, Serialize};

/// A single GeoJSON position: `(longitude, latitude)`.
///
/// Serde maps the tuple to the `[x, y]` array form on the wire. The model
/// is strictly 2-D; the delineation service never emits altitude.
pub type Position = (f64, f64);

/// The geometry types the service exchanges, tagged by `"type"` as GeoJSON
/// requires. Anything else in a response is a hard parse error rather than
/// a silently dropped feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    LineString { coordinates: Vec<Position> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
}

impl Geometry {
    /// Total number of positions in this geometry, counting every ring.
    pub fn vertex_count(&self) -> usize {
        match self {
            Geometry::Point { .. } => 1,
            Geometry::LineString { coordinates } => coordinates.len(),
            Geometry::Polygon { coordinates } => coordinates.iter().map(Vec::len).sum(),
            Geometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .flat_map(|polygon| polygon.iter())
                .map(Vec::len)
                .sum(),
        }
    }

    /// Number of linear rings (zero for points and line strings).
    pub fn ring_count(&self) -> usize {
        match self {
            Geometry::Point { .. } | Geometry::LineString { .. } => 0,
            Geometry::Polygon { coordinates } => coordinates.len(),
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().map(Vec::len).sum()
            }
        }
    }

    /// Visit every position in the geometry, ring by ring.
    pub fn for_each_position<F: FnMut(Position)>(&self, f: &mut F) {
        match self {
            Geometry::Point { coordinates } => f(*coordinates),
            Geometry::LineString { coordinates } => {
                coordinates.iter().for_each(|&p| f(p));
            }
            Geometry::Polygon { coordinates } => {
                for ring in coordinates {
                    ring.iter().for_each(|&p| f(p));
                }
            }
            Geometry::MultiPolygon { coordinates } => {
                for polygon in coordinates {
                    for ring in polygon {
                        ring.iter().for_each(|&p| f(p));
                    }
                }
            }
        }
    }
}

/// A GeoJSON feature. `properties` is carried as raw JSON so whatever the
/// service attaches (areas, cell counts, ids) survives simplification and
/// export untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_type")]
    pub type_: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
}

fn feature_type() -> String {
    "Feature".to_string()
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            type_: feature_type(),
            geometry,
            properties: serde_json::Value::Null,
            id: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.geometry.vertex_count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "collection_type")]
    pub type_: String,
    pub features: Vec<Feature>,
}

fn collection_type() -> String {
    "FeatureCollection".to_string()
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            type_: collection_type(),
            features,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.features.iter().map(Feature::vertex_count).sum()
    }

    pub fn ring_count(&self) -> usize {
        self.features.iter().map(|f| f.geometry.ring_count()).sum()
    }

    pub fn for_each_position<F: FnMut(Position)>(&self, f: &mut F) {
        for feature in &self.features {
            feature.geometry.for_each_position(f);
        }
    }
}

/// A service response body: some deployments return a bare `Feature` for a
/// single-outlet request, others always wrap in a `FeatureCollection`.
/// Accept both and normalize to a collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Document {
    Collection(FeatureCollection),
    Feature(Box<Feature>),
}

impl Document {
    pub fn into_collection(self) -> FeatureCollection {
        match self {
            Document::Collection(collection) => collection,
            Document::Feature(feature) => FeatureCollection::new(vec![*feature]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A toy catchment in the shape the pysheds-backed service returns.
    fn catchment_json() -> &'static str {
        r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"id": 0},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [-116.1, 44.0],
                        [-116.2, 44.1],
                        [-116.1, 44.2],
                        [-116.0, 44.1],
                        [-116.1, 44.0]
                    ]]
                }
            }]
        }"#
    }

    #[test]
    fn test_parse_catchment_response() {
        let collection: FeatureCollection = serde_json::from_str(catchment_json()).unwrap();
        assert_eq!(collection.features.len(), 1);
        assert_eq!(collection.vertex_count(), 5);
        assert_eq!(collection.ring_count(), 1);

        let Geometry::Polygon { coordinates } = &collection.features[0].geometry else {
            panic!("expected a polygon");
        };
        // Closed ring: first position equals last
        assert_eq!(coordinates[0].first(), coordinates[0].last());
    }

    #[test]
    fn test_serialize_round_trip_preserves_properties() {
        let collection: FeatureCollection = serde_json::from_str(catchment_json()).unwrap();
        let json = serde_json::to_string(&collection).unwrap();
        let reparsed: FeatureCollection = serde_json::from_str(&json).unwrap();
        assert_eq!(reparsed, collection);
        assert_eq!(reparsed.features[0].properties["id"], 0);
    }

    #[test]
    fn test_document_accepts_bare_feature() {
        let json = r#"{
            "type": "Feature",
            "properties": null,
            "geometry": {"type": "Point", "coordinates": [-116.1, 44.0]}
        }"#;

        let document: Document = serde_json::from_str(json).unwrap();
        let collection = document.into_collection();
        assert_eq!(collection.features.len(), 1);
        assert_eq!(
            collection.features[0].geometry,
            Geometry::Point {
                coordinates: (-116.1, 44.0)
            }
        );
    }

    #[test]
    fn test_multipolygon_counts() {
        let geometry = Geometry::MultiPolygon {
            coordinates: vec![
                vec![vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]],
                vec![
                    vec![(5.0, 5.0), (6.0, 5.0), (6.0, 6.0), (5.0, 5.0)],
                    vec![(5.2, 5.2), (5.8, 5.2), (5.8, 5.8), (5.2, 5.2)],
                ],
            ],
        };

        assert_eq!(geometry.ring_count(), 3);
        assert_eq!(geometry.vertex_count(), 12);

        let mut seen = 0;
        geometry.for_each_position(&mut |_| seen += 1);
        assert_eq!(seen, 12);
    }

    #[test]
    fn test_unknown_geometry_type_is_an_error() {
        let json = r#"{"type": "Ellipse", "coordinates": [0.0, 0.0]}"#;
        assert!(serde_json::from_str::<Geometry>(json).is_err());
    }
}
