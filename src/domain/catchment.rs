//! A delineated catchment and its simplified views.

use crate::geojson::{Feature, FeatureCollection, Geometry, Position};
use crate::geometry::{GeometryError, simplify, simplify_ring};

/// The service response held untouched, so every simplification derives
/// from the full-detail geometry. Asking for a sequence of tolerances
/// never compounds: each call answers "the original at this tolerance",
/// not "the previous result simplified again".
#[derive(Debug, Clone)]
pub struct Catchment {
    original: FeatureCollection,
}

impl Catchment {
    pub fn new(original: FeatureCollection) -> Self {
        Self { original }
    }

    /// The geometry exactly as the service returned it.
    pub fn original(&self) -> &FeatureCollection {
        &self.original
    }

    pub fn vertex_count(&self) -> usize {
        self.original.vertex_count()
    }

    /// The catchment with every boundary simplified at `tolerance`
    /// degrees. Points pass through untouched, line strings are
    /// simplified whole, and polygon rings are simplified one by one
    /// with the ring validity guard. Feature properties are preserved.
    pub fn simplified(&self, tolerance: f64) -> Result<FeatureCollection, GeometryError> {
        let features = self
            .original
            .features
            .iter()
            .map(|feature| simplify_feature(feature, tolerance))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FeatureCollection::new(features))
    }
}

fn simplify_feature(feature: &Feature, tolerance: f64) -> Result<Feature, GeometryError> {
    let geometry = match &feature.geometry {
        Geometry::Point { coordinates } => Geometry::Point {
            coordinates: *coordinates,
        },
        Geometry::LineString { coordinates } => Geometry::LineString {
            coordinates: simplify(coordinates, tolerance)?,
        },
        Geometry::Polygon { coordinates } => Geometry::Polygon {
            coordinates: simplify_rings(coordinates, tolerance)?,
        },
        Geometry::MultiPolygon { coordinates } => Geometry::MultiPolygon {
            coordinates: coordinates
                .iter()
                .map(|polygon| simplify_rings(polygon, tolerance))
                .collect::<Result<Vec<_>, _>>()?,
        },
    };

    Ok(Feature {
        geometry,
        ..feature.clone()
    })
}

fn simplify_rings(
    rings: &[Vec<Position>],
    tolerance: f64,
) -> Result<Vec<Vec<Position>>, GeometryError> {
    rings
        .iter()
        .map(|ring| simplify_ring(ring, tolerance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// A square with collinear midpoints on every edge, plus a small
    /// diamond hole.
    fn square_with_hole() -> Catchment {
        let outer = vec![
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (2.0, 2.0),
            (1.0, 2.0),
            (0.0, 2.0),
            (0.0, 1.0),
            (0.0, 0.0),
        ];
        let hole = vec![
            (0.5, 1.0),
            (1.0, 1.5),
            (1.5, 1.0),
            (1.0, 0.5),
            (0.5, 1.0),
        ];

        let mut feature = Feature::new(Geometry::Polygon {
            coordinates: vec![outer, hole],
        });
        feature.properties = json!({ "area_km2": 42.0 });
        Catchment::new(FeatureCollection::new(vec![feature]))
    }

    #[test]
    fn test_collinear_edge_points_drop_at_zero_tolerance() {
        let catchment = square_with_hole();
        let simplified = catchment.simplified(0.0).unwrap();

        let Geometry::Polygon { coordinates } = &simplified.features[0].geometry else {
            panic!("expected a polygon");
        };
        assert_eq!(
            coordinates[0],
            vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (0.0, 0.0)]
        );
        // Nothing on the diamond hole is collinear, so it is untouched.
        assert_eq!(coordinates[1].len(), 5);
    }

    #[test]
    fn test_rings_that_would_collapse_keep_their_originals() {
        let catchment = square_with_hole();
        let simplified = catchment.simplified(0.6).unwrap();

        let Geometry::Polygon { coordinates } = &simplified.features[0].geometry else {
            panic!("expected a polygon");
        };
        // The outer square survives simplification, the hole would shrink
        // below four positions and falls back instead.
        assert_eq!(coordinates[0].len(), 5);
        assert_eq!(coordinates[1].len(), 5);
        for ring in coordinates {
            assert_eq!(ring.first(), ring.last());
        }
    }

    #[test]
    fn test_properties_survive_simplification() {
        let simplified = square_with_hole().simplified(0.0).unwrap();
        assert_eq!(simplified.features[0].properties["area_km2"], 42.0);
    }

    #[test]
    fn test_original_is_never_modified() {
        let catchment = square_with_hole();
        let before = catchment.vertex_count();

        catchment.simplified(0.5).unwrap();
        catchment.simplified(0.0).unwrap();

        assert_eq!(catchment.vertex_count(), before);
        // Re-deriving from the original gives the same answer both times.
        assert_eq!(
            catchment.simplified(0.5).unwrap(),
            catchment.simplified(0.5).unwrap()
        );
    }

    #[test]
    fn test_multipolygon_and_point_features() {
        let collection = FeatureCollection::new(vec![
            Feature::new(Geometry::Point {
                coordinates: (-116.1, 44.0),
            }),
            Feature::new(Geometry::MultiPolygon {
                coordinates: vec![vec![vec![
                    (0.0, 0.0),
                    (1.0, 0.0),
                    (2.0, 0.0),
                    (2.0, 2.0),
                    (0.0, 2.0),
                    (0.0, 0.0),
                ]]],
            }),
        ]);

        let simplified = Catchment::new(collection).simplified(0.0).unwrap();
        assert_eq!(
            simplified.features[0].geometry,
            Geometry::Point {
                coordinates: (-116.1, 44.0)
            }
        );
        assert_eq!(simplified.features[1].geometry.vertex_count(), 5);
    }

    #[test]
    fn test_invalid_tolerance_is_rejected() {
        let catchment = square_with_hole();
        assert!(catchment.simplified(-0.1).is_err());
        assert!(catchment.simplified(f64::NAN).is_err());
    }
}
