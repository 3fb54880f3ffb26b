use serde_json::json;

use crate::geojson::{Feature, Geometry};

/// A pour point in lon/lat degrees: the spot whose upstream drainage area
/// gets delineated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outlet {
    pub lon: f64,
    pub lat: f64,
}

impl Outlet {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// The marker feature exported alongside the catchment, tagged with
    /// the monument symbol map styles use for a pour point.
    pub fn to_feature(&self) -> Feature {
        let mut feature = Feature::new(Geometry::Point {
            coordinates: (self.lon, self.lat),
        });
        feature.properties = json!({ "marker-symbol": "monument" });
        feature
    }

    /// Read an outlet back from a point feature, e.g. one entry of a saved
    /// outlets file. Non-point features have no outlet to offer.
    pub fn from_feature(feature: &Feature) -> Option<Self> {
        match feature.geometry {
            Geometry::Point {
                coordinates: (lon, lat),
            } => Some(Self { lon, lat }),
            _ => None,
        }
    }
}
