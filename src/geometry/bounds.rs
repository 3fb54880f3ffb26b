use crate::geojson::{FeatureCollection, Position};

/// Bounding box in lon/lat degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Create bounds from a set of positions
    pub fn from_points(points: &[Position]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let mut bounds = Self {
            min_x: f64::MAX,
            max_x: f64::MIN,
            min_y: f64::MAX,
            max_y: f64::MIN,
        };
        bounds.expand(points);
        Some(bounds)
    }

    /// Create bounds covering every position in a feature collection
    pub fn from_collection(collection: &FeatureCollection) -> Option<Self> {
        if collection.vertex_count() == 0 {
            return None;
        }

        let mut bounds = Self {
            min_x: f64::MAX,
            max_x: f64::MIN,
            min_y: f64::MAX,
            max_y: f64::MIN,
        };
        collection.for_each_position(&mut |(x, y)| {
            bounds.min_x = bounds.min_x.min(x);
            bounds.max_x = bounds.max_x.max(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_y = bounds.max_y.max(y);
        });
        Some(bounds)
    }

    /// Expand bounds to include another set of positions
    pub fn expand(&mut self, points: &[Position]) {
        for &(x, y) in points {
            self.min_x = self.min_x.min(x);
            self.max_x = self.max_x.max(x);
            self.min_y = self.min_y.min(y);
            self.max_y = self.max_y.max(y);
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Position {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Web-map zoom level at which these bounds roughly fill the view.
    ///
    /// One zoom step halves the visible span, with the whole world (360
    /// degrees) at zoom 0. Clamped to 0..=15; a single point gets the
    /// maximum.
    pub fn fit_zoom(&self) -> f64 {
        let span = self.width().max(self.height());
        if span <= 0.0 {
            return 15.0;
        }
        (360.0 / span).log2().clamp(0.0, 15.0)
    }
}
