//! Shareable map view fragments.
//!
//! The hosted map encodes its viewport in the URL fragment as
//! `#map=lat/lon/zoom/bearing`, so a view can be bookmarked or pasted into
//! chat. This module speaks the same format: `--at` accepts a fragment to
//! place the outlet, and the CLI prints one back so the result can be
//! opened in a browser at the right spot.

use anyhow::{Context, Result, bail};
use std::fmt;

/// A map viewport, in lon/lat degrees with a web-map zoom level and a
/// bearing in degrees clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub lat: f64,
    pub lon: f64,
    pub zoom: f64,
    pub bearing: f64,
}

impl MapView {
    pub fn new(lat: f64, lon: f64, zoom: f64, bearing: f64) -> Self {
        Self {
            lat,
            lon,
            zoom,
            bearing,
        }
    }

    /// A north-up view centered on a point.
    pub fn centered(lat: f64, lon: f64, zoom: f64) -> Self {
        Self::new(lat, lon, zoom, 0.0)
    }

    /// Parse a view from a `map=lat/lon/zoom/bearing` fragment, with or
    /// without the leading `#`, or from a full URL containing one.
    pub fn parse(input: &str) -> Result<Self> {
        let fragment = match input.split_once('#') {
            Some((_, fragment)) => fragment,
            None => input,
        };

        let values = fragment
            .strip_prefix("map=")
            .with_context(|| format!("No map fragment in {:?} (expected map=lat/lon/zoom/bearing)", input))?;

        let parts: Vec<&str> = values.split('/').collect();
        if parts.len() != 4 {
            bail!(
                "Map fragment has {} fields, expected 4 (lat/lon/zoom/bearing)",
                parts.len()
            );
        }

        let mut numbers = [0.0_f64; 4];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .with_context(|| format!("Invalid number {:?} in map fragment", part))?;
            if !slot.is_finite() {
                bail!("Invalid number {:?} in map fragment", part);
            }
        }

        Ok(Self::new(numbers[0], numbers[1], numbers[2], numbers[3]))
    }
}

impl fmt::Display for MapView {
    /// Coordinates carry 3 decimals (about 110 m at the equator), zoom and
    /// bearing 1, matching what the hosted map writes into the URL.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#map={:.3}/{:.3}/{:.1}/{:.1}",
            self.lat, self.lon, self.zoom, self.bearing
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_fragment() {
        let view = MapView::parse("#map=43.607/-116.193/12.3/0").unwrap();
        assert_eq!(view, MapView::new(43.607, -116.193, 12.3, 0.0));

        // The hash is optional
        let view = MapView::parse("map=43.607/-116.193/12.3/0").unwrap();
        assert_eq!(view.lat, 43.607);
    }

    #[test]
    fn test_parse_full_url() {
        let view =
            MapView::parse("https://flowdirections.io/#map=43.607/-116.193/11.5/45.0").unwrap();
        assert_eq!(view, MapView::new(43.607, -116.193, 11.5, 45.0));
    }

    #[test]
    fn test_display_format() {
        let view = MapView::new(43.55, -116.06, 11.9, 0.0);
        assert_eq!(view.to_string(), "#map=43.550/-116.060/11.9/0.0");
    }

    #[test]
    fn test_round_trip() {
        let view = MapView::centered(43.607, -116.193, 12.3);
        let reparsed = MapView::parse(&view.to_string()).unwrap();
        assert_eq!(reparsed, view);
    }

    #[test]
    fn test_malformed_fragments_are_rejected() {
        assert!(MapView::parse("#map=43.607/-116.193/12.3").is_err());
        assert!(MapView::parse("#map=43.607/-116.193/12.3/0/7").is_err());
        assert!(MapView::parse("#view=1/2/3/4").is_err());
        assert!(MapView::parse("#map=abc/-116.193/12.3/0").is_err());
        assert!(MapView::parse("#map=NaN/-116.193/12.3/0").is_err());
        assert!(MapView::parse("").is_err());
    }
}
