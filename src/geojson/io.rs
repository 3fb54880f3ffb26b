//! Reading and writing GeoJSON files on disk.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::{Document, FeatureCollection};

/// Write a feature collection as pretty-printed GeoJSON, matching the
/// indented format the browser download produces. Returns the number of
/// bytes written.
pub fn write_geojson(path: &Path, collection: &FeatureCollection) -> Result<usize> {
    let mut json = serde_json::to_string_pretty(collection)
        .context("Failed to serialize feature collection")?;
    json.push('\n');

    fs::write(path, &json)
        .with_context(|| format!("Failed to write GeoJSON to {}", path.display()))?;

    Ok(json.len())
}

/// Read a GeoJSON file back into a feature collection. A file holding a
/// bare `Feature` is wrapped into a one-element collection.
pub fn read_feature_collection(path: &Path) -> Result<FeatureCollection> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read GeoJSON from {}", path.display()))?;

    let document: Document = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse GeoJSON in {}", path.display()))?;

    Ok(document.into_collection())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geojson::{Feature, Geometry};

    fn sample_collection() -> FeatureCollection {
        FeatureCollection::new(vec![Feature::new(Geometry::Polygon {
            coordinates: vec![vec![
                (-116.1, 44.0),
                (-116.2, 44.1),
                (-116.1, 44.2),
                (-116.1, 44.0),
            ]],
        })])
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catchment.json");

        let collection = sample_collection();
        let bytes = write_geojson(&path, &collection).unwrap();
        assert!(bytes > 0);

        let reread = read_feature_collection(&path).unwrap();
        assert_eq!(reread, collection);
    }

    #[test]
    fn test_output_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catchment.json");

        write_geojson(&path, &sample_collection()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"features\""));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_read_bare_feature_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outlet.json");

        let json = r#"{
            "type": "Feature",
            "properties": {"marker-symbol": "monument"},
            "geometry": {"type": "Point", "coordinates": [-116.1, 44.0]}
        }"#;
        fs::write(&path, json).unwrap();

        let collection = read_feature_collection(&path).unwrap();
        assert_eq!(collection.features.len(), 1);
        assert_eq!(
            collection.features[0].properties["marker-symbol"],
            "monument"
        );
    }

    #[test]
    fn test_read_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(read_feature_collection(&path).is_err());
    }
}
