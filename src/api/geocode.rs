use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::thread;
use std::time::Duration;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
const USER_AGENT: &str = "catchmap/0.1.0";

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: String,
}

/// A place name resolved to coordinates.
#[derive(Debug, Clone)]
pub struct GeocodedPlace {
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

/// Geocode a free-form place name (e.g. "Lucky Peak Dam, Idaho") to
/// coordinates via Nominatim.
///
/// Includes a 1 second delay for rate limiting (Nominatim ToS).
pub fn geocode_place(place: &str) -> Result<GeocodedPlace> {
    // Rate limiting - Nominatim requires max 1 request per second
    thread::sleep(Duration::from_secs(1));

    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to create HTTP client")?;

    let response = client
        .get(NOMINATIM_URL)
        .query(&[("q", place), ("format", "json"), ("limit", "1")])
        .send()
        .context("Failed to send request to Nominatim API")?;

    if !response.status().is_success() {
        bail!("Nominatim API returned error status: {}", response.status());
    }

    let results: Vec<SearchResult> = response
        .json()
        .context("Failed to parse Nominatim JSON response")?;

    let result = results
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("Place not found: {}", place))?;

    let lat: f64 = result
        .lat
        .parse()
        .context("Failed to parse latitude from Nominatim response")?;
    let lon: f64 = result
        .lon
        .parse()
        .context("Failed to parse longitude from Nominatim response")?;

    Ok(GeocodedPlace {
        lat,
        lon,
        display_name: result.display_name,
    })
}
