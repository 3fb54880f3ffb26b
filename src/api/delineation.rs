//! Client for the watershed delineation service.
//!
//! The service wraps a DEM-backed flow model: given an outlet and a grid
//! resolution it snaps the outlet to the nearest stream cell and returns
//! the upstream catchment as GeoJSON. It also serves an XYZ tile layer of
//! the flow-accumulation grid for picking outlets by eye.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::thread;
use std::time::Duration;

use crate::domain::{Outlet, Resolution};
use crate::geojson::{Document, FeatureCollection};

const DEFAULT_URL: &str = "http://localhost:8000";
const USER_AGENT: &str = "catchmap/0.1.0";

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    // Fine-grid delineation of a large basin can run for minutes on the
    // server side.
    200
}

fn default_max_retries() -> u32 {
    3
}

/// Where and how to reach the delineation service. Deserialized from the
/// `[service]` table of the config file; every field has a default so the
/// table can be partial or absent.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl ServiceConfig {
    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.url.trim_end_matches('/'), name)
    }

    fn client(&self) -> Result<reqwest::blocking::Client> {
        reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .context("Failed to create HTTP client")
    }
}

/// Delineate the catchment draining to a single outlet.
pub fn delineate(
    outlet: Outlet,
    resolution: Resolution,
    config: &ServiceConfig,
) -> Result<FeatureCollection> {
    let client = config.client()?;
    let request = client.get(config.endpoint("delineate")).query(&[
        ("lat", outlet.lat.to_string()),
        ("lon", outlet.lon.to_string()),
        ("res", resolution.arc_seconds().to_string()),
    ]);

    fetch_collection(request, config.max_retries)
}

/// Delineate catchments for every outlet in one request. The outlets
/// travel as a GeoJSON feature collection in the body; the response holds
/// one catchment feature per outlet, in the same order.
pub fn delineate_many(
    outlets: &FeatureCollection,
    resolution: Resolution,
    config: &ServiceConfig,
) -> Result<FeatureCollection> {
    if outlets.is_empty() {
        bail!("No outlets to delineate");
    }

    let client = config.client()?;
    let request = client
        .post(config.endpoint("delineate"))
        .query(&[("res", resolution.arc_seconds().to_string())])
        .json(outlets);

    fetch_collection(request, config.max_retries)
}

/// Fetch the XYZ tile URL template for the flow-accumulation overlay.
/// `threshold` is the accumulation percentile (0 to 100) below which
/// cells are rendered transparent.
pub fn streamline_tiles(
    resolution: Resolution,
    threshold: u8,
    config: &ServiceConfig,
) -> Result<String> {
    let client = config.client()?;
    let request = client.get(config.endpoint("ee_tile")).query(&[
        ("dataset", resolution.dataset()),
        ("threshold", threshold.to_string()),
    ]);

    // The body is a bare JSON string holding the tile URL template.
    let response = fetch_with_retry(request, config.max_retries)?;
    response.json().context("Failed to parse tile URL response")
}

fn fetch_collection(
    request: reqwest::blocking::RequestBuilder,
    max_retries: u32,
) -> Result<FeatureCollection> {
    let response = fetch_with_retry(request, max_retries)?;
    let document: Document = response
        .json()
        .context("Failed to parse delineation GeoJSON response")?;
    Ok(document.into_collection())
}

/// Send a request to the delineation service, retrying on the statuses
/// an overloaded service emits (429 Too Many Requests, 504 Gateway
/// Timeout).
fn fetch_with_retry(
    request: reqwest::blocking::RequestBuilder,
    max_retries: u32,
) -> Result<reqwest::blocking::Response> {
    let mut last_error = None;

    for attempt in 0..max_retries {
        if attempt > 0 {
            let wait_secs = 30 * attempt as u64;
            eprintln!(
                "Delineation service busy, retrying in {} seconds (attempt {}/{})",
                wait_secs,
                attempt + 1,
                max_retries
            );
            thread::sleep(Duration::from_secs(wait_secs));
        }

        let request = request
            .try_clone()
            .context("Failed to clone request for retry")?;
        let response = request
            .send()
            .context("Failed to send request to delineation service")?;

        match response.status().as_u16() {
            200 => return Ok(response),
            429 | 504 => {
                last_error = Some(format!(
                    "service returned status {} (attempt {})",
                    response.status(),
                    attempt + 1
                ));
                continue;
            }
            status => {
                bail!("Delineation service returned error status: {}", status);
            }
        }
    }

    bail!(
        "Delineation service failed after {} retries: {}",
        max_retries,
        last_error.unwrap_or_else(|| "Unknown error".to_string())
    )
}
