use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

use catchmap::api::{delineate, delineate_many, geocode_place, streamline_tiles};
use catchmap::config::FileConfig;
use catchmap::domain::{Catchment, Outlet, Resolution};
use catchmap::geojson::{
    FeatureCollection,
    io::{read_feature_collection, write_geojson},
};
use catchmap::geometry::Bounds;
use catchmap::permalink::MapView;

/// Delineate watershed catchments to GeoJSON from the command line
///
/// Examples:
///   # Delineate the catchment draining to a point
///   catchmap --lat 43.607 --lon -116.193
///
///   # Geocode a place name for the outlet, on the fine grid
///   catchmap --place "Lucky Peak Dam, Idaho" --res 15
///
///   # Take the outlet from a shared map link and simplify the boundary
///   catchmap --at "#map=43.607/-116.193/12.3/0.0" --simplify 0.002
///
///   # Delineate every outlet point in a saved GeoJSON file
///   catchmap --outlets outlets.json -o basins.json
///
///   # Use a config file
///   catchmap --config my-settings.toml
#[derive(Parser, Debug)]
#[command(name = "catchmap")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches catchmap.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Outlet latitude (use with --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Outlet longitude (use with --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Place name to geocode into the outlet (e.g. "Lucky Peak Dam, Idaho")
    #[arg(short = 'p', long)]
    place: Option<String>,

    /// Take the outlet from a map view: a "#map=lat/lon/zoom/bearing"
    /// fragment or a full URL containing one
    #[arg(long)]
    at: Option<String>,

    /// GeoJSON file of outlet point features to delineate in one batch
    #[arg(long)]
    outlets: Option<PathBuf>,

    /// Grid resolution in arc-seconds: 15 (finer) or 30
    #[arg(short = 'r', long, default_value = "30")]
    res: u16,

    /// Boundary simplification tolerance in degrees (0 = keep full detail)
    #[arg(short = 's', long, default_value = "0", allow_hyphen_values = true)]
    simplify: f64,

    /// Output GeoJSON file path (defaults to {place}.json or catchment.json)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Also fetch the streamline overlay tile URL for this resolution
    #[arg(long)]
    streamlines: bool,

    /// Flow accumulation percentile below which streamline cells are hidden
    #[arg(long, default_value = "50", value_parser = clap::value_parser!(u8).range(0..=100))]
    threshold: u8,

    /// Delineation service URL (overrides the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            Some(toml::from_str(&contents).context("Failed to parse config file")?)
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load()
    };

    let (lat, lon, place) = merge_outlet_sources(&args, file_config.as_ref())?;
    let res = if args.res != 30 {
        args.res
    } else {
        file_config.as_ref().map(|c| c.res).unwrap_or(30)
    };
    let simplify = if args.simplify != 0.0 {
        args.simplify
    } else {
        file_config.as_ref().map(|c| c.simplify).unwrap_or(0.0)
    };
    let threshold = merged_threshold(&args, file_config.as_ref())?;
    let verbose = args.verbose || file_config.as_ref().map(|c| c.verbose).unwrap_or(false);
    let output = args
        .output
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.output.clone()));

    let mut service_config = file_config
        .as_ref()
        .and_then(|c| c.service.clone())
        .unwrap_or_default();
    if let Some(ref url) = args.api_url {
        service_config.url = url.clone();
    }

    let resolution = match Resolution::from_arc_seconds(res) {
        Some(resolution) => resolution,
        None => bail!("Unsupported resolution: {} arc-seconds (use 15 or 30)", res),
    };

    if !simplify.is_finite() || simplify < 0.0 {
        bail!(
            "Simplification tolerance must be a non-negative number, got {}",
            simplify
        );
    }

    println!("catchmap - Watershed Delineation Client");
    println!("=======================================");
    println!();

    let output_path = output.clone().unwrap_or_else(|| {
        if let Some(ref p) = place {
            PathBuf::from(format!("{}.json", p.to_lowercase().replace(' ', "_")))
        } else {
            PathBuf::from("catchment.json")
        }
    });

    if verbose {
        println!("Configuration:");
        if let Some(ref p) = place {
            println!("  Place: {}", p);
        }
        if let (Some(lt), Some(ln)) = (lat, lon) {
            println!("  Outlet: ({:.4}, {:.4})", lt, ln);
        }
        if let Some(ref path) = args.outlets {
            println!("  Outlets file: {}", path.display());
        }
        println!("  Resolution: {} arc-seconds", resolution.arc_seconds());
        println!("  Simplify tolerance: {}", simplify);
        if args.streamlines {
            println!("  Streamline threshold: {}%", threshold);
        }
        println!("  Service: {}", service_config.url);
        println!("  Output: {}", output_path.display());
        println!();
    }

    // Resolve the outlet(s), then delineate.
    let (collection, outlet_markers) = if let Some(ref outlets_path) = args.outlets {
        let outlets_file = read_feature_collection(outlets_path)
            .context("Failed to read outlets file")?;
        let outlets: Vec<Outlet> = outlets_file
            .features
            .iter()
            .filter_map(Outlet::from_feature)
            .collect();
        if outlets.is_empty() {
            bail!(
                "No point features found in outlets file: {}",
                outlets_path.display()
            );
        }

        let markers = FeatureCollection::new(outlets.iter().map(Outlet::to_feature).collect());

        let spinner = create_spinner(&format!("Delineating {} outlets...", outlets.len()));
        let start = Instant::now();
        let collection = delineate_many(&markers, resolution, &service_config)
            .context("Failed to delineate outlets")?;
        spinner.finish_with_message(format!(
            "Delineated {} catchments ({} vertices) [{:.1}s]",
            collection.features.len(),
            collection.vertex_count(),
            start.elapsed().as_secs_f32()
        ));

        (collection, markers.features)
    } else {
        let outlet = resolve_outlet(lat, lon, place.as_deref(), args.at.as_deref())?;

        let spinner = create_spinner("Delineating catchment...");
        let start = Instant::now();
        let collection = delineate(outlet, resolution, &service_config)
            .context("Failed to delineate catchment")?;
        spinner.finish_with_message(format!(
            "Delineated catchment: {} vertices [{:.1}s]",
            collection.vertex_count(),
            start.elapsed().as_secs_f32()
        ));

        (collection, vec![outlet.to_feature()])
    };

    if collection.is_empty() {
        bail!("Delineation service returned no features; is the outlet on land?");
    }

    let catchment = Catchment::new(collection);

    if verbose {
        println!("  Rings: {}", catchment.original().ring_count());
        if let Some(bounds) = Bounds::from_collection(catchment.original()) {
            println!(
                "  Bounds: ({:.4}, {:.4}) to ({:.4}, {:.4})",
                bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y
            );
        }
    }

    let mut export = if simplify > 0.0 {
        let spinner = create_spinner("Simplifying boundaries...");
        let start = Instant::now();
        let before = catchment.vertex_count();
        let simplified = catchment
            .simplified(simplify)
            .context("Failed to simplify catchment boundaries")?;
        let after = simplified.vertex_count();
        spinner.finish_with_message(format!(
            "Simplified {} -> {} vertices [{:.1}s]",
            before,
            after,
            start.elapsed().as_secs_f32()
        ));
        simplified
    } else {
        catchment.original().clone()
    };
    export.features.extend(outlet_markers);

    let bytes = write_geojson(&output_path, &export).context("Failed to write GeoJSON file")?;
    println!(
        "Wrote {} features ({:.1} KB) to {}",
        export.features.len(),
        bytes as f64 / 1024.0,
        output_path.display()
    );

    if let Some(bounds) = Bounds::from_collection(catchment.original()) {
        let (center_lon, center_lat) = bounds.center();
        println!(
            "View: {}",
            MapView::centered(center_lat, center_lon, bounds.fit_zoom())
        );
    }

    if args.streamlines {
        let spinner = create_spinner("Fetching streamline tile URL...");
        let start = Instant::now();
        let tile_url = streamline_tiles(resolution, threshold, &service_config)
            .context("Failed to fetch streamline tile URL")?;
        spinner.finish_with_message(format!(
            "Streamline tiles ({}% threshold) [{:.1}s]",
            threshold,
            start.elapsed().as_secs_f32()
        ));
        println!("Tiles: {}", tile_url);
    }

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );

    Ok(())
}

/// Outlet fields after the CLI-over-config merge.
///
/// At most one outlet source may come from the command line, and a
/// source flag shadows every outlet default in the config file. With
/// no source flag at all the config may supply one.
fn merge_outlet_sources(
    args: &Args,
    file_config: Option<&FileConfig>,
) -> Result<(Option<f64>, Option<f64>, Option<String>)> {
    let cli_sources = [
        args.lat.is_some(),
        args.place.is_some(),
        args.at.is_some(),
        args.outlets.is_some(),
    ]
    .iter()
    .filter(|&&set| set)
    .count();
    if cli_sources > 1 {
        bail!(
            "Outlet given more than once; use only one of --lat/--lon, --place, --at, --outlets"
        );
    }
    if cli_sources == 1 {
        return Ok((args.lat, args.lon, args.place.clone()));
    }

    let lat = file_config.and_then(|c| c.lat);
    let lon = file_config.and_then(|c| c.lon);
    let place = file_config.and_then(|c| c.place.clone());
    if lat.is_none() && place.is_none() {
        bail!("Must provide an outlet: --lat/--lon, --place, --at, or --outlets");
    }
    Ok((lat, lon, place))
}

/// Streamline threshold after the merge. clap bounds the flag to 0-100,
/// but the config file can hold any u8, so the merged value is checked
/// again.
fn merged_threshold(args: &Args, file_config: Option<&FileConfig>) -> Result<u8> {
    let threshold = if args.threshold != 50 {
        args.threshold
    } else {
        file_config.map(|c| c.threshold).unwrap_or(50)
    };
    if threshold > 100 {
        bail!(
            "Streamline threshold must be between 0 and 100, got {}",
            threshold
        );
    }
    Ok(threshold)
}

/// Turn whichever outlet flag was given into coordinates.
fn resolve_outlet(
    lat: Option<f64>,
    lon: Option<f64>,
    place: Option<&str>,
    at: Option<&str>,
) -> Result<Outlet> {
    if lat.is_some() != lon.is_some() {
        bail!("An outlet needs both lat and lon; only one was set");
    }
    if let (Some(lat), Some(lon)) = (lat, lon) {
        println!("Using provided outlet: ({:.4}, {:.4})", lat, lon);
        return Ok(Outlet::new(lon, lat));
    }

    if let Some(fragment) = at {
        let view = MapView::parse(fragment).context("Failed to parse map view")?;
        println!(
            "Using outlet from map view: ({:.4}, {:.4})",
            view.lat, view.lon
        );
        return Ok(Outlet::new(view.lon, view.lat));
    }

    let place = place.context("No outlet source given")?;
    let spinner = create_spinner("Geocoding place...");
    let start = Instant::now();
    let found = geocode_place(place).context("Failed to geocode place")?;
    spinner.finish_with_message(format!(
        "Geocoded: {} -> ({:.4}, {:.4}) [{:.1}s]",
        found.display_name,
        found.lat,
        found.lon,
        start.elapsed().as_secs_f32()
    ));
    Ok(Outlet::new(found.lon, found.lat))
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
