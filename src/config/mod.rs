use serde::Deserialize;
use std::path::PathBuf;

use crate::api::ServiceConfig;

fn default_res() -> u16 {
    30
}
fn default_simplify() -> f64 {
    0.0
}
fn default_threshold() -> u8 {
    50
}
fn default_verbose() -> bool {
    false
}

/// Settings read from a `catchmap.toml` file. Command-line arguments
/// override anything set here.
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default = "default_res")]
    pub res: u16,
    #[serde(default = "default_simplify")]
    pub simplify: f64,
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default)]
    pub service: Option<ServiceConfig>,
}

impl FileConfig {
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("catchmap.toml"));
    paths.push(PathBuf::from(".catchmap.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("catchmap").join("config.toml"));
        paths.push(config_dir.join("catchmap.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".catchmap.toml"));
        paths.push(home.join(".config").join("catchmap").join("config.toml"));
    }

    paths
}
