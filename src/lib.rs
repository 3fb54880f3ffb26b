//! catchmap - Delineate watershed catchments to GeoJSON from the command line

pub mod api;
pub mod config;
pub mod domain;
pub mod geojson;
pub mod geometry;
pub mod permalink;
