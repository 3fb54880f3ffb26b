pub mod delineation;
pub mod geocode;

pub use delineation::{ServiceConfig, delineate, delineate_many, streamline_tiles};
pub use geocode::{GeocodedPlace, geocode_place};
