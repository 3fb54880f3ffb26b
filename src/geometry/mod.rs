//! Plane geometry for catchment outlines: polyline simplification and
//! bounding boxes. Coordinates are unit-agnostic; callers pass lon/lat
//! degrees throughout this crate.

pub mod bounds;
pub mod simplify;

pub use bounds::Bounds;
pub use simplify::{simplify, simplify_ring};

use thiserror::Error;

/// Errors from geometry routines. These are caller mistakes rather than
/// transient conditions, so there is nothing to retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
}
