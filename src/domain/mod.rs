pub mod catchment;
pub mod outlet;
pub mod resolution;

pub use catchment::Catchment;
pub use outlet::Outlet;
pub use resolution::Resolution;
