//! Equirectangular panorama to pinhole view reprojection.
//!
//! - [`EquirectMap`]: per-pixel table from view pixels to fractional
//!   panorama coordinates (longitude wraps, latitude clamps at the poles).
//! - [`RemapEngine`]: samples a panorama through a table.
//! - [`ReprojectionSession`]: owns the buffers and rebuilds the table only
//!   when geometry changes.
//!
//! With the `rayon` feature both the table build and the remap pass run
//! row-parallel; results are identical to the serial path.

mod model;
mod params;
mod remap;
mod session;

pub use model::{lonlat_to_equirect, project_pixel, ray_to_lonlat, EquirectMap};
pub use params::{ConfigError, RemapParams, ViewConfig};
pub use remap::{RemapEngine, RemapStats};
pub use session::{ReprojectionSession, SessionState};
