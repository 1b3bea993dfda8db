//! Facade over the `panoview-*` crates.
//!
//! This crate provides:
//! - re-exports of the core types and the equirectangular renderer,
//! - (feature `image`) zero-copy adapters between `image` buffers and
//!   [`PixelBufferView`]/[`PixelBuffer`],
//! - (feature `cli`) the `panoview` command-line tool.
//!
//! ## Quickstart
//!
//! ```no_run
//! use panoview::{convert, Orientation, ReprojectionSession};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pano = image::open("pano.jpg")?.to_rgb8();
//! let mut session = ReprojectionSession::new();
//! session.set_intrinsic_fov(800, 600, 75.0)?;
//! session.set_orientation(Orientation::from_pan_tilt(120.0, 15.0, 0.0)?);
//! session.set_source(&convert::rgb_view(&pano))?;
//! convert::to_rgb_image(session.render()?)?.save("view.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `panoview::core`: pixel buffers, sampling, intrinsics, orientation, logging.
//! - `panoview::equirect`: remap tables, remap engine, session, JSON view config.
//! - `panoview::convert` (feature `image`): `image` crate adapters.

mod error;

pub use error::Error;
pub use panoview_core as core;
pub use panoview_equirect as equirect;

pub use panoview_core::{
    BorderPolicy, CameraIntrinsic, Interpolation, Orientation, PanoviewError, PixelBuffer,
    PixelBufferView, Real,
};
pub use panoview_equirect::{
    ConfigError, EquirectMap, RemapParams, ReprojectionSession, SessionState, ViewConfig,
};

#[cfg(feature = "image")]
pub mod convert;
