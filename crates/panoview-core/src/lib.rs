//! Core types for reprojecting panoramas into pinhole views.
//!
//! This crate is purely geometric and knows nothing about host image types:
//! pixels live in [`PixelBuffer`]s, cameras are [`CameraIntrinsic`]s and view
//! directions are [`Orientation`]s. The equirectangular projection itself
//! lives in `panoview-equirect`.

mod camera;
mod error;
mod image;
mod logger;
mod orientation;
pub mod real;
mod sample;

pub use camera::CameraIntrinsic;
pub use error::{PanoviewError, Result};
pub use image::{PixelBuffer, PixelBufferView};
pub use orientation::{Orientation, ORTHONORMAL_TOLERANCE};
pub use real::Real;
pub use sample::{BorderPolicy, Interpolation, Sampler};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, init_with_verbosity, level_from_verbosity};
