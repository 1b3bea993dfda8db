//! Scalar precision used by the geometric code.
//!
//! `f32` by default; enable the `f64` feature for double precision. Mapping
//! tables and sampling coordinates stay `f32` either way.

#[cfg(not(feature = "f64"))]
pub type Real = f32;

#[cfg(feature = "f64")]
pub type Real = f64;

#[cfg(not(feature = "f64"))]
pub use std::f32::consts;

#[cfg(feature = "f64")]
pub use std::f64::consts;
