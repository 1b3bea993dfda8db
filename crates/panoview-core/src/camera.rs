//! Pinhole camera intrinsics without lens distortion.

use crate::real::Real;
use crate::{PanoviewError, Result};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Ideal pinhole camera: focal lengths and principal point, in pixels.
///
/// Pixel centres are at integer coordinates, so a centred principal point of
/// a `640x480` view is `(320, 240)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsic {
    pub width: usize,
    pub height: usize,
    pub fx: Real,
    pub fy: Real,
    pub cx: Real,
    pub cy: Real,
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(PanoviewError::invalid(
            "intrinsic",
            format!("image size must be positive (got {width}x{height})"),
        ));
    }
    Ok(())
}

impl CameraIntrinsic {
    /// Intrinsics for a horizontal field of view, square pixels and a centred
    /// principal point: `fx = fy = (width / 2) / tan(hfov / 2)`.
    pub fn from_field_of_view(width: usize, height: usize, hfov_degrees: Real) -> Result<Self> {
        check_dimensions(width, height)?;
        if !hfov_degrees.is_finite() || hfov_degrees <= 0.0 || hfov_degrees >= 180.0 {
            return Err(PanoviewError::invalid(
                "hfov",
                format!("must lie in (0, 180) degrees (got {hfov_degrees})"),
            ));
        }

        let half_w = width as Real / 2.0;
        let f = half_w / (hfov_degrees.to_radians() / 2.0).tan();
        Ok(Self {
            width,
            height,
            fx: f,
            fy: f,
            cx: half_w,
            cy: height as Real / 2.0,
        })
    }

    /// Use the given intrinsics as-is after checking them.
    pub fn from_explicit(
        width: usize,
        height: usize,
        fx: Real,
        fy: Real,
        cx: Real,
        cy: Real,
    ) -> Result<Self> {
        let k = Self {
            width,
            height,
            fx,
            fy,
            cx,
            cy,
        };
        k.validate()?;
        Ok(k)
    }

    /// Check the invariants of a value built field by field (e.g. deserialized).
    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.width, self.height)?;
        for (name, f) in [("fx", self.fx), ("fy", self.fy)] {
            if !f.is_finite() || f <= 0.0 {
                return Err(PanoviewError::invalid(
                    name,
                    format!("focal length must be positive and finite (got {f})"),
                ));
            }
        }
        for (name, c) in [("cx", self.cx), ("cy", self.cy)] {
            if !c.is_finite() {
                return Err(PanoviewError::invalid(name, "principal point must be finite"));
            }
        }
        Ok(())
    }

    pub fn hfov_degrees(&self) -> Real {
        (2.0 * ((self.width as Real / 2.0) / self.fx).atan()).to_degrees()
    }

    pub fn vfov_degrees(&self) -> Real {
        (2.0 * ((self.height as Real / 2.0) / self.fy).atan()).to_degrees()
    }

    /// Unit camera-space ray through pixel `(u, v)`; +x right, +y down, +z forward.
    #[inline]
    pub fn ray(&self, u: Real, v: Real) -> Vector3<Real> {
        Vector3::new((u - self.cx) / self.fx, (v - self.cy) / self.fy, 1.0).normalize()
    }

    /// Calibration matrix `K`.
    pub fn k_matrix(&self) -> Matrix3<Real> {
        Matrix3::new(
            self.fx, 0.0, self.cx, //
            0.0, self.fy, self.cy, //
            0.0, 0.0, 1.0,
        )
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}
