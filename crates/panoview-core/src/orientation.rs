//! Camera orientation relative to the panorama sphere.
//!
//! The canonical form is a rotation matrix `R` that maps camera-space rays
//! into the sphere frame: `r_sphere = R * r_camera`. Both frames use +x right,
//! +y down, +z forward.

use crate::real::Real;
use crate::{PanoviewError, Result};
use nalgebra::{Matrix3, Quaternion, Rotation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Maximum allowed `|R^T R - I|` (element-wise) and `|det(R) - 1|` for
/// matrices supplied directly by callers.
pub const ORTHONORMAL_TOLERANCE: Real = 1e-3;

/// A validated rotation.
///
/// Serializes as its row-major matrix; deserialization goes through
/// [`Orientation::from_rows`], so non-rotations are rejected.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[[Real; 3]; 3]", into = "[[Real; 3]; 3]")]
pub struct Orientation {
    rotation: Rotation3<Real>,
}

impl Default for Orientation {
    fn default() -> Self {
        Self::identity()
    }
}

fn check_finite(name: &'static str, values: &[Real]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(PanoviewError::invalid(name, "all components must be finite"))
    }
}

impl Orientation {
    pub fn identity() -> Self {
        Self {
            rotation: Rotation3::identity(),
        }
    }

    /// `R = Rz(yaw) * Ry(pitch) * Rx(roll)`, angles in radians.
    ///
    /// Axis names follow nalgebra. In the +y-down frame this means `pitch`
    /// pans the view horizontally, `roll` tilts it and `yaw` spins it around
    /// the optical axis; [`Orientation::from_pan_tilt`] is usually what a
    /// viewer wants.
    pub fn from_euler(roll: Real, pitch: Real, yaw: Real) -> Result<Self> {
        check_finite("euler", &[roll, pitch, yaw])?;
        Ok(Self {
            rotation: Rotation3::from_euler_angles(roll, pitch, yaw),
        })
    }

    /// Viewer-style orientation `R = Ry(pan) * Rx(tilt) * Rz(spin)`, degrees.
    ///
    /// Positive pan looks right, positive tilt looks up, positive spin turns
    /// the image clockwise around the optical axis.
    pub fn from_pan_tilt(pan: Real, tilt: Real, spin: Real) -> Result<Self> {
        check_finite("pan_tilt", &[pan, tilt, spin])?;
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), pan.to_radians());
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), tilt.to_radians());
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), spin.to_radians());
        Ok(Self {
            rotation: ry * rx * rz,
        })
    }

    /// Same as [`Orientation::from_euler`] with angles in degrees.
    pub fn from_euler_degrees(roll: Real, pitch: Real, yaw: Real) -> Result<Self> {
        Self::from_euler(roll.to_radians(), pitch.to_radians(), yaw.to_radians())
    }

    /// Rotation of `angle` radians about `axis` (any non-zero length), via
    /// Rodrigues' formula `R = I + sin(θ) K + (1 - cos(θ)) K²`.
    pub fn from_axis_angle(axis: Vector3<Real>, angle: Real) -> Result<Self> {
        check_finite("axis", axis.as_slice())?;
        check_finite("angle", &[angle])?;
        let n = axis.norm();
        if n <= Real::EPSILON {
            return Err(PanoviewError::invalid("axis", "rotation axis must be non-zero"));
        }
        let k = axis / n;
        let k_x = k.cross_matrix();
        let r = Matrix3::identity() + k_x * angle.sin() + k_x * k_x * (1.0 - angle.cos());
        Ok(Self {
            rotation: Rotation3::from_matrix_unchecked(r),
        })
    }

    /// Rotation vector (axis scaled by angle in radians). The zero vector is
    /// the identity.
    pub fn from_rotation_vector(rvec: Vector3<Real>) -> Result<Self> {
        check_finite("rotation_vector", rvec.as_slice())?;
        let angle = rvec.norm();
        if angle <= Real::EPSILON {
            return Ok(Self::identity());
        }
        Self::from_axis_angle(rvec, angle)
    }

    /// Quaternion `w + xi + yj + zk`; normalized before conversion.
    pub fn from_quaternion(w: Real, x: Real, y: Real, z: Real) -> Result<Self> {
        check_finite("quaternion", &[w, x, y, z])?;
        let q = Quaternion::new(w, x, y, z);
        if q.norm() <= Real::EPSILON {
            return Err(PanoviewError::invalid("quaternion", "quaternion must be non-zero"));
        }
        Ok(Self {
            rotation: UnitQuaternion::from_quaternion(q).to_rotation_matrix(),
        })
    }

    /// Accept a raw matrix after checking that it is a proper rotation.
    pub fn from_matrix(m: Matrix3<Real>) -> Result<Self> {
        check_finite("matrix", m.as_slice())?;
        let orthogonality_error = (m.transpose() * m - Matrix3::identity()).amax();
        let determinant = m.determinant();
        if orthogonality_error > ORTHONORMAL_TOLERANCE
            || (determinant - 1.0).abs() > ORTHONORMAL_TOLERANCE
        {
            return Err(PanoviewError::InvalidOrientation {
                orthogonality_error: f64::from(orthogonality_error),
                determinant: f64::from(determinant),
            });
        }
        Ok(Self {
            rotation: Rotation3::from_matrix_unchecked(m),
        })
    }

    /// Row-major variant of [`Orientation::from_matrix`].
    pub fn from_rows(rows: [[Real; 3]; 3]) -> Result<Self> {
        Self::from_matrix(Matrix3::from_row_slice(&[
            rows[0][0], rows[0][1], rows[0][2], rows[1][0], rows[1][1], rows[1][2], rows[2][0],
            rows[2][1], rows[2][2],
        ]))
    }

    pub fn to_rows(&self) -> [[Real; 3]; 3] {
        let m = self.rotation.matrix();
        [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ]
    }

    #[inline]
    pub fn matrix(&self) -> &Matrix3<Real> {
        self.rotation.matrix()
    }

    pub fn rotation(&self) -> &Rotation3<Real> {
        &self.rotation
    }

    /// `(roll, pitch, yaw)` in radians, inverse of [`Orientation::from_euler`].
    pub fn euler_angles(&self) -> (Real, Real, Real) {
        self.rotation.euler_angles()
    }

    /// Map a camera-space ray into the sphere frame.
    #[inline]
    pub fn rotate(&self, v: &Vector3<Real>) -> Vector3<Real> {
        self.rotation * v
    }

    pub fn inverse(&self) -> Self {
        Self {
            rotation: self.rotation.inverse(),
        }
    }

    /// `self * other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &Orientation) -> Self {
        Self {
            rotation: self.rotation * other.rotation,
        }
    }
}

impl TryFrom<[[Real; 3]; 3]> for Orientation {
    type Error = PanoviewError;

    fn try_from(rows: [[Real; 3]; 3]) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<Orientation> for [[Real; 3]; 3] {
    fn from(o: Orientation) -> Self {
        o.to_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::real::consts::{FRAC_PI_2, FRAC_PI_4};
    use approx::assert_relative_eq;

    #[test]
    fn constructors_agree_on_a_pan() {
        // quarter turn about +y
        let euler = Orientation::from_euler(0.0, FRAC_PI_2, 0.0).expect("euler");
        let axis = Orientation::from_axis_angle(Vector3::y(), FRAC_PI_2).expect("axis");
        let half = FRAC_PI_4;
        let quat = Orientation::from_quaternion(half.cos(), 0.0, half.sin(), 0.0).expect("quat");
        let rvec = Orientation::from_rotation_vector(Vector3::y() * FRAC_PI_2).expect("rvec");

        for o in [axis, quat, rvec] {
            assert_relative_eq!(*o.matrix(), *euler.matrix(), epsilon = 1e-5);
        }
        // forward ray turns toward +x
        let r = euler.rotate(&Vector3::z());
        assert_relative_eq!(r, Vector3::x(), epsilon = 1e-6);
    }

    #[test]
    fn euler_composition_order_is_z_y_x() {
        let (roll, pitch, yaw) = (0.3, -0.2, 1.1);
        let o = Orientation::from_euler(roll, pitch, yaw).expect("euler");
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), roll);
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), pitch);
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), yaw);
        assert_relative_eq!(*o.matrix(), *(rz * ry * rx).matrix(), epsilon = 1e-5);

        let (r2, p2, y2) = o.euler_angles();
        assert_relative_eq!(r2, roll, epsilon = 1e-5);
        assert_relative_eq!(p2, pitch, epsilon = 1e-5);
        assert_relative_eq!(y2, yaw, epsilon = 1e-5);
    }

    #[test]
    fn rodrigues_handles_unnormalized_axis() {
        let a = Orientation::from_axis_angle(Vector3::new(0.0, 0.0, 5.0), 0.7).expect("axis");
        let b = Orientation::from_euler(0.0, 0.0, 0.7).expect("euler");
        assert_relative_eq!(*a.matrix(), *b.matrix(), epsilon = 1e-5);
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        assert!(Orientation::from_axis_angle(Vector3::zeros(), 1.0).is_err());
        assert!(Orientation::from_quaternion(0.0, 0.0, 0.0, 0.0).is_err());
        assert!(Orientation::from_euler(Real::NAN, 0.0, 0.0).is_err());
        assert_eq!(
            Orientation::from_rotation_vector(Vector3::zeros()).expect("zero"),
            Orientation::identity()
        );
    }

    #[test]
    fn non_orthonormal_matrices_fail_validation() {
        let scaled = Matrix3::identity() * 2.0;
        assert!(matches!(
            Orientation::from_matrix(scaled),
            Err(PanoviewError::InvalidOrientation { .. })
        ));

        // reflection: orthogonal but det = -1
        let mirror = Orientation::from_rows([[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(matches!(
            mirror,
            Err(PanoviewError::InvalidOrientation { determinant, .. }) if determinant < 0.0
        ));

        let shear = Orientation::from_rows([[1.0, 0.1, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(shear.is_err());
    }

    #[test]
    fn valid_matrices_round_trip_through_rows() {
        let o = Orientation::from_euler(0.1, 0.2, 0.3).expect("euler");
        let back = Orientation::from_rows(o.to_rows()).expect("still orthonormal");
        assert_relative_eq!(*back.matrix(), *o.matrix(), epsilon = 1e-6);
    }

    #[test]
    fn pan_tilt_directions() {
        let right = Orientation::from_pan_tilt(90.0, 0.0, 0.0).expect("pan");
        assert_relative_eq!(right.rotate(&Vector3::z()), Vector3::x(), epsilon = 1e-5);

        let up = Orientation::from_pan_tilt(0.0, 90.0, 0.0).expect("tilt");
        assert_relative_eq!(up.rotate(&Vector3::z()), -Vector3::y(), epsilon = 1e-5);

        // image +x axis turns toward +y (down) for a clockwise spin
        let spin = Orientation::from_pan_tilt(0.0, 0.0, 90.0).expect("spin");
        assert_relative_eq!(spin.rotate(&Vector3::x()), Vector3::y(), epsilon = 1e-5);
    }

    #[test]
    fn serde_uses_rows_and_validates() {
        let o = Orientation::from_pan_tilt(30.0, -5.0, 0.0).expect("pan");
        let json = serde_json::to_string(&o).expect("serialize");
        let back: Orientation = serde_json::from_str(&json).expect("deserialize");
        assert_relative_eq!(*back.matrix(), *o.matrix(), epsilon = 1e-6);

        let scaled = "[[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]]";
        let err = serde_json::from_str::<Orientation>(scaled).expect_err("not a rotation");
        assert!(err.to_string().contains("not orthonormal"), "{err}");
        assert!(matches!(
            Orientation::try_from([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]]),
            Err(PanoviewError::InvalidOrientation { .. })
        ));
    }

    #[test]
    fn inverse_and_compose_cancel() {
        let o = Orientation::from_euler(0.4, -0.5, 2.0).expect("euler");
        let id = o.compose(&o.inverse());
        assert_relative_eq!(*id.matrix(), Matrix3::identity(), epsilon = 1e-5);
    }
}
