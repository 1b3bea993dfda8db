//! JSON-configurable view and sampling parameters.

use crate::ReprojectionSession;
use panoview_core::{
    BorderPolicy, CameraIntrinsic, Interpolation, Orientation, PanoviewError, Real,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] PanoviewError),
}

/// How the panorama is sampled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemapParams {
    pub interpolation: Interpolation,
    pub border: BorderPolicy,
}

fn default_width() -> usize {
    640
}

fn default_height() -> usize {
    480
}

fn default_hfov() -> Real {
    90.0
}

/// A complete pinhole view description.
///
/// Angles are in degrees; see [`Orientation::from_pan_tilt`] for their sense.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_hfov")]
    pub hfov_deg: Real,
    /// Explicit intrinsics; overrides `width`, `height` and `hfov_deg`.
    #[serde(default)]
    pub intrinsic: Option<CameraIntrinsic>,
    #[serde(default)]
    pub pan_deg: Real,
    #[serde(default)]
    pub tilt_deg: Real,
    #[serde(default)]
    pub spin_deg: Real,
    #[serde(default)]
    pub remap: RemapParams,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            hfov_deg: default_hfov(),
            intrinsic: None,
            pan_deg: 0.0,
            tilt_deg: 0.0,
            spin_deg: 0.0,
            remap: RemapParams::default(),
        }
    }
}

impl ViewConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn intrinsic(&self) -> Result<CameraIntrinsic, PanoviewError> {
        match self.intrinsic {
            Some(k) => {
                k.validate()?;
                Ok(k)
            }
            None => CameraIntrinsic::from_field_of_view(self.width, self.height, self.hfov_deg),
        }
    }

    pub fn orientation(&self) -> Result<Orientation, PanoviewError> {
        Orientation::from_pan_tilt(self.pan_deg, self.tilt_deg, self.spin_deg)
    }

    /// A session with this view's intrinsics, orientation and sampling.
    pub fn build_session(&self) -> Result<ReprojectionSession, PanoviewError> {
        let mut session = ReprojectionSession::with_params(self.remap);
        session.set_intrinsic(self.intrinsic()?)?;
        session.set_orientation(self.orientation()?);
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: ViewConfig = serde_json::from_str(r#"{"pan_deg": 30.0}"#).expect("parse");
        assert_eq!(cfg.width, 640);
        assert_eq!(cfg.height, 480);
        assert_eq!(cfg.hfov_deg, 90.0);
        assert_eq!(cfg.pan_deg, 30.0);
        assert_eq!(cfg.remap, RemapParams::default());
    }

    #[test]
    fn remap_params_use_snake_case() {
        let p: RemapParams =
            serde_json::from_str(r#"{"interpolation": "nearest", "border": "skip"}"#).expect("parse");
        assert_eq!(p.interpolation, Interpolation::Nearest);
        assert_eq!(p.border, BorderPolicy::Skip);
    }

    #[test]
    fn explicit_intrinsic_overrides_fov() {
        let cfg = ViewConfig {
            intrinsic: Some(CameraIntrinsic {
                width: 10,
                height: 20,
                fx: 5.0,
                fy: 6.0,
                cx: 5.0,
                cy: 10.0,
            }),
            ..ViewConfig::default()
        };
        let k = cfg.intrinsic().expect("valid");
        assert_eq!((k.width, k.height), (10, 20));

        let bad = ViewConfig {
            hfov_deg: 180.0,
            ..ViewConfig::default()
        };
        assert!(bad.intrinsic().is_err());
        assert!(bad.build_session().is_err());
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("view.json");
        let cfg = ViewConfig {
            width: 320,
            tilt_deg: -12.5,
            remap: RemapParams {
                interpolation: Interpolation::Nearest,
                border: BorderPolicy::Extend,
            },
            ..ViewConfig::default()
        };
        cfg.write_json(&path).expect("write");
        let back = ViewConfig::load_json(&path).expect("load");
        assert_eq!(back, cfg);

        assert!(matches!(
            ViewConfig::load_json(dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
