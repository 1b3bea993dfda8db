//! Stateful panorama-to-pinhole renderer with a lazily rebuilt remap table.

use crate::{EquirectMap, RemapEngine, RemapParams};
use log::{debug, trace, warn};
use nalgebra::Matrix3;
use panoview_core::{
    CameraIntrinsic, Orientation, PanoviewError, PixelBuffer, PixelBufferView, Real, Result,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No intrinsic has been set yet; `render` fails.
    Uninitialized,
    Ready,
}

/// Renders pinhole views of an equirectangular panorama.
///
/// Inputs may be set in any order and any number of times. The remap table
/// is rebuilt on the next [`render`](Self::render) only when the intrinsic,
/// the orientation or the panorama size changed; new panorama content alone
/// reuses the cached table.
///
/// ```
/// use panoview_core::{Orientation, PixelBuffer};
/// use panoview_equirect::ReprojectionSession;
///
/// # fn main() -> Result<(), panoview_core::PanoviewError> {
/// let pano = PixelBuffer::from_fn(256, 128, 3, |x, _, _| x as u8);
/// let mut session = ReprojectionSession::new();
/// session.set_intrinsic_fov(64, 48, 90.0)?;
/// session.set_orientation(Orientation::from_pan_tilt(30.0, 10.0, 0.0)?);
/// session.set_source(&pano.view())?;
/// let view = session.render()?;
/// assert_eq!((view.width, view.height, view.channels), (64, 48, 3));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct ReprojectionSession {
    engine: RemapEngine,
    intrinsic: Option<CameraIntrinsic>,
    orientation: Orientation,
    source: PixelBuffer,
    output: PixelBuffer,
    model: Option<EquirectMap>,
    model_stale: bool,
    model_rebuilds: usize,
}

impl ReprojectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: RemapParams) -> Self {
        Self {
            engine: RemapEngine::new(params),
            ..Self::default()
        }
    }

    pub fn params(&self) -> RemapParams {
        self.engine.params()
    }

    /// Change interpolation/border handling. The remap table is unaffected.
    pub fn set_params(&mut self, params: RemapParams) {
        self.engine = RemapEngine::new(params);
    }

    pub fn state(&self) -> SessionState {
        if self.intrinsic.is_some() {
            SessionState::Ready
        } else {
            SessionState::Uninitialized
        }
    }

    pub fn intrinsic(&self) -> Option<&CameraIntrinsic> {
        self.intrinsic.as_ref()
    }

    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    pub fn is_model_stale(&self) -> bool {
        self.model_stale || self.model.is_none()
    }

    /// How many times the remap table has been computed.
    pub fn model_rebuilds(&self) -> usize {
        self.model_rebuilds
    }

    pub fn set_intrinsic(&mut self, intrinsic: CameraIntrinsic) -> Result<()> {
        intrinsic.validate()?;
        if self.output.reshape(intrinsic.width, intrinsic.height, self.source.channels) {
            debug!(
                "output reshaped to {}x{}x{}",
                intrinsic.width, intrinsic.height, self.source.channels
            );
        }
        self.intrinsic = Some(intrinsic);
        self.model_stale = true;
        Ok(())
    }

    /// Square-pixel, centred intrinsic from a horizontal field of view.
    pub fn set_intrinsic_fov(&mut self, width: usize, height: usize, hfov_degrees: Real) -> Result<()> {
        self.set_intrinsic(CameraIntrinsic::from_field_of_view(
            width,
            height,
            hfov_degrees,
        )?)
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.model_stale = true;
    }

    /// Set the orientation from a raw matrix, rejecting non-rotations.
    pub fn set_orientation_matrix(&mut self, r: Matrix3<Real>) -> Result<()> {
        self.set_orientation(Orientation::from_matrix(r)?);
        Ok(())
    }

    /// Copy the panorama into the session.
    ///
    /// The internal copy is reallocated only when the shape changes; a new
    /// width or height also invalidates the remap table.
    pub fn set_source(&mut self, src: &PixelBufferView<'_>) -> Result<()> {
        src.validate()?;
        if self.source.copy_from(src) {
            debug!("panorama resized to {}x{}", src.width, src.height);
            self.model_stale = true;
        }
        Ok(())
    }

    pub fn source(&self) -> &PixelBuffer {
        &self.source
    }

    fn prepare(&mut self) -> Result<()> {
        let intrinsic = self
            .intrinsic
            .ok_or(PanoviewError::NotConfigured("set_intrinsic must be called before render"))?;
        if self.source.is_empty() {
            return Err(PanoviewError::NotConfigured(
                "set_source must be called before render",
            ));
        }

        if self.is_model_stale() {
            let (sw, sh) = (self.source.width, self.source.height);
            match self.model.as_mut() {
                Some(map) => map.rebuild(&intrinsic, &self.orientation, sw, sh)?,
                None => {
                    self.model = Some(EquirectMap::build(
                        &intrinsic,
                        &self.orientation,
                        sw,
                        sh,
                    )?)
                }
            }
            self.model_stale = false;
            self.model_rebuilds += 1;
            debug!(
                "remap table rebuilt ({}x{} <- {}x{}, rebuild #{})",
                intrinsic.width, intrinsic.height, sw, sh, self.model_rebuilds
            );
        }
        Ok(())
    }

    fn remap(
        engine: &RemapEngine,
        model: Option<&EquirectMap>,
        source: &PixelBuffer,
        dst: &mut PixelBuffer,
    ) -> Result<()> {
        let map = model.ok_or(PanoviewError::NotConfigured("remap table missing"))?;
        dst.reshape(map.width(), map.height(), source.channels);
        let stats = engine.apply(map, &source.view(), dst)?;
        if stats.skipped > 0 {
            warn!(
                "{} of {} pixels fell outside the panorama and were zeroed",
                stats.skipped,
                map.width() * map.height()
            );
        }
        trace!("rendered {}x{} view", map.width(), map.height());
        Ok(())
    }

    /// Render the current view.
    ///
    /// Every pixel of the returned buffer is rewritten on each call; the
    /// storage is reused between calls.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn render(&mut self) -> Result<&PixelBuffer> {
        self.prepare()?;
        Self::remap(&self.engine, self.model.as_ref(), &self.source, &mut self.output)?;
        Ok(&self.output)
    }

    /// Render into a caller-owned buffer, reshaping it as needed.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self, out)))]
    pub fn render_into(&mut self, out: &mut PixelBuffer) -> Result<()> {
        self.prepare()?;
        Self::remap(&self.engine, self.model.as_ref(), &self.source, out)
    }
}
