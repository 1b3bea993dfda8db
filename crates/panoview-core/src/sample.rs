//! Fractional-coordinate sampling with explicit border handling.
//!
//! Pixel centres sit on integer coordinates: `(0.0, 0.0)` is the centre of
//! the top-left pixel and `(width - 1, height - 1)` the centre of the
//! bottom-right one.

use crate::PixelBufferView;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    Nearest,
    #[default]
    Bilinear,
}

/// Treatment of coordinates that fall outside the source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderPolicy {
    /// Repeat the closest edge pixel.
    #[default]
    Extend,
    /// Reject the sample; the caller decides what to write instead.
    Skip,
}

/// Interpolation + border policy, optionally with cyclic columns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sampler {
    pub interpolation: Interpolation,
    pub border: BorderPolicy,
    /// Column `width` is column `0` again (360° panoramas).
    #[serde(default)]
    pub wrap_columns: bool,
}

#[inline]
fn quantize(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

impl Sampler {
    pub fn new(interpolation: Interpolation, border: BorderPolicy) -> Self {
        Self {
            interpolation,
            border,
            wrap_columns: false,
        }
    }

    pub fn with_wrapped_columns(mut self) -> Self {
        self.wrap_columns = true;
        self
    }

    #[inline]
    fn column(&self, x: i32, width: usize) -> usize {
        if self.wrap_columns {
            x.rem_euclid(width as i32) as usize
        } else {
            x.clamp(0, width as i32 - 1) as usize
        }
    }

    #[inline]
    fn row(y: i32, height: usize) -> usize {
        y.clamp(0, height as i32 - 1) as usize
    }

    /// Whether `(x, y)` lies inside the sampled domain.
    #[inline]
    pub fn contains(&self, src: &PixelBufferView<'_>, x: f32, y: f32) -> bool {
        let x_ok = if self.wrap_columns {
            x.is_finite()
        } else {
            x >= 0.0 && x <= (src.width - 1) as f32
        };
        x_ok && y >= 0.0 && y <= (src.height - 1) as f32
    }

    /// Source pixels and weights for `(x, y)`, or `None` when
    /// [`BorderPolicy::Skip`] rejects the coordinate.
    #[inline]
    fn taps(&self, src: &PixelBufferView<'_>, x: f32, y: f32) -> Option<Taps> {
        if self.border == BorderPolicy::Skip && !self.contains(src, x, y) {
            return None;
        }
        let taps = match self.interpolation {
            Interpolation::Nearest => Taps::Nearest {
                col: self.column(x.round() as i32, src.width),
                row: Self::row(y.round() as i32, src.height),
            },
            Interpolation::Bilinear => {
                let xf = x.floor();
                let yf = y.floor();
                let (x0, y0) = (xf as i32, yf as i32);
                Taps::Bilinear {
                    cols: [
                        self.column(x0, src.width),
                        self.column(x0.saturating_add(1), src.width),
                    ],
                    rows: [
                        Self::row(y0, src.height),
                        Self::row(y0.saturating_add(1), src.height),
                    ],
                    fx: x - xf,
                    fy: y - yf,
                }
            }
        };
        Some(taps)
    }

    /// Interpolate every channel of `src` at `(x, y)` into `out`.
    ///
    /// `out.len()` must equal `src.channels`. Returns `false` and leaves `out`
    /// untouched when [`BorderPolicy::Skip`] rejects the coordinate.
    #[inline]
    pub fn sample_into(&self, src: &PixelBufferView<'_>, x: f32, y: f32, out: &mut [u8]) -> bool {
        let Some(taps) = self.taps(src, x, y) else {
            return false;
        };
        for (c, o) in out.iter_mut().enumerate() {
            *o = quantize(taps.value(src, c));
        }
        true
    }

    /// Interpolate one channel without quantizing.
    pub fn sample(&self, src: &PixelBufferView<'_>, x: f32, y: f32, channel: usize) -> Option<f32> {
        self.taps(src, x, y).map(|taps| taps.value(src, channel))
    }
}

enum Taps {
    Nearest {
        col: usize,
        row: usize,
    },
    Bilinear {
        cols: [usize; 2],
        rows: [usize; 2],
        fx: f32,
        fy: f32,
    },
}

impl Taps {
    #[inline]
    fn value(&self, src: &PixelBufferView<'_>, channel: usize) -> f32 {
        match *self {
            Taps::Nearest { col, row } => src.get(col, row, channel) as f32,
            Taps::Bilinear { cols, rows, fx, fy } => {
                let p00 = src.get(cols[0], rows[0], channel) as f32;
                let p10 = src.get(cols[1], rows[0], channel) as f32;
                let p01 = src.get(cols[0], rows[1], channel) as f32;
                let p11 = src.get(cols[1], rows[1], channel) as f32;
                let a = p00 + fx * (p10 - p00);
                let b = p01 + fx * (p11 - p01);
                a + fy * (b - a)
            }
        }
    }
}
