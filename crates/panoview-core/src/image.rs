//! Interleaved multi-channel 8-bit pixel buffers.
//!
//! Samples are stored row-major with channels interleaved:
//! `data[(y * width + x) * channels + c]`. No channel order is implied; the
//! core only ever treats channels as independent planes of the same geometry.

use crate::{PanoviewError, Result};

fn check_shape(width: usize, height: usize, channels: usize, len: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(PanoviewError::invalid(
            "buffer",
            format!("dimensions must be positive (got {width}x{height})"),
        ));
    }
    if channels == 0 {
        return Err(PanoviewError::invalid("buffer", "channel count must be positive"));
    }
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| PanoviewError::invalid("buffer", "dimensions overflow usize"))?;
    if len != expected {
        return Err(PanoviewError::invalid(
            "buffer",
            format!("expected {expected} samples for {width}x{height}x{channels}, got {len}"),
        ));
    }
    Ok(())
}

/// Borrowed view over caller-owned pixel data.
#[derive(Clone, Copy, Debug)]
pub struct PixelBufferView<'a> {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: &'a [u8], // row-major, interleaved, len = w*h*c
}

impl<'a> PixelBufferView<'a> {
    /// Wrap `data`, checking that its length matches the declared shape.
    pub fn new(width: usize, height: usize, channels: usize, data: &'a [u8]) -> Result<Self> {
        check_shape(width, height, channels, data.len())?;
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Re-check the shape invariants of a view assembled field by field.
    pub fn validate(&self) -> Result<()> {
        check_shape(self.width, self.height, self.channels, self.data.len())
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &'a [u8] {
        let start = (y * self.width + x) * self.channels;
        &self.data[start..start + self.channels]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> u8 {
        self.data[(y * self.width + x) * self.channels + c]
    }
}

/// Owned pixel buffer.
///
/// A zero-sized buffer (`PixelBuffer::default()`) is the placeholder used
/// before anything has been written; every other buffer satisfies
/// `data.len() == width * height * channels`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Zero-filled buffer of the given shape.
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
            data: vec![0u8; width * height * channels],
        }
    }

    /// Take ownership of `data`, checking that it matches the declared shape.
    pub fn from_raw(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        check_shape(width, height, channels, data.len())?;
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Build a buffer by evaluating `f(x, y, c)` for every sample.
    pub fn from_fn(
        width: usize,
        height: usize,
        channels: usize,
        mut f: impl FnMut(usize, usize, usize) -> u8,
    ) -> Self {
        let mut data = Vec::with_capacity(width * height * channels);
        for y in 0..height {
            for x in 0..width {
                for c in 0..channels {
                    data.push(f(x, y, c));
                }
            }
        }
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    pub fn view(&self) -> PixelBufferView<'_> {
        PixelBufferView {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: &self.data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of samples in one row.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.width * self.channels
    }

    /// Change the shape, reallocating only when it actually differs.
    ///
    /// Returns `true` when the shape changed. Content is unspecified after a
    /// change and untouched otherwise.
    pub fn reshape(&mut self, width: usize, height: usize, channels: usize) -> bool {
        if self.width == width && self.height == height && self.channels == channels {
            return false;
        }
        self.width = width;
        self.height = height;
        self.channels = channels;
        self.data.clear();
        self.data.resize(width * height * channels, 0);
        true
    }

    /// Copy `src` into this buffer, reshaping first if needed.
    ///
    /// Returns `true` when the width or height changed.
    pub fn copy_from(&mut self, src: &PixelBufferView<'_>) -> bool {
        let resized = self.width != src.width || self.height != src.height;
        self.reshape(src.width, src.height, src.channels);
        self.data.copy_from_slice(src.data);
        resized
    }

    pub fn fill(&mut self, value: u8) {
        self.data.fill(value);
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let start = (y * self.width + x) * self.channels;
        &self.data[start..start + self.channels]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        let start = (y * self.width + x) * self.channels;
        &mut self.data[start..start + self.channels]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_rejects_wrong_length() {
        let data = vec![0u8; 11];
        assert!(matches!(
            PixelBufferView::new(2, 2, 3, &data),
            Err(PanoviewError::InvalidParameter { name: "buffer", .. })
        ));
        let ok = vec![0u8; 12];
        assert!(PixelBufferView::new(2, 2, 3, &ok).is_ok());
    }

    #[test]
    fn view_rejects_zero_dimensions() {
        assert!(PixelBufferView::new(0, 4, 1, &[]).is_err());
        assert!(PixelBuffer::from_raw(4, 4, 0, Vec::new()).is_err());
    }

    #[test]
    fn pixel_access_is_interleaved() {
        let buf = PixelBuffer::from_fn(3, 2, 2, |x, y, c| (10 * y + x) as u8 + 100 * c as u8);
        assert_eq!(buf.pixel(2, 1), &[12, 112]);
        assert_eq!(buf.view().get(1, 0, 1), 101);
    }

    #[test]
    fn reshape_reallocates_only_on_change() {
        let mut buf = PixelBuffer::new(4, 3, 3);
        buf.fill(7);
        assert!(!buf.reshape(4, 3, 3));
        assert!(buf.data.iter().all(|&v| v == 7));

        assert!(buf.reshape(5, 3, 3));
        assert_eq!(buf.data.len(), 45);
    }

    #[test]
    fn copy_from_reports_dimension_change_only() {
        let a = PixelBuffer::new(4, 2, 1);
        let b = PixelBuffer::from_fn(4, 2, 1, |x, _, _| x as u8);
        let mut dst = PixelBuffer::default();
        assert!(dst.copy_from(&a.view()));
        assert!(!dst.copy_from(&b.view()));
        assert_eq!(dst, b);
    }
}
