//! Adapters between `image` buffers and panoview pixel buffers.
//!
//! `image`'s 8-bit buffers are already interleaved row-major, so views are
//! zero-copy and channel order is passed through unchanged.

use crate::{PanoviewError, PixelBuffer, PixelBufferView};
use ::image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

/// A [`PixelBuffer`] that has no `image` counterpart.
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("cannot build an image from {channels} channel(s) (expected 1, 3 or 4)")]
    UnsupportedChannels { channels: usize },

    #[error("image dimensions {width}x{height} do not fit in u32")]
    TooLarge { width: usize, height: usize },

    #[error(transparent)]
    Panoview(#[from] PanoviewError),
}

pub fn rgb_view(img: &RgbImage) -> PixelBufferView<'_> {
    PixelBufferView {
        width: img.width() as usize,
        height: img.height() as usize,
        channels: 3,
        data: img.as_raw(),
    }
}

pub fn rgba_view(img: &RgbaImage) -> PixelBufferView<'_> {
    PixelBufferView {
        width: img.width() as usize,
        height: img.height() as usize,
        channels: 4,
        data: img.as_raw(),
    }
}

pub fn gray_view(img: &GrayImage) -> PixelBufferView<'_> {
    PixelBufferView {
        width: img.width() as usize,
        height: img.height() as usize,
        channels: 1,
        data: img.as_raw(),
    }
}

/// Decode any `DynamicImage` into an 8-bit buffer, keeping gray images
/// single-channel and alpha when present.
pub fn buffer_from_dynamic(img: &DynamicImage) -> PixelBuffer {
    let color = img.color();
    let (width, height) = (img.width() as usize, img.height() as usize);
    let (channels, data) = if !color.has_color() && !color.has_alpha() {
        (1, img.to_luma8().into_raw())
    } else if color.has_alpha() {
        (4, img.to_rgba8().into_raw())
    } else {
        (3, img.to_rgb8().into_raw())
    };
    PixelBuffer {
        width,
        height,
        channels,
        data,
    }
}

fn dims(buf: &PixelBuffer) -> Result<(u32, u32), ConvertError> {
    let too_large = || ConvertError::TooLarge {
        width: buf.width,
        height: buf.height,
    };
    Ok((
        u32::try_from(buf.width).map_err(|_| too_large())?,
        u32::try_from(buf.height).map_err(|_| too_large())?,
    ))
}

pub fn to_rgb_image(buf: &PixelBuffer) -> Result<RgbImage, ConvertError> {
    match to_dynamic_image(buf)? {
        DynamicImage::ImageRgb8(img) => Ok(img),
        _ => Err(ConvertError::UnsupportedChannels {
            channels: buf.channels,
        }),
    }
}

pub fn to_gray_image(buf: &PixelBuffer) -> Result<GrayImage, ConvertError> {
    match to_dynamic_image(buf)? {
        DynamicImage::ImageLuma8(img) => Ok(img),
        _ => Err(ConvertError::UnsupportedChannels {
            channels: buf.channels,
        }),
    }
}

/// 1 channel -> Luma8, 3 -> Rgb8, 4 -> Rgba8.
pub fn to_dynamic_image(buf: &PixelBuffer) -> Result<DynamicImage, ConvertError> {
    buf.view().validate()?;
    let (w, h) = dims(buf)?;
    let data = buf.data.clone();
    let unsupported = ConvertError::UnsupportedChannels {
        channels: buf.channels,
    };
    let img = match buf.channels {
        1 => GrayImage::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
        4 => RgbaImage::from_raw(w, h, data).map(DynamicImage::ImageRgba8),
        _ => return Err(unsupported),
    };
    img.ok_or(unsupported)
}
