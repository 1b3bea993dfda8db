//! Full-frame resampling of a panorama through an [`EquirectMap`].

use crate::{EquirectMap, RemapParams};
use nalgebra::Point2;
use panoview_core::{PanoviewError, PixelBuffer, PixelBufferView, Result, Sampler};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Counters from one remap pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RemapStats {
    /// Destination pixels written as zero because the border policy
    /// rejected their sample.
    pub skipped: usize,
}

/// Samples a panorama at every coordinate of a remap table.
///
/// Columns always wrap around the panorama seam; the configured border
/// policy only matters for coordinates that are still outside after that
/// (non-finite table entries, or rows beyond the poles).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemapEngine {
    sampler: Sampler,
}

impl Default for RemapEngine {
    fn default() -> Self {
        Self::new(RemapParams::default())
    }
}

fn remap_row(
    sampler: &Sampler,
    src: &PixelBufferView<'_>,
    coords: &[Point2<f32>],
    out: &mut [u8],
) -> usize {
    let mut skipped = 0;
    for (p, px) in coords.iter().zip(out.chunks_exact_mut(src.channels)) {
        if !sampler.sample_into(src, p.x, p.y, px) {
            px.fill(0);
            skipped += 1;
        }
    }
    skipped
}

impl RemapEngine {
    pub fn new(params: RemapParams) -> Self {
        Self {
            sampler: Sampler::new(params.interpolation, params.border).with_wrapped_columns(),
        }
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    pub fn params(&self) -> RemapParams {
        RemapParams {
            interpolation: self.sampler.interpolation,
            border: self.sampler.border,
        }
    }

    /// Overwrite every pixel of `dst` with samples of `src` taken at the
    /// coordinates in `map`. Channels are interpolated independently.
    ///
    /// `src` must have the panorama size the table was built for and `dst`
    /// its destination size; both must have the same channel count.
    pub fn apply(
        &self,
        map: &EquirectMap,
        src: &PixelBufferView<'_>,
        dst: &mut PixelBuffer,
    ) -> Result<RemapStats> {
        src.validate()?;
        if !map.fits(dst.width, dst.height, src.width, src.height) {
            return Err(PanoviewError::ModelMismatch {
                map_width: map.width(),
                map_height: map.height(),
                map_source_width: map.source_width(),
                map_source_height: map.source_height(),
                dst_width: dst.width,
                dst_height: dst.height,
                src_width: src.width,
                src_height: src.height,
            });
        }
        if dst.channels != src.channels || dst.data.len() != dst.row_len() * dst.height {
            return Err(PanoviewError::ChannelMismatch {
                source_channels: src.channels,
                destination_channels: dst.channels,
            });
        }

        let row_len = dst.row_len();
        let sampler = &self.sampler;

        #[cfg(feature = "rayon")]
        let skipped: usize = dst
            .data
            .par_chunks_mut(row_len)
            .zip(map.coords().par_chunks(map.width()))
            .map(|(out, coords)| remap_row(sampler, src, coords, out))
            .sum();

        #[cfg(not(feature = "rayon"))]
        let skipped: usize = dst
            .data
            .chunks_mut(row_len)
            .zip(map.coords().chunks(map.width()))
            .map(|(out, coords)| remap_row(sampler, src, coords, out))
            .sum();

        Ok(RemapStats { skipped })
    }
}
