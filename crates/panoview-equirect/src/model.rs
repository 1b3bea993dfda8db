//! Per-pixel mapping from a pinhole view into an equirectangular panorama.
//!
//! Sphere convention: +x right, +y down, +z forward (same axes as the
//! camera). Longitude is `atan2(x, z)` in `[-π, π]`, zero straight ahead and
//! positive to the right. Latitude is `-asin(y / |r|)` in `[-π/2, π/2]`,
//! positive toward the top of the panorama. Column 0 of the panorama is
//! longitude `-π`, row 0 is the north pole.

use nalgebra::{Point2, Vector3};
use panoview_core::real::{consts::PI, Real};
use panoview_core::{CameraIntrinsic, Orientation, PanoviewError, Result};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// `(longitude, latitude)` in radians of a sphere-frame direction.
#[inline]
pub fn ray_to_lonlat(r: &Vector3<Real>) -> (Real, Real) {
    let n = r.norm();
    let longitude = r.x.atan2(r.z);
    let latitude = -(r.y / n).clamp(-1.0, 1.0).asin();
    (longitude, latitude)
}

/// Fractional panorama coordinate of `(longitude, latitude)`.
///
/// Columns wrap modulo `source_width`; rows are clamped to the pole rows.
#[inline]
pub fn lonlat_to_equirect(
    longitude: Real,
    latitude: Real,
    source_width: usize,
    source_height: usize,
) -> Point2<Real> {
    let w = source_width as Real;
    let h = source_height as Real;

    let mut col = ((longitude / PI + 1.0) * 0.5 * w).rem_euclid(w);
    // rem_euclid can round up to exactly `w` for tiny negative inputs
    if col >= w {
        col -= w;
    }
    let row = ((0.5 - latitude / PI) * h).clamp(0.0, h - 1.0);
    Point2::new(col, row)
}

/// Panorama coordinate seen by destination pixel `(u, v)`.
#[inline]
pub fn project_pixel(
    intrinsic: &CameraIntrinsic,
    orientation: &Orientation,
    source_width: usize,
    source_height: usize,
    u: Real,
    v: Real,
) -> Point2<Real> {
    let ray = orientation.rotate(&intrinsic.ray(u, v));
    let (lon, lat) = ray_to_lonlat(&ray);
    lonlat_to_equirect(lon, lat, source_width, source_height)
}

/// Cached remap table: one panorama coordinate per destination pixel,
/// row-major.
///
/// Depends only on geometry (intrinsic, orientation, panorama size), never
/// on pixel content.
#[derive(Clone, Debug, PartialEq)]
pub struct EquirectMap {
    width: usize,
    height: usize,
    source_width: usize,
    source_height: usize,
    coords: Vec<Point2<f32>>,
}

fn fill_row(
    row: &mut [Point2<f32>],
    v: usize,
    intrinsic: &CameraIntrinsic,
    orientation: &Orientation,
    source_width: usize,
    source_height: usize,
) {
    for (u, p) in row.iter_mut().enumerate() {
        let q = project_pixel(
            intrinsic,
            orientation,
            source_width,
            source_height,
            u as Real,
            v as Real,
        );
        *p = Point2::new(q.x as f32, q.y as f32);
    }
}

impl EquirectMap {
    /// Compute the table for a view of `intrinsic` at `orientation` into a
    /// `source_width x source_height` panorama.
    pub fn build(
        intrinsic: &CameraIntrinsic,
        orientation: &Orientation,
        source_width: usize,
        source_height: usize,
    ) -> Result<Self> {
        let mut map = Self {
            width: 0,
            height: 0,
            source_width: 0,
            source_height: 0,
            coords: Vec::new(),
        };
        map.rebuild(intrinsic, orientation, source_width, source_height)?;
        Ok(map)
    }

    /// Wrap a precomputed table (row-major, `width * height` entries).
    pub fn from_coords(
        width: usize,
        height: usize,
        source_width: usize,
        source_height: usize,
        coords: Vec<Point2<f32>>,
    ) -> Result<Self> {
        if width == 0 || height == 0 || source_width == 0 || source_height == 0 {
            return Err(PanoviewError::invalid("map", "table dimensions must be positive"));
        }
        if coords.len() != width * height {
            return Err(PanoviewError::invalid(
                "map",
                format!("expected {} entries, got {}", width * height, coords.len()),
            ));
        }
        Ok(Self {
            width,
            height,
            source_width,
            source_height,
            coords,
        })
    }

    /// Recompute in place, reusing the table allocation when possible.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, intrinsic, orientation),
            fields(width = intrinsic.width, height = intrinsic.height)
        )
    )]
    pub fn rebuild(
        &mut self,
        intrinsic: &CameraIntrinsic,
        orientation: &Orientation,
        source_width: usize,
        source_height: usize,
    ) -> Result<()> {
        intrinsic.validate()?;
        if source_width == 0 || source_height == 0 {
            return Err(PanoviewError::invalid(
                "source",
                format!("panorama size must be positive (got {source_width}x{source_height})"),
            ));
        }

        let (w, h) = (intrinsic.width, intrinsic.height);
        self.width = w;
        self.height = h;
        self.source_width = source_width;
        self.source_height = source_height;
        self.coords.clear();
        self.coords.resize(w * h, Point2::origin());

        #[cfg(feature = "rayon")]
        self.coords
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(v, row)| {
                fill_row(row, v, intrinsic, orientation, source_width, source_height)
            });

        #[cfg(not(feature = "rayon"))]
        self.coords
            .chunks_mut(w)
            .enumerate()
            .for_each(|(v, row)| {
                fill_row(row, v, intrinsic, orientation, source_width, source_height)
            });

        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn source_width(&self) -> usize {
        self.source_width
    }

    pub fn source_height(&self) -> usize {
        self.source_height
    }

    /// Panorama coordinate sampled by destination pixel `(u, v)`.
    #[inline]
    pub fn source_coord(&self, u: usize, v: usize) -> Option<Point2<f32>> {
        if u >= self.width || v >= self.height {
            return None;
        }
        self.coords.get(v * self.width + u).copied()
    }

    pub fn coords(&self) -> &[Point2<f32>] {
        &self.coords
    }

    /// Whether this table was built for these destination and source sizes.
    pub fn fits(
        &self,
        dst_width: usize,
        dst_height: usize,
        src_width: usize,
        src_height: usize,
    ) -> bool {
        self.width == dst_width
            && self.height == dst_height
            && self.source_width == src_width
            && self.source_height == src_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use panoview_core::real::consts::FRAC_PI_2;

    fn view(w: usize, h: usize, hfov: Real) -> CameraIntrinsic {
        CameraIntrinsic::from_field_of_view(w, h, hfov).expect("intrinsic")
    }

    #[test]
    fn forward_ray_hits_panorama_centre() {
        let (lon, lat) = ray_to_lonlat(&Vector3::z());
        assert_relative_eq!(lon, 0.0);
        assert_relative_eq!(lat, 0.0);
        let p = lonlat_to_equirect(lon, lat, 1024, 512);
        assert_relative_eq!(p.x, 512.0);
        assert_relative_eq!(p.y, 256.0);
    }

    #[test]
    fn latitude_is_positive_upward() {
        let (_, lat) = ray_to_lonlat(&Vector3::new(0.0, -1.0, 0.0));
        assert_relative_eq!(lat, FRAC_PI_2, epsilon = 1e-6);
        // north pole clamps to the first row, south pole to the last
        assert_relative_eq!(lonlat_to_equirect(0.0, FRAC_PI_2, 64, 32).y, 0.0);
        assert_relative_eq!(lonlat_to_equirect(0.0, -FRAC_PI_2, 64, 32).y, 31.0);
    }

    #[test]
    fn longitude_wraps_around() {
        assert_relative_eq!(lonlat_to_equirect(PI, 0.0, 64, 32).x, 0.0);
        assert_relative_eq!(lonlat_to_equirect(-PI, 0.0, 64, 32).x, 0.0);
        let left = lonlat_to_equirect(PI - 0.01, 0.0, 64, 32).x;
        assert!(left > 63.0 && left < 64.0, "left = {left}");
        let right = lonlat_to_equirect(-PI + 0.01, 0.0, 64, 32).x;
        assert!((0.0..1.0).contains(&right), "right = {right}");
    }

    #[test]
    fn table_matches_direct_projection() {
        let k = view(40, 30, 100.0);
        let o = Orientation::from_euler(0.2, -0.7, 0.1).expect("orientation");
        let map = EquirectMap::build(&k, &o, 200, 100).expect("map");
        assert_eq!((map.width(), map.height()), (40, 30));
        assert_eq!(map.coords().len(), 1200);

        for (u, v) in [(0, 0), (39, 0), (17, 11), (39, 29)] {
            let direct = project_pixel(&k, &o, 200, 100, u as Real, v as Real);
            let cached = map.source_coord(u, v).expect("inside");
            assert_relative_eq!(cached.x, direct.x as f32);
            assert_relative_eq!(cached.y, direct.y as f32);
        }
        assert!(map.source_coord(40, 0).is_none());
    }

    #[test]
    fn right_half_of_view_maps_east() {
        let k = view(64, 48, 90.0);
        let map = EquirectMap::build(&k, &Orientation::identity(), 360, 180).expect("map");
        let centre = map.source_coord(32, 24).expect("centre");
        let east = map.source_coord(63, 24).expect("east");
        let below = map.source_coord(32, 47).expect("below");
        assert!(east.x > centre.x);
        assert!(below.y > centre.y);
        // right edge of a 90° view is ~45° east: 180 + 45 columns
        assert_relative_eq!(east.x, 224.3, epsilon = 0.5);
    }

    #[test]
    fn from_coords_checks_length() {
        assert!(EquirectMap::from_coords(2, 2, 4, 4, vec![Point2::origin(); 3]).is_err());
        assert!(EquirectMap::from_coords(2, 2, 0, 4, vec![Point2::origin(); 4]).is_err());
        let map = EquirectMap::from_coords(2, 1, 4, 4, vec![Point2::new(1.5, 2.0); 2]).expect("ok");
        assert_eq!(map.source_coord(1, 0), Some(Point2::new(1.5, 2.0)));
    }

    #[test]
    fn rejects_empty_panorama() {
        let k = view(8, 8, 60.0);
        assert!(EquirectMap::build(&k, &Orientation::identity(), 0, 10).is_err());
        assert!(EquirectMap::build(&k, &Orientation::identity(), 10, 0).is_err());
    }

    #[test]
    fn rebuild_reuses_and_refreshes() {
        let k = view(16, 8, 60.0);
        let mut map = EquirectMap::build(&k, &Orientation::identity(), 64, 32).expect("map");
        let before = map.clone();
        let panned = Orientation::from_pan_tilt(45.0, 0.0, 0.0).expect("pan");
        map.rebuild(&k, &panned, 64, 32).expect("rebuild");
        assert_ne!(before, map);
        assert!(map.fits(16, 8, 64, 32));
        assert!(!map.fits(16, 8, 64, 33));
    }
}
