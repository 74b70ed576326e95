//! Covers of the projected space.
//!
//! A cover splits lens space into (possibly overlapping) regions. Mapper only
//! ever sees a region through the point indices that fall inside it, so a
//! [`Hypercube`] here is just an index set plus, for grid covers, its bin
//! coordinates.
//!
//! # Uniform cover
//!
//! [`UniformCover`] min-max scales every lens column to `[0, 1]`, cuts each
//! axis into `resolution` intervals of width `w = 1 / resolution`, and widens
//! every interval by `overlap * w` on both sides:
//!
//! ```text
//! bin b on one axis:  [b·w - overlap·w,  (b+1)·w + overlap·w]
//! ```
//!
//! A hypercube is the product of one interval per axis. Bounds are inclusive,
//! so with zero overlap a point exactly on a boundary belongs to both
//! neighbouring cubes.

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView2, Axis};
use std::collections::BTreeMap;

/// One region of a cover: the sorted indices of the points inside it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hypercube {
    bin: Vec<usize>,
    members: Vec<usize>,
}

impl Hypercube {
    /// Build from point indices. Duplicates are dropped and the indices
    /// sorted.
    pub fn new(members: impl IntoIterator<Item = usize>) -> Self {
        let mut members: Vec<usize> = members.into_iter().collect();
        members.sort_unstable();
        members.dedup();
        Self {
            bin: Vec::new(),
            members,
        }
    }

    /// Attach grid coordinates.
    pub fn with_bin(mut self, bin: Vec<usize>) -> Self {
        self.bin = bin;
        self
    }

    /// Grid coordinates (empty for covers without a grid).
    pub fn bin(&self) -> &[usize] {
        &self.bin
    }

    /// Point indices inside this cube, ascending.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Number of points inside.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether no point falls inside.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A cover of the projected point cloud.
pub trait Cover {
    /// Number of points covered. Must equal the raw data's row count.
    fn point_count(&self) -> usize;

    /// The projected matrix node positions are averaged over. Covers that
    /// rescale the projection (like [`UniformCover`]) return the rescaled
    /// matrix, so node positions live in the rescaled space.
    fn data(&self) -> ArrayView2<'_, f64>;

    /// Intervals per axis, echoed into the graph parameters.
    fn resolution(&self) -> usize;

    /// Overlap fraction, echoed into the graph parameters.
    fn overlap(&self) -> f64;

    /// The regions of the cover, in a fixed order.
    fn hypercubes(&self) -> Vec<Hypercube>;
}

/// Regular grid cover with fractional overlap.
#[derive(Debug, Clone)]
pub struct UniformCover {
    data: Array2<f64>,
    resolution: usize,
    overlap: f64,
}

impl UniformCover {
    /// Cover `projected` with `resolution` intervals per axis.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] for a matrix without rows or columns.
    /// - [`Error::InvalidInput`] for non-finite projections.
    /// - [`Error::InvalidParameter`] for `resolution == 0`, a negative or NaN
    ///   overlap, or a grid with more than `usize::MAX` cubes.
    pub fn new(projected: ArrayView2<'_, f64>, resolution: usize, overlap: f64) -> Result<Self> {
        let (n, dims) = projected.dim();
        if n == 0 || dims == 0 {
            return Err(Error::EmptyInput);
        }
        if resolution == 0 {
            return Err(Error::InvalidParameter {
                name: "resolution",
                message: "must be at least 1",
            });
        }
        if overlap.is_nan() || overlap < 0.0 {
            return Err(Error::InvalidParameter {
                name: "overlap",
                message: "must be non-negative",
            });
        }
        let exponent = u32::try_from(dims).map_err(|_| Error::InvalidParameter {
            name: "resolution",
            message: "too many lens dimensions for a grid cover",
        })?;
        if resolution.checked_pow(exponent).is_none() {
            return Err(Error::InvalidParameter {
                name: "resolution",
                message: "resolution^dims overflows",
            });
        }
        if projected.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidInput("non-finite projected value".into()));
        }

        let mut data = projected.to_owned();
        for mut col in data.axis_iter_mut(Axis(1)) {
            let min = col.fold(f64::INFINITY, |m, &v| m.min(v));
            let max = col.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
            let range = max - min;
            if range > 0.0 {
                col.mapv_inplace(|v| (v - min) / range);
            } else {
                col.fill(0.0);
            }
        }

        Ok(Self {
            data,
            resolution,
            overlap,
        })
    }

    /// Width of one interval before widening.
    pub fn chunk_width(&self) -> f64 {
        1.0 / self.resolution as f64
    }

    /// Amount each interval is widened by on both sides.
    pub fn overlap_width(&self) -> f64 {
        self.chunk_width() * self.overlap
    }

    /// Bins on one axis whose widened interval contains `x`.
    fn bins_containing(&self, x: f64) -> Vec<usize> {
        let w = self.chunk_width();
        let ow = self.overlap_width();
        let last = self.resolution - 1;
        let lo = (((x - ow) / w).floor() - 1.0).max(0.0) as usize;
        let hi = ((((x + ow) / w).floor() + 1.0).max(0.0) as usize).min(last);
        (lo.min(last)..=hi)
            .filter(|&b| {
                let lower = b as f64 * w - ow;
                let upper = (b + 1) as f64 * w + ow;
                lower <= x && x <= upper
            })
            .collect()
    }
}

impl Cover for UniformCover {
    fn point_count(&self) -> usize {
        self.data.nrows()
    }

    /// The projection min-max scaled to `[0, 1]` per column.
    fn data(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    fn resolution(&self) -> usize {
        self.resolution
    }

    fn overlap(&self) -> f64 {
        self.overlap
    }

    /// Non-empty cubes in lexicographic bin order.
    fn hypercubes(&self) -> Vec<Hypercube> {
        let mut cubes: BTreeMap<Vec<usize>, Vec<usize>> = BTreeMap::new();

        for (i, point) in self.data.axis_iter(Axis(0)).enumerate() {
            let ranges: Vec<Vec<usize>> = point.iter().map(|&x| self.bins_containing(x)).collect();
            if ranges.iter().any(Vec::is_empty) {
                continue;
            }

            // Odometer over the per-axis bin ranges.
            let mut cursor = vec![0usize; ranges.len()];
            'odometer: loop {
                let bin: Vec<usize> = cursor
                    .iter()
                    .zip(&ranges)
                    .map(|(&c, range)| range[c])
                    .collect();
                cubes.entry(bin).or_default().push(i);

                for axis in (0..ranges.len()).rev() {
                    cursor[axis] += 1;
                    if cursor[axis] < ranges[axis].len() {
                        continue 'odometer;
                    }
                    cursor[axis] = 0;
                }
                break;
            }
        }

        cubes
            .into_iter()
            .map(|(bin, members)| Hypercube::new(members).with_bin(bin))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn line(n: usize) -> Array2<f64> {
        Array2::from_shape_fn((n, 1), |(i, _)| i as f64)
    }

    #[test]
    fn test_hypercube_new_sorts_and_dedups() {
        let cube = Hypercube::new([3, 1, 3, 2]);
        assert_eq!(cube.members(), &[1, 2, 3]);
        assert_eq!(cube.len(), 3);
    }

    #[test]
    fn test_uniform_cover_normalises() {
        let cover = UniformCover::new(array![[10.0, 5.0], [20.0, 5.0]].view(), 2, 0.0).unwrap();
        assert_eq!(cover.data(), array![[0.0, 0.0], [1.0, 0.0]]);
        assert_eq!(cover.point_count(), 2);
    }

    #[test]
    fn test_uniform_cover_no_overlap_shares_boundary() {
        let cover = UniformCover::new(line(11).view(), 2, 0.0).unwrap();
        let cubes = cover.hypercubes();
        assert_eq!(cubes.len(), 2);
        assert_eq!(cubes[0].members(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(cubes[1].members(), &[5, 6, 7, 8, 9, 10]);
        assert_eq!(cubes[0].bin(), &[0]);
        assert_eq!(cubes[1].bin(), &[1]);
    }

    #[test]
    fn test_uniform_cover_overlap_widens() {
        let cover = UniformCover::new(line(11).view(), 2, 0.25).unwrap();
        let cubes = cover.hypercubes();
        assert_eq!(cubes[0].members(), &[0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(cubes[1].members(), &[4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_uniform_cover_every_point_covered() {
        let data = Array2::from_shape_fn((30, 2), |(i, j)| ((i * 7 + j * 13) % 17) as f64);
        let cover = UniformCover::new(data.view(), 4, 0.1).unwrap();
        let cubes = cover.hypercubes();

        let mut seen = vec![false; 30];
        for cube in &cubes {
            assert!(!cube.is_empty());
            assert_eq!(cube.bin().len(), 2);
            for &i in cube.members() {
                seen[i] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));

        // Lexicographic bin order.
        for pair in cubes.windows(2) {
            assert!(pair[0].bin() < pair[1].bin());
        }
    }

    #[test]
    fn test_uniform_cover_invalid_params() {
        let data = line(4);
        assert!(UniformCover::new(data.view(), 0, 0.1).is_err());
        assert!(UniformCover::new(data.view(), 2, -0.1).is_err());
        assert!(UniformCover::new(data.view(), 2, f64::NAN).is_err());

        let wide = Array2::<f64>::zeros((2, 80));
        assert!(UniformCover::new(wide.view(), 10, 0.1).is_err());
    }
}
