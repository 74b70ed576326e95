//! Distance metrics.
//!
//! Lenses use a metric to turn a point cloud into a pairwise distance matrix
//! before projecting; clusterers use one to define neighbourhoods.
//! [`Metric::Precomputed`] marks data that already *is* a distance matrix,
//! which changes how the mapping stage selects per-hypercube subsets.

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1, ArrayView2};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A named distance function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Metric {
    /// L2 distance.
    #[default]
    Euclidean,
    /// L1 distance.
    Manhattan,
    /// L-infinity distance.
    Chebyshev,
    /// `1 - cos(a, b)`.
    Cosine,
    /// The data is already a square distance matrix.
    Precomputed,
}

impl Metric {
    /// Name used in logs and parameter records.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::Manhattan => "manhattan",
            Metric::Chebyshev => "chebyshev",
            Metric::Cosine => "cosine",
            Metric::Precomputed => "precomputed",
        }
    }

    /// Whether the data handed over is itself a distance matrix.
    pub fn is_precomputed(&self) -> bool {
        matches!(self, Metric::Precomputed)
    }

    /// Distance between two coordinate vectors.
    ///
    /// For [`Metric::Precomputed`] there is nothing to compute; this falls
    /// back to Euclidean so callers holding rows of a distance matrix still
    /// get a sensible value.
    pub fn distance(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
        match self {
            Metric::Euclidean | Metric::Precomputed => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y).powi(2))
                .sum::<f64>()
                .sqrt(),
            Metric::Manhattan => a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum(),
            Metric::Chebyshev => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y).abs())
                .fold(0.0, f64::max),
            Metric::Cosine => {
                let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
                let na = a.dot(&a).sqrt();
                let nb = b.dot(&b).sqrt();
                if na == 0.0 || nb == 0.0 {
                    // Zero vectors have no direction.
                    if na == nb {
                        0.0
                    } else {
                        1.0
                    }
                } else {
                    (1.0 - dot / (na * nb)).max(0.0)
                }
            }
        }
    }

    /// Pairwise distance matrix of the rows of `data`.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyInput`] for zero rows, [`Error::NotSquare`] when the
    /// metric is precomputed and `data` is not square.
    pub fn pairwise(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let n = data.nrows();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.is_precomputed() {
            if data.ncols() != n {
                return Err(Error::NotSquare {
                    rows: n,
                    cols: data.ncols(),
                });
            }
            return Ok(data.to_owned());
        }

        let mut dist = Array2::<f64>::zeros((n, n));

        #[cfg(feature = "parallel")]
        {
            let rows: Vec<Vec<f64>> = (0..n)
                .into_par_iter()
                .map(|i| {
                    (0..n)
                        .map(|j| self.distance(data.row(i), data.row(j)))
                        .collect()
                })
                .collect();
            for (i, row) in rows.into_iter().enumerate() {
                for (j, d) in row.into_iter().enumerate() {
                    dist[[i, j]] = d;
                }
            }
        }

        #[cfg(not(feature = "parallel"))]
        for i in 0..n {
            for j in (i + 1)..n {
                let d = self.distance(data.row(i), data.row(j));
                dist[[i, j]] = d;
                dist[[j, i]] = d;
            }
        }

        Ok(dist)
    }
}

impl core::fmt::Display for Metric {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_distances() {
        let a = array![0.0, 0.0];
        let b = array![3.0, 4.0];
        assert!((Metric::Euclidean.distance(a.view(), b.view()) - 5.0).abs() < 1e-12);
        assert!((Metric::Manhattan.distance(a.view(), b.view()) - 7.0).abs() < 1e-12);
        assert!((Metric::Chebyshev.distance(a.view(), b.view()) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine() {
        let a = array![1.0, 0.0];
        let b = array![0.0, 2.0];
        let c = array![3.0, 0.0];
        assert!((Metric::Cosine.distance(a.view(), b.view()) - 1.0).abs() < 1e-12);
        assert!(Metric::Cosine.distance(a.view(), c.view()).abs() < 1e-12);
    }

    #[test]
    fn test_pairwise_symmetric_zero_diagonal() {
        let data = array![[0.0, 0.0], [1.0, 0.0], [0.0, 2.0]];
        let d = Metric::Euclidean.pairwise(data.view()).unwrap();
        assert_eq!(d.dim(), (3, 3));
        for i in 0..3 {
            assert_eq!(d[[i, i]], 0.0);
            for j in 0..3 {
                assert_eq!(d[[i, j]], d[[j, i]]);
            }
        }
        assert!((d[[1, 2]] - 5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_precomputed_passthrough() {
        let d = array![[0.0, 1.0], [1.0, 0.0]];
        assert_eq!(Metric::Precomputed.pairwise(d.view()).unwrap(), d);

        let not_square = array![[0.0, 1.0, 2.0], [1.0, 0.0, 3.0]];
        assert_eq!(
            Metric::Precomputed.pairwise(not_square.view()),
            Err(Error::NotSquare { rows: 2, cols: 3 })
        );
    }
}
