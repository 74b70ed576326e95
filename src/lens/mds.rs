//! Classical (Torgerson) multidimensional scaling.
//!
//! Embeds points so that Euclidean distances in the embedding approximate
//! the pairwise distances under the chosen metric:
//!
//! ```text
//! B = -½ J D⁽²⁾ J,   J = I - (1/n) 11ᵀ
//! X = V_k Λ_k^{½}
//! ```
//!
//! Negative eigenvalues (non-Euclidean metrics) are clamped to zero.

use super::pca::symmetric_top_k;
use super::traits::{lens_input, Lens};
use crate::error::{Error, Result};
use crate::metric::Metric;
use ndarray::{Array2, ArrayView2, Axis};

/// `B = -½ J D⁽²⁾ J` for a square distance matrix `D`.
fn double_centred_gram(dist: &Array2<f64>) -> Result<Array2<f64>> {
    let n = dist.nrows();
    let sq = dist.mapv(|d| d * d);
    let row_mean = sq.mean_axis(Axis(1)).ok_or(Error::EmptyInput)?;
    let col_mean = sq.mean_axis(Axis(0)).ok_or(Error::EmptyInput)?;
    let grand = row_mean.mean().ok_or(Error::EmptyInput)?;

    Ok(Array2::from_shape_fn((n, n), |(i, j)| {
        -0.5 * (sq[[i, j]] - row_mean[i] - col_mean[j] + grand)
    }))
}

/// Classical MDS lens.
#[derive(Debug, Clone)]
pub struct Mds {
    n_components: usize,
    metric: Metric,
}

impl Mds {
    /// Embed into `n_components` dimensions using Euclidean distances.
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
            metric: Metric::Euclidean,
        }
    }

    /// Set the distance metric. Use [`Metric::Precomputed`] to embed a
    /// distance matrix directly.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }
}

impl Default for Mds {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Lens for Mds {
    fn name(&self) -> &str {
        "MDS"
    }

    fn metric(&self) -> Option<Metric> {
        Some(self.metric)
    }

    fn fit_transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let dist = lens_input(Some(self.metric), data)?;
        let n = dist.nrows();
        if self.n_components == 0 {
            return Err(Error::InvalidParameter {
                name: "n_components",
                message: "must be at least 1",
            });
        }
        if self.n_components > n {
            return Err(Error::DimensionMismatch {
                expected: n,
                found: self.n_components,
            });
        }

        let gram = double_centred_gram(&dist)?;
        let (values, vectors) = symmetric_top_k(gram.view(), self.n_components);
        let mut coords = vectors;
        for (c, lambda) in values.iter().enumerate() {
            let scale = lambda.max(0.0).sqrt();
            coords.column_mut(c).mapv_inplace(|v| v * scale);
        }
        Ok(coords)
    }
}
