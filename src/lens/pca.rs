//! Principal component analysis lens.
//!
//! Centres the data, forms the `d x d` covariance matrix and projects onto
//! its top `k` eigenvectors.
//!
//! # Eigensolver
//!
//! Eigenpairs come from faer's self-adjoint eigendecomposition. The matrix is
//! copied into a `faer::Mat` at the lens boundary and the selected
//! eigenvectors are copied back into ndarray.
//!
//! Each eigenvector is sign-normalised so its largest-magnitude entry is
//! positive, making projections deterministic.

use super::traits::{lens_input, Lens};
use crate::error::{Error, Result};
use crate::metric::Metric;
use faer::{Mat, Side};
use ndarray::{Array2, ArrayView2, Axis};

/// Top-`k` eigenpairs of a symmetric matrix, largest (signed) eigenvalue
/// first.
///
/// Returns `(eigenvalues, eigenvectors)` with eigenvectors as columns.
pub(crate) fn symmetric_top_k(a: ArrayView2<'_, f64>, k: usize) -> (Vec<f64>, Array2<f64>) {
    let d = a.nrows();
    let mat = Mat::<f64>::from_fn(d, d, |i, j| a[[i, j]]);
    let evd = mat.selfadjoint_eigendecomposition(Side::Lower);
    let s = evd.s().column_vector();
    let u = evd.u();

    let mut order: Vec<usize> = (0..d).collect();
    order.sort_by(|&x, &y| s.read(y).total_cmp(&s.read(x)));

    let k = k.min(d);
    let mut values = Vec::with_capacity(k);
    let mut vectors = Array2::<f64>::zeros((d, k));
    for (c, &idx) in order.iter().take(k).enumerate() {
        let pivot = (0..d)
            .map(|i| u.read(i, idx))
            .fold(0.0_f64, |p, x| if x.abs() > p.abs() { x } else { p });
        let sign = if pivot < 0.0 { -1.0 } else { 1.0 };
        for i in 0..d {
            vectors[[i, c]] = sign * u.read(i, idx);
        }
        values.push(s.read(idx));
    }

    (values, vectors)
}

/// Projection onto the leading principal components.
#[derive(Debug, Clone)]
pub struct Pca {
    n_components: usize,
    metric: Option<Metric>,
}

impl Pca {
    /// Keep `n_components` components.
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
            metric: None,
        }
    }

    /// Run PCA on the pairwise distance matrix under `metric` instead of on
    /// the raw coordinates.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = Some(metric);
        self
    }
}

impl Default for Pca {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Lens for Pca {
    fn name(&self) -> &str {
        "PCA"
    }

    fn metric(&self) -> Option<Metric> {
        self.metric
    }

    fn fit_transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let x = lens_input(self.metric, data)?;
        let (n, d) = x.dim();
        if self.n_components == 0 {
            return Err(Error::InvalidParameter {
                name: "n_components",
                message: "must be at least 1",
            });
        }
        if self.n_components > d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: self.n_components,
            });
        }

        let mean = x.mean_axis(Axis(0)).ok_or(Error::EmptyInput)?;
        let centred = &x - &mean;
        let denom = n.saturating_sub(1).max(1) as f64;
        let cov = centred.t().dot(&centred) / denom;

        let (_, components) = symmetric_top_k(cov.view(), self.n_components);
        Ok(centred.dot(&components))
    }
}
