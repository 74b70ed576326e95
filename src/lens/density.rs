//! Gaussian kernel density lens.

use super::traits::{lens_input, Lens};
use crate::error::{Error, Result};
use crate::metric::Metric;
use ndarray::{Array2, ArrayView2, Axis};

/// Unnormalised kernel density estimate at each point:
///
/// ```text
/// f(x_i) = Σ_j exp(-d(x_i, x_j)² / h)
/// ```
///
/// Dense regions get large values. The self term contributes 1 to every
/// point.
#[derive(Debug, Clone)]
pub struct GaussianDensity {
    bandwidth: f64,
    metric: Metric,
}

impl GaussianDensity {
    /// Create a density lens with bandwidth `h`.
    pub fn new(bandwidth: f64) -> Self {
        Self {
            bandwidth,
            metric: Metric::Euclidean,
        }
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }
}

impl Default for GaussianDensity {
    fn default() -> Self {
        Self::new(0.3)
    }
}

impl Lens for GaussianDensity {
    fn name(&self) -> &str {
        "GaussianDensity"
    }

    fn metric(&self) -> Option<Metric> {
        Some(self.metric)
    }

    fn fit_transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        if self.bandwidth.is_nan() || self.bandwidth <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "bandwidth",
                message: "must be positive",
            });
        }
        let dist = lens_input(Some(self.metric), data)?;
        let h = self.bandwidth;
        Ok(dist
            .mapv(|d| (-(d * d) / h).exp())
            .sum_axis(Axis(1))
            .insert_axis(Axis(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_density_prefers_dense_region() {
        let data = array![[0.0], [0.1], [0.2], [5.0]];
        let out = GaussianDensity::new(0.5).fit_transform(data.view()).unwrap();
        assert_eq!(out.dim(), (4, 1));
        assert!(out[[1, 0]] > out[[3, 0]]);
        // Isolated point only sees itself.
        assert!((out[[3, 0]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_density_invalid_bandwidth() {
        let data = array![[0.0], [1.0]];
        assert!(GaussianDensity::new(0.0).fit_transform(data.view()).is_err());
        assert!(GaussianDensity::new(f64::NAN).fit_transform(data.view()).is_err());
    }
}
