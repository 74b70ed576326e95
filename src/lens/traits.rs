//! Lens trait.

use crate::error::Result;
use crate::metric::Metric;
use ndarray::{Array2, ArrayView2};

/// A projection of the point cloud into a low-dimensional space.
///
/// Lenses are applied independently to the original points; the projection
/// stage concatenates their outputs column-wise.
pub trait Lens {
    /// Human-readable name, used in progress logs.
    fn name(&self) -> &str;

    /// Metric used to build a distance matrix before projecting, if any.
    fn metric(&self) -> Option<Metric> {
        None
    }

    /// Fit to `data` and return the projection.
    ///
    /// The result must have one row per input row; any column count is
    /// allowed.
    fn fit_transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>>;
}

/// The matrix a metric-aware lens operates on: pairwise distances when a
/// metric is set, the raw coordinates otherwise.
pub(crate) fn lens_input(metric: Option<Metric>, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    match metric {
        Some(metric) => metric.pairwise(data),
        None => Ok(data.to_owned()),
    }
}
