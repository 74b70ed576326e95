//! Eccentricity lenses: how far each point sits from the rest of the cloud.
//!
//! - [`L1Centrality`]: sum of distances to every other point.
//! - [`LinfCentrality`]: distance to the farthest point.
//!
//! Both produce a single column. Central points get small values, points on
//! the periphery large ones, which makes these a common first lens for
//! flare-shaped data.

use super::traits::{lens_input, Lens};
use crate::error::Result;
use crate::metric::Metric;
use ndarray::{Array2, ArrayView2, Axis};

/// Row sums of the pairwise distance matrix.
#[derive(Debug, Clone, Default)]
pub struct L1Centrality {
    metric: Metric,
}

impl L1Centrality {
    /// Euclidean L1 centrality.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }
}

impl Lens for L1Centrality {
    fn name(&self) -> &str {
        "L1Centrality"
    }

    fn metric(&self) -> Option<Metric> {
        Some(self.metric)
    }

    fn fit_transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let dist = lens_input(Some(self.metric), data)?;
        Ok(dist.sum_axis(Axis(1)).insert_axis(Axis(1)))
    }
}

/// Row maxima of the pairwise distance matrix.
#[derive(Debug, Clone, Default)]
pub struct LinfCentrality {
    metric: Metric,
}

impl LinfCentrality {
    /// Euclidean L-infinity centrality.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }
}

impl Lens for LinfCentrality {
    fn name(&self) -> &str {
        "LinfCentrality"
    }

    fn metric(&self) -> Option<Metric> {
        Some(self.metric)
    }

    fn fit_transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let dist = lens_input(Some(self.metric), data)?;
        Ok(dist
            .map_axis(Axis(1), |row| row.fold(0.0_f64, |m, &d| m.max(d)))
            .insert_axis(Axis(1)))
    }
}
