//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! DBSCAN groups points based on neighborhood density. Unlike k-means, it:
//!
//! - Discovers clusters of arbitrary shape
//! - Automatically determines the number of clusters
//! - Identifies noise points (outliers)
//!
//! That last property is what Mapper relies on: noise points inside a
//! hypercube simply do not become part of any node.
//!
//! ## Core Concepts
//!
//! - **Epsilon (ε)**: Maximum distance between two points to be neighbors.
//! - **MinSamples**: Minimum neighbors within ε (the point included) for a
//!   point to be "core".
//! - **Core point**: Has at least MinSamples neighbors within ε.
//! - **Border point**: Within ε of a core point but not core itself.
//! - **Noise point**: Neither core nor border.
//!
//! With `min_samples = 1` every point is core and the clusters are the
//! connected components of the ε-neighborhood graph (single linkage cut at ε).
//!
//! ## Precomputed distances
//!
//! With [`Metric::Precomputed`] the input to `fit` is a square distance
//! matrix. The mapping stage hands over the principal submatrix of the
//! hypercube's points.
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.

use super::traits::{ClusterParams, Clusterer};
use crate::error::{Error, Result};
use crate::metric::Metric;
use ndarray::{Array2, ArrayView2};

/// DBSCAN clustering algorithm.
#[derive(Debug, Clone)]
pub struct Dbscan {
    /// Maximum distance for neighborhood.
    eps: f64,
    /// Minimum points (self included) for core point classification.
    min_samples: usize,
    /// Distance metric.
    metric: Metric,
}

impl Dbscan {
    /// Create a new DBSCAN clusterer.
    ///
    /// # Arguments
    ///
    /// * `eps` - Maximum distance between two points to be neighbors.
    /// * `min_samples` - Minimum number of points to form a dense region.
    pub fn new(eps: f64, min_samples: usize) -> Self {
        Self {
            eps,
            min_samples,
            metric: Metric::Euclidean,
        }
    }

    /// Set epsilon (neighborhood radius).
    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// Set minimum points for core classification.
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// All neighbors of `point_idx` within epsilon, excluding itself.
    fn region_query(&self, dist: &Array2<f64>, point_idx: usize) -> Vec<usize> {
        dist.row(point_idx)
            .iter()
            .enumerate()
            .filter(|&(idx, &d)| idx != point_idx && d <= self.eps)
            .map(|(idx, _)| idx)
            .collect()
    }

    fn is_core(&self, neighbors: &[usize]) -> bool {
        // MinSamples includes the point itself.
        neighbors.len() + 1 >= self.min_samples
    }

    /// Expand cluster from a core point.
    fn expand_cluster(
        &self,
        dist: &Array2<f64>,
        point_idx: usize,
        neighbors: Vec<usize>,
        labels: &mut [Option<usize>],
        visited: &mut [bool],
        cluster_id: usize,
    ) {
        labels[point_idx] = Some(cluster_id);

        // Use a queue for iterative expansion (avoid deep recursion)
        let mut to_process = neighbors;

        while let Some(neighbor_idx) = to_process.pop() {
            // Noise reached from a core point becomes a border point.
            if labels[neighbor_idx].is_none() {
                labels[neighbor_idx] = Some(cluster_id);
            }
            if visited[neighbor_idx] {
                continue;
            }
            visited[neighbor_idx] = true;

            let neighbor_neighbors = self.region_query(dist, neighbor_idx);
            if self.is_core(&neighbor_neighbors) {
                to_process.extend(neighbor_neighbors.into_iter().filter(|&nn| !visited[nn]));
            }
        }
    }
}

impl Default for Dbscan {
    fn default() -> Self {
        Self::new(0.5, 1)
    }
}

impl Clusterer for Dbscan {
    fn metric(&self) -> Metric {
        self.metric
    }

    fn min_samples(&self) -> Option<usize> {
        Some(self.min_samples)
    }

    fn params(&self) -> ClusterParams {
        ClusterParams::new()
            .with("algorithm", "dbscan")
            .with("eps", self.eps)
            .with("min_samples", self.min_samples)
            .with("metric", self.metric)
    }

    fn fit(&self, data: ArrayView2<'_, f64>) -> Result<Vec<Option<usize>>> {
        let n = data.nrows();
        if n == 0 {
            return Err(Error::EmptyInput);
        }

        if self.eps.is_nan() || self.eps <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "eps",
                message: "must be positive",
            });
        }

        if self.min_samples == 0 {
            return Err(Error::InvalidParameter {
                name: "min_samples",
                message: "must be at least 1",
            });
        }

        let dist = self.metric.pairwise(data)?;

        // Initialize: all points as noise
        let mut labels = vec![None; n];
        let mut visited = vec![false; n];
        let mut cluster_id = 0;

        for point_idx in 0..n {
            if visited[point_idx] {
                continue;
            }
            visited[point_idx] = true;

            let neighbors = self.region_query(&dist, point_idx);
            if !self.is_core(&neighbors) {
                // Not enough neighbors: noise, unless a later core point
                // claims it as a border point.
                continue;
            }

            self.expand_cluster(
                &dist,
                point_idx,
                neighbors,
                &mut labels,
                &mut visited,
                cluster_id,
            );
            cluster_id += 1;
        }

        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_dbscan_two_clusters() {
        // Two well-separated clusters
        let data = array![
            // Cluster 1: around (0, 0)
            [0.0, 0.0],
            [0.1, 0.0],
            [0.0, 0.1],
            [0.1, 0.1],
            [0.05, 0.05],
            // Cluster 2: around (5, 5)
            [5.0, 5.0],
            [5.1, 5.0],
            [5.0, 5.1],
            [5.1, 5.1],
            [5.05, 5.05],
        ];

        let labels = Dbscan::new(0.3, 3).fit(data.view()).unwrap();
        assert_eq!(labels.len(), 10);

        let cluster1 = labels[0];
        assert!(cluster1.is_some());
        for label in &labels[1..5] {
            assert_eq!(*label, cluster1);
        }

        let cluster2 = labels[5];
        for label in &labels[6..10] {
            assert_eq!(*label, cluster2);
        }

        assert_ne!(cluster1, cluster2);
    }

    #[test]
    fn test_dbscan_with_noise() {
        let data = array![
            [0.0, 0.0],
            [0.1, 0.0],
            [0.0, 0.1],
            [0.1, 0.1],
            // Outlier
            [100.0, 100.0],
            [5.0, 5.0],
            [5.1, 5.0],
            [5.0, 5.1],
            [5.1, 5.1],
        ];

        let labels = Dbscan::new(0.3, 3).fit(data.view()).unwrap();
        assert_eq!(labels.len(), 9);
        assert!(labels[4].is_none());
        for (i, label) in labels.iter().enumerate() {
            if i != 4 {
                assert!(label.is_some());
            }
        }
    }

    #[test]
    fn test_dbscan_border_point_visited_first() {
        // Point 0 is a border point: too sparse to be core, but within eps of
        // the core point 1. It is visited (as noise) before 1 is expanded.
        let data = array![[0.0], [0.4], [0.5], [0.6]];
        let labels = Dbscan::new(0.45, 3).fit(data.view()).unwrap();
        assert!(labels.iter().all(Option::is_some), "{labels:?}");
        assert!(labels.iter().all(|l| *l == labels[0]));
    }

    #[test]
    fn test_dbscan_all_noise() {
        let data = array![[0.0, 0.0], [10.0, 0.0], [0.0, 10.0], [10.0, 10.0]];
        let labels = Dbscan::new(0.5, 3).fit(data.view()).unwrap();
        assert!(labels.iter().all(Option::is_none));
    }

    #[test]
    fn test_dbscan_min_samples_one_is_connected_components() {
        let data = array![[0.0], [0.3], [0.6], [5.0], [5.3]];
        let labels = Dbscan::default().fit(data.view()).unwrap();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn test_dbscan_precomputed() {
        let dist = array![
            [0.0, 0.1, 9.0, 9.0],
            [0.1, 0.0, 9.0, 9.0],
            [9.0, 9.0, 0.0, 0.2],
            [9.0, 9.0, 0.2, 0.0],
        ];
        let dbscan = Dbscan::new(0.5, 2).with_metric(Metric::Precomputed);
        let labels = dbscan.fit(dist.view()).unwrap();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);

        let not_square = array![[0.0, 1.0, 2.0]];
        assert_eq!(
            dbscan.fit(not_square.view()),
            Err(Error::NotSquare { rows: 1, cols: 3 })
        );
    }

    #[test]
    fn test_dbscan_invalid_params() {
        let data = array![[0.0, 0.0]];
        assert!(Dbscan::new(0.0, 3).fit(data.view()).is_err());
        assert!(Dbscan::new(-1.0, 3).fit(data.view()).is_err());
        assert!(Dbscan::new(0.5, 0).fit(data.view()).is_err());
    }

    #[test]
    fn test_dbscan_chain() {
        let data = ndarray::Array2::from_shape_fn((10, 2), |(i, j)| {
            if j == 0 {
                i as f64 * 0.3
            } else {
                0.0
            }
        });
        let labels = Dbscan::new(0.5, 2).fit(data.view()).unwrap();
        assert!(labels.iter().all(|l| *l == labels[0] && l.is_some()));
    }

    #[test]
    fn test_dbscan_params() {
        let params = Dbscan::default().params();
        assert_eq!(params.get("min_samples").map(ToString::to_string), Some("1".into()));
        assert_eq!(params.get("metric").map(ToString::to_string), Some("euclidean".into()));
    }
}
