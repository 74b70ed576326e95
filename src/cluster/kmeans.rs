//! K-means clustering.
//!
//! Partitions data into k clusters by minimizing **within-cluster sum of squares**
//! (WCSS):
//!
//! ```text
//! WCSS = Σₖ Σᵢ∈Cₖ ||xᵢ - μₖ||²
//! ```
//!
//! # Lloyd's Algorithm
//!
//! 1. Initialize k centroids (k-means++)
//! 2. **Assign**: Each point → nearest centroid
//! 3. **Update**: Each centroid → mean of assigned points
//! 4. Repeat until convergence
//!
//! # In a Mapper cover
//!
//! Hypercubes vary wildly in size, so `k` is clamped to the number of points
//! handed to `fit`. K-means never reports noise: every point of a hypercube
//! ends up in some node.

use super::traits::{ClusterParams, Clusterer};
use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1, ArrayView2};
use rand::prelude::*;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum iterations.
    max_iter: usize,
    /// Convergence tolerance.
    tol: f64,
    /// Random seed.
    seed: Option<u64>,
}

impl Kmeans {
    /// Create a new K-means clusterer.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            tol: 1e-4,
            seed: None,
        }
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Initialize centroids using k-means++ algorithm.
    fn init_centroids(&self, data: ArrayView2<'_, f64>, k: usize, rng: &mut impl Rng) -> Array2<f64> {
        let n = data.nrows();
        let d = data.ncols();
        let mut centroids = Array2::zeros((k, d));

        // First centroid: random point
        let first = rng.random_range(0..n);
        centroids.row_mut(0).assign(&data.row(first));

        // Remaining centroids: k-means++ selection
        for i in 1..k {
            let distances: Vec<f64> = (0..n)
                .map(|j| {
                    (0..i)
                        .map(|c| Self::squared_distance(data.row(j), centroids.row(c)))
                        .fold(f64::MAX, f64::min)
                })
                .collect();

            // Sample proportional to squared distance
            let total: f64 = distances.iter().sum();
            if total == 0.0 {
                let idx = rng.random_range(0..n);
                centroids.row_mut(i).assign(&data.row(idx));
                continue;
            }

            let threshold = rng.random::<f64>() * total;
            let mut cumsum = 0.0;
            let mut selected = n - 1;

            for (j, &d) in distances.iter().enumerate() {
                cumsum += d;
                if cumsum >= threshold {
                    selected = j;
                    break;
                }
            }

            centroids.row_mut(i).assign(&data.row(selected));
        }

        centroids
    }

    /// Compute squared Euclidean distance.
    fn squared_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
        a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
    }

    fn nearest(point: ArrayView1<'_, f64>, centroids: &Array2<f64>) -> usize {
        let mut best_cluster = 0;
        let mut best_dist = f64::MAX;
        for (k, centroid) in centroids.rows().into_iter().enumerate() {
            let dist = Self::squared_distance(point, centroid);
            if dist < best_dist {
                best_dist = dist;
                best_cluster = k;
            }
        }
        best_cluster
    }
}

impl Clusterer for Kmeans {
    fn params(&self) -> ClusterParams {
        ClusterParams::new()
            .with("algorithm", "kmeans")
            .with("n_clusters", self.k)
            .with("max_iter", self.max_iter)
            .with("tol", self.tol)
            .with("seed", self.seed)
    }

    fn fit(&self, data: ArrayView2<'_, f64>) -> Result<Vec<Option<usize>>> {
        let n = data.nrows();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "n_clusters",
                message: "must be at least 1",
            });
        }
        let k = self.k.min(n);
        let d = data.ncols();

        // Initialize RNG
        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };

        let mut centroids = self.init_centroids(data, k, &mut rng);
        let mut labels = vec![0usize; n];

        for _iter in 0..self.max_iter {
            // Assignment step - parallel when feature enabled
            #[cfg(feature = "parallel")]
            {
                let centroids_ref = &centroids;
                labels.par_iter_mut().enumerate().for_each(|(i, label)| {
                    *label = Self::nearest(data.row(i), centroids_ref);
                });
            }

            #[cfg(not(feature = "parallel"))]
            for (i, label) in labels.iter_mut().enumerate() {
                *label = Self::nearest(data.row(i), &centroids);
            }

            // Update step
            let mut new_centroids = Array2::<f64>::zeros((k, d));
            let mut counts = vec![0usize; k];

            for (i, &c) in labels.iter().enumerate() {
                let mut row = new_centroids.row_mut(c);
                row += &data.row(i);
                counts[c] += 1;
            }

            for (c, &count) in counts.iter().enumerate() {
                if count > 0 {
                    new_centroids
                        .row_mut(c)
                        .mapv_inplace(|v| v / count as f64);
                } else {
                    // Empty cluster: reinitialize randomly
                    let idx = rng.random_range(0..n);
                    new_centroids.row_mut(c).assign(&data.row(idx));
                }
            }

            // Check convergence
            let shift: f64 = centroids
                .iter()
                .zip(new_centroids.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum();

            centroids = new_centroids;

            if shift < self.tol {
                break;
            }
        }

        Ok(labels.into_iter().map(Some).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_kmeans_basic() {
        let data = array![[0.0, 0.0], [0.1, 0.1], [10.0, 10.0], [10.1, 10.1]];

        let labels = Kmeans::new(2).with_seed(42).fit(data.view()).unwrap();

        // Points 0,1 should be in same cluster, points 2,3 in another
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn test_kmeans_never_noise() {
        let data = Array2::from_shape_fn((50, 2), |(i, j)| {
            if j == 0 {
                i as f64 * 0.1
            } else {
                (i % 5) as f64
            }
        });

        let labels = Kmeans::new(5).with_seed(123).fit(data.view()).unwrap();
        assert_eq!(labels.len(), 50);
        for label in labels {
            let label = label.expect("k-means assigns every point");
            assert!(label < 5, "label {} out of range", label);
        }
    }

    #[test]
    fn test_kmeans_k_clamped_to_n() {
        let data = array![[0.0, 0.0], [1.0, 1.0]];
        let labels = Kmeans::new(5).with_seed(7).fit(data.view()).unwrap();
        assert_eq!(labels.len(), 2);
        assert!(labels.iter().all(|l| l.is_some_and(|c| c < 2)));
    }

    #[test]
    fn test_kmeans_deterministic_with_seed() {
        let data = array![[0.0, 0.0], [0.1, 0.1], [10.0, 10.0], [10.1, 10.1]];

        let labels1 = Kmeans::new(2).with_seed(42).fit(data.view()).unwrap();
        let labels2 = Kmeans::new(2).with_seed(42).fit(data.view()).unwrap();

        assert_eq!(labels1, labels2, "same seed should give same result");
    }

    #[test]
    fn test_kmeans_empty_input_error() {
        let data = Array2::<f64>::zeros((0, 2));
        assert!(Kmeans::new(2).fit(data.view()).is_err());
        assert!(Kmeans::new(0).fit(array![[1.0]].view()).is_err());
    }
}
