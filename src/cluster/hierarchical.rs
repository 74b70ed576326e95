//! Hierarchical (agglomerative) clustering.
//!
//! Bottom-up clustering that builds a **dendrogram** by iteratively
//! merging the closest clusters, then cuts it either at a fixed height or at
//! a fixed number of clusters.
//!
//! # Linkage Methods
//!
//! | Linkage | Formula | Effect |
//! |---------|---------|--------|
//! | Single | min(d(a,b)) for a∈A, b∈B | Chaining; elongated clusters |
//! | Complete | max(d(a,b)) | Compact, spherical clusters |
//! | Average | mean(d(a,b)) | Balanced compromise |
//! | Ward | Δ variance | Minimizes within-cluster variance |
//!
//! A distance cut suits Mapper better than a cluster count: hypercubes of
//! different sizes and densities should be free to split into different
//! numbers of nodes.

use super::traits::{ClusterParams, Clusterer};
use crate::error::{Error, Result};
use crate::metric::Metric;
use kodama::{linkage as kodama_linkage, Method as KodamaMethod};
use ndarray::ArrayView2;
use petgraph::unionfind::UnionFind;

/// Linkage method for hierarchical clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    /// Single linkage: minimum distance between clusters.
    Single,
    /// Complete linkage: maximum distance between clusters.
    Complete,
    /// Average linkage: mean distance between clusters.
    Average,
    /// Ward's method: minimize within-cluster variance.
    Ward,
}

impl Linkage {
    fn name(&self) -> &'static str {
        match self {
            Linkage::Single => "single",
            Linkage::Complete => "complete",
            Linkage::Average => "average",
            Linkage::Ward => "ward",
        }
    }
}

/// Where to cut the dendrogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cut {
    /// Stop merging once this many clusters remain.
    Clusters(usize),
    /// Apply only merges at or below this dissimilarity.
    Distance(f64),
}

/// Agglomerative clustering with a dendrogram cut.
#[derive(Debug, Clone)]
pub struct Agglomerative {
    cut: Cut,
    linkage: Linkage,
    metric: Metric,
}

impl Agglomerative {
    /// Cut at `threshold`, single linkage.
    pub fn with_distance_threshold(threshold: f64) -> Self {
        Self {
            cut: Cut::Distance(threshold),
            linkage: Linkage::Single,
            metric: Metric::Euclidean,
        }
    }

    /// Cut into `n_clusters` clusters (fewer if a hypercube has fewer
    /// points), single linkage.
    pub fn with_n_clusters(n_clusters: usize) -> Self {
        Self {
            cut: Cut::Clusters(n_clusters),
            linkage: Linkage::Single,
            metric: Metric::Euclidean,
        }
    }

    /// Set linkage method.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }
}

impl Clusterer for Agglomerative {
    fn metric(&self) -> Metric {
        self.metric
    }

    fn params(&self) -> ClusterParams {
        let params = ClusterParams::new()
            .with("algorithm", "agglomerative")
            .with("linkage", self.linkage.name())
            .with("metric", self.metric);
        match self.cut {
            Cut::Clusters(k) => params.with("n_clusters", k),
            Cut::Distance(t) => params.with("distance_threshold", t),
        }
    }

    fn fit(&self, data: ArrayView2<'_, f64>) -> Result<Vec<Option<usize>>> {
        let n = data.nrows();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        match self.cut {
            Cut::Clusters(0) => {
                return Err(Error::InvalidParameter {
                    name: "n_clusters",
                    message: "must be at least 1",
                })
            }
            Cut::Distance(t) if t.is_nan() || t < 0.0 => {
                return Err(Error::InvalidParameter {
                    name: "distance_threshold",
                    message: "must be non-negative",
                })
            }
            _ => {}
        }

        let dist = self.metric.pairwise(data)?;
        if n == 1 {
            return Ok(vec![Some(0)]);
        }

        // Condensed dissimilarity matrix (upper triangle, row-major).
        let mut condensed = Vec::with_capacity((n * (n - 1)) / 2);
        for row in 0..(n - 1) {
            for col in (row + 1)..n {
                condensed.push(dist[[row, col]]);
            }
        }

        let method = match self.linkage {
            Linkage::Single => KodamaMethod::Single,
            Linkage::Complete => KodamaMethod::Complete,
            Linkage::Average => KodamaMethod::Average,
            Linkage::Ward => KodamaMethod::Ward,
        };

        // kodama labels leaves 0..n-1; merge i creates cluster n+i.
        let dend = kodama_linkage(&mut condensed, n, method);

        let mut merged_into = UnionFind::<usize>::new(2 * n - 1);
        for (i, step) in dend.steps().iter().enumerate() {
            let keep = match self.cut {
                Cut::Clusters(k) => i < n.saturating_sub(k),
                Cut::Distance(t) => step.dissimilarity <= t,
            };
            if !keep {
                break;
            }
            let merged = n + i;
            let _ = merged_into.union(step.cluster1, merged);
            let _ = merged_into.union(step.cluster2, merged);
        }

        // Compact root ids into labels in order of first appearance.
        let mut roots: Vec<usize> = Vec::new();
        let mut labels = Vec::with_capacity(n);
        for leaf in 0..n {
            let root = merged_into.find(leaf);
            let label = match roots.iter().position(|&r| r == root) {
                Some(pos) => pos,
                None => {
                    roots.push(root);
                    roots.len() - 1
                }
            };
            labels.push(Some(label));
        }

        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_agglomerative_n_clusters() {
        let data = array![[0.0, 0.0], [0.1, 0.1], [10.0, 10.0], [10.1, 10.1]];

        let labels = Agglomerative::with_n_clusters(2)
            .with_linkage(Linkage::Average)
            .fit(data.view())
            .unwrap();

        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn test_agglomerative_distance_threshold() {
        let data = array![[0.0], [1.0], [2.0], [10.0], [11.0]];
        let labels = Agglomerative::with_distance_threshold(1.5)
            .fit(data.view())
            .unwrap();
        assert_eq!(labels, vec![Some(0), Some(0), Some(0), Some(1), Some(1)]);

        let singletons = Agglomerative::with_distance_threshold(0.5)
            .fit(data.view())
            .unwrap();
        assert_eq!(
            singletons,
            vec![Some(0), Some(1), Some(2), Some(3), Some(4)]
        );
    }

    #[test]
    fn test_agglomerative_cut_keeps_nested_merges() {
        // Merges chain 0-1, then {0,1}-2, then 3-4; the last step joins the
        // two groups and is cut off.
        let data = array![[0.0], [0.5], [1.5], [10.0], [10.4]];
        let labels = Agglomerative::with_n_clusters(2)
            .fit(data.view())
            .unwrap();
        assert_eq!(labels, vec![Some(0), Some(0), Some(0), Some(1), Some(1)]);

        let complete = Agglomerative::with_distance_threshold(1.2)
            .with_linkage(Linkage::Complete)
            .fit(data.view())
            .unwrap();
        assert_eq!(complete, vec![Some(0), Some(0), Some(1), Some(2), Some(2)]);
    }

    #[test]
    fn test_agglomerative_single_point() {
        let labels = Agglomerative::with_n_clusters(3)
            .fit(array![[1.0, 2.0]].view())
            .unwrap();
        assert_eq!(labels, vec![Some(0)]);
    }

    #[test]
    fn test_agglomerative_invalid_cut() {
        let data = array![[0.0], [1.0]];
        assert!(Agglomerative::with_n_clusters(0).fit(data.view()).is_err());
        assert!(Agglomerative::with_distance_threshold(-1.0)
            .fit(data.view())
            .is_err());
    }
}
