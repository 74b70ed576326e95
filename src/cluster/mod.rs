//! Clustering inside hypercubes.
//!
//! The mapping stage does not cluster anything itself. It hands the points
//! of each hypercube to a [`Clusterer`] and turns every non-noise label into
//! a node. This module defines that contract and ships a few algorithms that
//! fit it.
//!
//! ## Labels and noise
//!
//! `fit` returns one `Option<usize>` per input row. `None` marks noise: the
//! point stays out of every node built from this hypercube (it may still
//! appear in nodes of overlapping hypercubes).
//!
//! ## Algorithms
//!
//! | Algorithm | Noise | Number of clusters | Precomputed input |
//! |-----------|-------|--------------------|-------------------|
//! | [`Dbscan`] | yes | discovered | yes |
//! | [`Kmeans`] | no | fixed `k` (clamped) | no |
//! | `Agglomerative` (feature `hierarchical`) | no | cut by height or count | yes |
//!
//! DBSCAN with `min_samples = 1` is the classic Mapper default: clusters are
//! the connected components of the ε-neighborhood graph.
//!
//! ## No clustering at all
//!
//! [`ClusterStep::WholeCube`] turns every hypercube into exactly one node.
//! The resulting graph is the nerve of the cover itself.
//!
//! ## Usage
//!
//! ```rust
//! use nerve::cluster::{Clusterer, Dbscan};
//! use ndarray::array;
//!
//! let data = array![[0.0, 0.0], [0.1, 0.1], [10.0, 10.0], [10.1, 10.1], [50.0, 50.0]];
//! let labels = Dbscan::new(0.5, 2).fit(data.view()).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//! assert_eq!(labels[4], None); // noise
//! ```

mod dbscan;
mod kmeans;
mod traits;

#[cfg(feature = "hierarchical")]
mod hierarchical;

pub use dbscan::Dbscan;
pub use kmeans::Kmeans;
pub use traits::{ClusterParams, ClusterStep, Clusterer, ParamValue};

#[cfg(feature = "hierarchical")]
pub use hierarchical::{Agglomerative, Cut, Linkage};
