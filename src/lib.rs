//! # nerve
//!
//! Mapper graphs for topological data analysis.
//!
//! A Mapper graph summarises a point cloud as a small graph: points are
//! projected through one or more lenses, the projected space is covered by
//! overlapping hypercubes, the points of each hypercube are clustered, and
//! every cluster becomes a node. Nodes sharing a point are joined by an edge.
//!
//! ```rust
//! use nerve::cluster::{ClusterStep, Dbscan};
//! use nerve::cover::UniformCover;
//! use nerve::lens::Identity;
//! use nerve::{Mapper, PointCloud};
//!
//! let points = PointCloud::from_rows(&[
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![1.0, 0.0],
//!     vec![1.0, 1.0],
//!     vec![5.0, 5.0],
//!     vec![5.0, 6.0],
//! ])
//! .unwrap();
//!
//! let mapper = Mapper::new();
//! let projected = mapper.filter(&points, &[&Identity::new()]).unwrap();
//! let cover = UniformCover::new(projected.view(), 2, 0.1).unwrap();
//! let dbscan = Dbscan::new(1.5, 1);
//! let graph = mapper
//!     .map(&points, &cover, ClusterStep::fit(&dbscan))
//!     .unwrap()
//!     .expect("at least one node");
//!
//! assert_eq!(graph.n_nodes(), 2);
//! assert!(graph.edges().is_empty());
//! ```
//!
//! **Default build** is sequential and has no clustering beyond DBSCAN and
//! k-means. Per-hypercube parallelism (`parallel`), agglomerative clustering
//! (`hierarchical`) and graph serialisation (`serde`) are opt-in via feature
//! flags.

pub mod cluster;
pub mod cover;
/// Error types used across `nerve`.
pub mod error;
pub mod graph;
pub mod lens;
pub mod mapper;
pub mod metric;
pub mod points;


pub use crate::cluster::{ClusterStep, Clusterer, Dbscan, Kmeans};
pub use crate::cover::{Cover, Hypercube, UniformCover};
pub use crate::graph::{MapperGraph, Node};
pub use crate::lens::Lens;
pub use crate::mapper::Mapper;
pub use crate::metric::Metric;
pub use crate::points::PointCloud;
pub use error::{Error, ErrorKind, Result};
