//! The two pipeline stages: projection and mapping.
//!
//! ```text
//! PointCloud ──filter(lenses)──▶ projected ──Cover──▶ hypercubes
//!                                                        │
//!                       MapperGraph ◀──assemble◀──map(ClusterStep)
//! ```
//!
//! [`Mapper::filter`] applies every lens to the original points and glues the
//! outputs together column-wise. The caller builds a [`Cover`] over the
//! result, and [`Mapper::map`] clusters each hypercube and assembles the
//! graph.
//!
//! # Node order
//!
//! Node ids are assigned in hypercube order, and within a hypercube in
//! ascending label order. With the `parallel` feature hypercubes are
//! clustered on the rayon pool, but ids are handed out only after every
//! hypercube has finished, so both builds produce the same graph. When
//! several hypercubes fail, both builds report the error of the first one in
//! cover order.

use crate::cluster::ClusterStep;
use crate::cover::{Cover, Hypercube};
use crate::error::{Error, Result};
use crate::graph::{CoverParams, MapperGraph, MapperParams};
use crate::lens::Lens;
use crate::metric::Metric;
use crate::points::PointCloud;
use log::{debug, info};
use ndarray::{Array2, ArrayView2, Axis};
use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Runs the projection and mapping stages.
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    verbose: bool,
}

impl Mapper {
    /// A quiet mapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Log progress through the `log` facade.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Whether progress is logged.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Project `points` through `lenses`.
    ///
    /// Each lens sees the original points, never the output of the previous
    /// lens. Outputs are concatenated along the feature axis in lens order.
    /// With no lenses the points are taken as already projected and returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Lens errors propagate as-is. A lens whose output row count differs
    /// from the input is reported as [`Error::DimensionMismatch`].
    pub fn filter(&self, points: &PointCloud, lenses: &[&dyn Lens]) -> Result<Array2<f64>> {
        let data = points.view();
        if lenses.is_empty() {
            if self.verbose {
                info!("no lens supplied, treating input as projected");
            }
            return Ok(data.to_owned());
        }

        let mut outputs = Vec::with_capacity(lenses.len());
        for lens in lenses {
            if self.verbose {
                info!("filtering by {}", lens.name());
                match lens.metric() {
                    Some(metric) => info!("using metric {metric}"),
                    None => info!("using default metric"),
                }
            }
            let projected = lens.fit_transform(data)?;
            if projected.nrows() != data.nrows() {
                return Err(Error::DimensionMismatch {
                    expected: data.nrows(),
                    found: projected.nrows(),
                });
            }
            outputs.push(projected);
        }

        let views: Vec<ArrayView2<'_, f64>> = outputs.iter().map(Array2::view).collect();
        let projected =
            ndarray::concatenate(Axis(1), &views).map_err(|e| Error::Other(e.to_string()))?;
        if self.verbose {
            info!(
                "projection done: {} rows, {} columns",
                projected.nrows(),
                projected.ncols()
            );
        }
        Ok(projected)
    }

    /// Cluster each hypercube of `cover` and assemble the graph.
    ///
    /// `points` is the raw data (or, for a precomputed clusterer metric, the
    /// square distance matrix). Returns `Ok(None)` when no hypercube produced
    /// a node.
    ///
    /// # Errors
    ///
    /// - [`Error::RowCountMismatch`] when `points` and `cover` disagree on the
    ///   number of points.
    /// - [`Error::NotSquare`] when the clusterer's metric is precomputed and
    ///   `points` is not square.
    /// - [`Error::LabelCountMismatch`] when the clusterer returns the wrong
    ///   number of labels.
    /// - Any clusterer error, unchanged.
    pub fn map(
        &self,
        points: &PointCloud,
        cover: &dyn Cover,
        step: ClusterStep<'_>,
    ) -> Result<Option<MapperGraph>> {
        let data = points.view();
        let n = data.nrows();
        if cover.point_count() != n {
            return Err(Error::RowCountMismatch {
                data: n,
                cover: cover.point_count(),
            });
        }
        let projected = cover.data();
        if projected.nrows() != n {
            return Err(Error::RowCountMismatch {
                data: n,
                cover: projected.nrows(),
            });
        }
        let metric = step.metric();
        if metric.is_precomputed() && data.ncols() != n {
            return Err(Error::NotSquare {
                rows: n,
                cols: data.ncols(),
            });
        }

        let min_cluster_samples = step.min_samples().unwrap_or(1);
        let hypercubes = cover.hypercubes();
        if self.verbose {
            info!("mapping {} x {} points", data.nrows(), data.ncols());
            info!(
                "cover: {} hypercubes over {} projected dimensions",
                hypercubes.len(),
                projected.ncols()
            );
            info!("minimum points per node: {min_cluster_samples}");
        }

        let ctx = CubeContext {
            data,
            metric,
            step,
            min_cluster_samples,
            verbose: self.verbose,
        };

        // The first failing hypercube in cover order decides the error.
        #[cfg(feature = "parallel")]
        let per_cube: Vec<Vec<Vec<usize>>> = hypercubes
            .par_iter()
            .enumerate()
            .map(|(i, cube)| ctx.cluster(i, cube))
            .collect::<Vec<Result<_>>>()
            .into_iter()
            .collect::<Result<_>>()?;

        #[cfg(not(feature = "parallel"))]
        let per_cube: Vec<Vec<Vec<usize>>> = hypercubes
            .iter()
            .enumerate()
            .map(|(i, cube)| ctx.cluster(i, cube))
            .collect::<Result<_>>()?;

        let memberships: Vec<Vec<usize>> = per_cube.into_iter().flatten().collect();
        if memberships.is_empty() {
            if self.verbose {
                info!("no nodes found, returning no graph");
            }
            return Ok(None);
        }

        let params = MapperParams {
            cover: CoverParams {
                resolution: cover.resolution(),
                overlap: cover.overlap(),
            },
            cluster: step.params(),
        };
        let graph =
            MapperGraph::assemble(memberships, projected, points.resolved_sample_names(), params);

        if self.verbose {
            info!("created {} nodes", graph.n_nodes());
            info!("created {} edges", graph.n_edges());
            info!("mapping done");
        }
        Ok(Some(graph))
    }
}

/// Everything one hypercube needs, shared read-only across hypercubes.
struct CubeContext<'a> {
    data: ArrayView2<'a, f64>,
    metric: Metric,
    step: ClusterStep<'a>,
    min_cluster_samples: usize,
    verbose: bool,
}

impl CubeContext<'_> {
    /// Member lists of the nodes found in `cube`, in label order.
    fn cluster(&self, index: usize, cube: &Hypercube) -> Result<Vec<Vec<usize>>> {
        let members = cube.members();
        let n = self.data.nrows();
        if let Some(&last) = members.last() {
            if last >= n {
                return Err(Error::Other(format!(
                    "hypercube {index} references point {last}, but there are only {n}"
                )));
            }
        }

        if members.is_empty() || members.len() < self.min_cluster_samples {
            if self.verbose {
                debug!("hypercube {index}: {} points, skipped", members.len());
            }
            return Ok(Vec::new());
        }

        let clusterer = match self.step {
            ClusterStep::Fit(clusterer) => clusterer,
            ClusterStep::WholeCube { .. } => {
                if self.verbose {
                    debug!("hypercube {index}: {} points, one node", members.len());
                }
                return Ok(vec![members.to_vec()]);
            }
        };

        let mut subset = self.data.select(Axis(0), members);
        if self.metric.is_precomputed() {
            subset = subset.select(Axis(1), members);
        }
        let labels = clusterer.fit(subset.view())?;
        if labels.len() != members.len() {
            return Err(Error::LabelCountMismatch {
                expected: members.len(),
                found: labels.len(),
            });
        }

        let mut clusters: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (&point, label) in members.iter().zip(&labels) {
            if let Some(label) = label {
                clusters.entry(*label).or_default().push(point);
            }
        }
        if self.verbose {
            debug!(
                "hypercube {index}: {} points, {} clusters",
                members.len(),
                clusters.len()
            );
        }
        Ok(clusters.into_values().collect())
    }
}
