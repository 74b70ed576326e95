//! Clustering traits.

use crate::error::Result;
use crate::metric::Metric;
use core::fmt;
use ndarray::ArrayView2;
use std::collections::BTreeMap;

/// A single configuration value reported by a clusterer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum ParamValue {
    /// Flag.
    Bool(bool),
    /// Integer parameter.
    Int(i64),
    /// Real parameter.
    Float(f64),
    /// Named choice, e.g. a metric or linkage.
    Str(String),
    /// Unset optional parameter.
    None,
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Str(v) => write!(f, "{v}"),
            ParamValue::None => write!(f, "none"),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        i64::try_from(v).map_or(ParamValue::Float(v as f64), ParamValue::Int)
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(ParamValue::Float(v as f64), ParamValue::Int)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

impl From<Metric> for ParamValue {
    fn from(v: Metric) -> Self {
        ParamValue::Str(v.name().to_string())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ParamValue::None, Into::into)
    }
}

/// Named configuration of a clusterer, recorded in the graph parameters.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct ClusterParams(BTreeMap<String, ParamValue>);

impl ClusterParams {
    /// No parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a parameter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        let _ = self.0.insert(name.into(), value.into());
        self
    }

    /// Look up a parameter.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    /// Parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no parameter is recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Trait for clustering algorithms used inside hypercubes.
///
/// Labels are per input row; `None` marks a noise point that belongs to no
/// cluster.
pub trait Clusterer: Sync {
    /// Metric the algorithm expects its input in.
    ///
    /// [`Metric::Precomputed`] means `fit` receives a square distance matrix.
    fn metric(&self) -> Metric {
        Metric::Euclidean
    }

    /// Minimum number of points a subset needs before clustering is
    /// attempted, if the algorithm has such a parameter.
    fn min_samples(&self) -> Option<usize> {
        None
    }

    /// Configuration, for the record.
    fn params(&self) -> ClusterParams;

    /// Fit to `data` and return one label per row.
    fn fit(&self, data: ArrayView2<'_, f64>) -> Result<Vec<Option<usize>>>;
}

/// How the mapping stage groups the points of one hypercube.
#[derive(Clone, Copy)]
pub enum ClusterStep<'a> {
    /// Run a clusterer on each hypercube.
    Fit(&'a dyn Clusterer),
    /// Treat each hypercube as a single cluster.
    WholeCube {
        /// Minimum subset size for a hypercube to produce a node.
        min_samples: Option<usize>,
    },
}

impl<'a> ClusterStep<'a> {
    /// Cluster with `clusterer`.
    pub fn fit(clusterer: &'a dyn Clusterer) -> Self {
        ClusterStep::Fit(clusterer)
    }

    /// No sub-clustering.
    pub fn whole_cube() -> Self {
        ClusterStep::WholeCube { min_samples: None }
    }

    /// Metric of the underlying clusterer; whole cubes are Euclidean.
    pub fn metric(&self) -> Metric {
        match self {
            ClusterStep::Fit(c) => c.metric(),
            ClusterStep::WholeCube { .. } => Metric::Euclidean,
        }
    }

    /// Configured minimum sample count, if any.
    pub fn min_samples(&self) -> Option<usize> {
        match self {
            ClusterStep::Fit(c) => c.min_samples(),
            ClusterStep::WholeCube { min_samples } => *min_samples,
        }
    }

    /// Parameters recorded into the graph.
    pub fn params(&self) -> ClusterParams {
        match self {
            ClusterStep::Fit(c) => c.params(),
            ClusterStep::WholeCube { min_samples } => ClusterParams::new()
                .with("algorithm", "whole_cube")
                .with("min_samples", *min_samples),
        }
    }
}

impl fmt::Debug for ClusterStep<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterStep::Fit(c) => f.debug_tuple("Fit").field(&c.params()).finish(),
            ClusterStep::WholeCube { min_samples } => f
                .debug_struct("WholeCube")
                .field("min_samples", min_samples)
                .finish(),
        }
    }
}
