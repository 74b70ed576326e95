//! The Mapper graph.
//!
//! Nodes live in an arena: a node's id is its index, and ids follow creation
//! order (hypercube order, then label order within a hypercube). Each node
//! owns the sorted indices of the points it contains.
//!
//! Two nodes are adjacent iff they share at least one point. There are no
//! weights and no thresholds, so the edge set is a pure function of the node
//! memberships.
//!
//! # Edge discovery
//!
//! Testing every pair of nodes is `O(k²)` in the node count. Instead each
//! point lists the nodes containing it, and every pair of nodes listed by the
//! same point is an edge. The cost is driven by point multiplicity (how many
//! nodes share a point), which the cover's overlap keeps small.

use crate::cluster::ClusterParams;
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use std::collections::{BTreeMap, BTreeSet};

/// A cluster of points found in one hypercube.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Node {
    id: usize,
    members: Vec<usize>,
}

impl Node {
    /// Node id (its creation index).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Indices of the points in this node, ascending.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Number of points.
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Whether point `i` belongs to this node.
    pub fn contains(&self, i: usize) -> bool {
        self.members.binary_search(&i).is_ok()
    }
}

/// Cover parameters recorded with a graph.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CoverParams {
    /// Intervals per axis.
    pub resolution: usize,
    /// Overlap fraction.
    pub overlap: f64,
}

/// Parameters a graph was built with.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MapperParams {
    /// Cover configuration.
    pub cover: CoverParams,
    /// Clusterer configuration.
    pub cluster: ClusterParams,
}

/// Result of the mapping stage.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MapperGraph {
    nodes: Vec<Node>,
    edges: Vec<(usize, usize)>,
    adjacency: BTreeMap<usize, BTreeSet<usize>>,
    sample_names: Vec<String>,
    node_positions: Array2<f64>,
    node_sizes: Vec<usize>,
    params: MapperParams,
}

/// Pairs `(a, b)`, `a < b`, of nodes sharing at least one point.
pub(crate) fn discover_edges(nodes: &[Node], n_points: usize) -> BTreeSet<(usize, usize)> {
    let mut containing: Vec<Vec<usize>> = vec![Vec::new(); n_points];
    for node in nodes {
        for &p in &node.members {
            containing[p].push(node.id);
        }
    }

    let mut edges = BTreeSet::new();
    for ids in containing.iter().filter(|ids| ids.len() >= 2) {
        // Node ids were pushed in ascending order.
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                let _ = edges.insert((a, b));
            }
        }
    }
    edges
}

impl MapperGraph {
    /// Assemble a graph from node memberships in creation order.
    ///
    /// `positions_from` is the matrix node positions are averaged over (the
    /// cover's projected data). Every membership must be non-empty and in
    /// range; the mapping stage guarantees both.
    pub(crate) fn assemble(
        memberships: Vec<Vec<usize>>,
        positions_from: ArrayView2<'_, f64>,
        sample_names: Vec<String>,
        params: MapperParams,
    ) -> Self {
        let n_points = sample_names.len();
        let nodes: Vec<Node> = memberships
            .into_iter()
            .enumerate()
            .map(|(id, members)| Node { id, members })
            .collect();

        let dims = positions_from.ncols();
        let mut node_positions = Array2::<f64>::zeros((nodes.len(), dims));
        let mut node_sizes = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let mut row = node_positions.row_mut(node.id);
            for &p in &node.members {
                row += &positions_from.row(p);
            }
            let size = node.members.len();
            if size > 0 {
                row.mapv_inplace(|v| v / size as f64);
            }
            node_sizes.push(size);
        }

        let edge_set = discover_edges(&nodes, n_points);
        let mut adjacency: BTreeMap<usize, BTreeSet<usize>> =
            nodes.iter().map(|n| (n.id, BTreeSet::new())).collect();
        for &(a, b) in &edge_set {
            if let Some(set) = adjacency.get_mut(&a) {
                let _ = set.insert(b);
            }
            if let Some(set) = adjacency.get_mut(&b) {
                let _ = set.insert(a);
            }
        }

        Self {
            nodes,
            edges: edge_set.into_iter().collect(),
            adjacency,
            sample_names,
            node_positions,
            node_sizes,
            params,
        }
    }

    /// All nodes, in creation order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Look up a node by id.
    pub fn node(&self, id: usize) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Node ids in creation order, aligned with [`node_positions`](Self::node_positions)
    /// and [`node_sizes`](Self::node_sizes).
    pub fn node_keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().map(Node::id)
    }

    /// Number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of points in the input cloud.
    pub fn n_samples(&self) -> usize {
        self.sample_names.len()
    }

    /// Edges `(a, b)` with `a < b`, sorted lexicographically.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Symmetric adjacency: every node id maps to the ids it shares points
    /// with.
    pub fn adjacency(&self) -> &BTreeMap<usize, BTreeSet<usize>> {
        &self.adjacency
    }

    /// Whether nodes `a` and `b` share a point.
    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        self.adjacency.get(&a).is_some_and(|set| set.contains(&b))
    }

    /// Neighbors of `id`, ascending. Empty for unknown ids.
    pub fn neighbors(&self, id: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency
            .get(&id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// One name per input row, in row order.
    pub fn sample_names(&self) -> &[String] {
        &self.sample_names
    }

    /// Mean projected coordinates of each node, one row per node.
    ///
    /// Averaged over [`Cover::data`](crate::cover::Cover::data): with a
    /// [`UniformCover`](crate::cover::UniformCover) these are min-max
    /// normalised coordinates in `[0, 1]`, not raw lens values.
    pub fn node_positions(&self) -> ArrayView2<'_, f64> {
        self.node_positions.view()
    }

    /// Position of one node.
    pub fn node_position(&self, id: usize) -> Option<ArrayView1<'_, f64>> {
        (id < self.nodes.len()).then(|| self.node_positions.row(id))
    }

    /// Member count of each node, in creation order.
    pub fn node_sizes(&self) -> &[usize] {
        &self.node_sizes
    }

    /// Cover and clusterer parameters.
    pub fn params(&self) -> &MapperParams {
        &self.params
    }

    /// For every sample, the ids of the nodes containing it.
    pub fn sample_to_nodes(&self) -> Vec<Vec<usize>> {
        let mut out = vec![Vec::new(); self.n_samples()];
        for node in &self.nodes {
            for &p in &node.members {
                out[p].push(node.id);
            }
        }
        out
    }

    /// Fraction of samples that ended up in at least one node.
    pub fn cover_ratio(&self) -> f64 {
        let n = self.n_samples();
        if n == 0 {
            return 0.0;
        }
        let mut seen = vec![false; n];
        for node in &self.nodes {
            for &p in &node.members {
                seen[p] = true;
            }
        }
        seen.iter().filter(|&&s| s).count() as f64 / n as f64
    }

    /// Connected components of the node graph.
    ///
    /// Each component lists its node ids ascending; components are ordered by
    /// their smallest id.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut uf = UnionFind::<usize>::new(self.nodes.len());
        for &(a, b) in &self.edges {
            let _ = uf.union(a, b);
        }

        let mut by_root: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for id in 0..self.nodes.len() {
            by_root.entry(uf.find(id)).or_default().push(id);
        }
        let mut components: Vec<Vec<usize>> = by_root.into_values().collect();
        components.sort_by_key(|c| c[0]);
        components
    }

    /// Average per-sample values over each node's members.
    ///
    /// `values` has one row per sample; the result has one row per node.
    /// This is the same averaging that produces
    /// [`node_positions`](Self::node_positions), applied to arbitrary
    /// per-sample attributes.
    pub fn aggregate(&self, values: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        if values.nrows() != self.n_samples() {
            return Err(Error::DimensionMismatch {
                expected: self.n_samples(),
                found: values.nrows(),
            });
        }
        let mut out = Array2::<f64>::zeros((self.nodes.len(), values.ncols()));
        for node in &self.nodes {
            let mut acc = Array1::<f64>::zeros(values.ncols());
            for &p in &node.members {
                acc += &values.row(p);
            }
            acc /= node.size() as f64;
            out.row_mut(node.id).assign(&acc);
        }
        Ok(out)
    }

    /// Export as a petgraph graph. Node weights are node ids, and
    /// `NodeIndex::new(id)` addresses node `id`.
    pub fn to_petgraph(&self) -> UnGraph<usize, ()> {
        let mut graph = UnGraph::<usize, ()>::with_capacity(self.nodes.len(), self.edges.len());
        for node in &self.nodes {
            let _ = graph.add_node(node.id);
        }
        for &(a, b) in &self.edges {
            let _ = graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    fn params() -> MapperParams {
        MapperParams {
            cover: CoverParams {
                resolution: 2,
                overlap: 0.1,
            },
            cluster: ClusterParams::new(),
        }
    }

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| i.to_string()).collect()
    }

    fn brute_force_edges(nodes: &[Node]) -> BTreeSet<(usize, usize)> {
        let mut edges = BTreeSet::new();
        for a in nodes {
            for b in nodes.iter().filter(|b| b.id > a.id) {
                if a.members.iter().any(|p| b.contains(*p)) {
                    let _ = edges.insert((a.id, b.id));
                }
            }
        }
        edges
    }

    #[test]
    fn test_assemble_positions_and_sizes() {
        let data = array![[0.0, 0.0], [2.0, 0.0], [0.0, 4.0], [9.0, 9.0]];
        let graph = MapperGraph::assemble(
            vec![vec![0, 1, 2], vec![2, 3]],
            data.view(),
            names(4),
            params(),
        );

        assert_eq!(graph.n_nodes(), 2);
        assert_eq!(graph.node_sizes(), &[3, 2]);
        let p0 = graph.node_position(0).unwrap();
        assert!((p0[0] - 2.0 / 3.0).abs() < 1e-12);
        assert!((p0[1] - 4.0 / 3.0).abs() < 1e-12);
        let p1 = graph.node_position(1).unwrap();
        assert!((p1[0] - 4.5).abs() < 1e-12);
        assert!((p1[1] - 6.5).abs() < 1e-12);
        assert!(graph.node_position(2).is_none());

        assert_eq!(graph.edges(), &[(0, 1)]);
        assert!(graph.is_adjacent(0, 1));
        assert!(graph.is_adjacent(1, 0));
    }

    #[test]
    fn test_adjacency_lists_isolated_nodes() {
        let data = array![[0.0], [1.0], [2.0]];
        let graph = MapperGraph::assemble(
            vec![vec![0], vec![1], vec![1, 2]],
            data.view(),
            names(3),
            params(),
        );
        assert_eq!(graph.adjacency().len(), 3);
        assert!(graph.adjacency()[&0].is_empty());
        assert_eq!(graph.neighbors(2).collect::<Vec<_>>(), vec![1]);
        assert_eq!(graph.neighbors(7).count(), 0);
    }

    #[test]
    fn test_components_and_cover_ratio() {
        let data = Array2::<f64>::zeros((6, 1));
        let graph = MapperGraph::assemble(
            vec![vec![0, 1], vec![1, 2], vec![4], vec![2]],
            data.view(),
            names(6),
            params(),
        );
        assert_eq!(graph.components(), vec![vec![0, 1, 3], vec![2]]);
        // Samples 3 and 5 are in no node.
        assert!((graph.cover_ratio() - 4.0 / 6.0).abs() < 1e-12);

        let s2n = graph.sample_to_nodes();
        assert_eq!(s2n[1], vec![0, 1]);
        assert_eq!(s2n[2], vec![1, 3]);
        assert!(s2n[3].is_empty());
    }

    #[test]
    fn test_aggregate() {
        let data = Array2::<f64>::zeros((3, 1));
        let graph = MapperGraph::assemble(
            vec![vec![0, 1], vec![2]],
            data.view(),
            names(3),
            params(),
        );
        let values = array![[1.0, 10.0], [3.0, 20.0], [5.0, 30.0]];
        let agg = graph.aggregate(values.view()).unwrap();
        assert_eq!(agg, array![[2.0, 15.0], [5.0, 30.0]]);

        let wrong = array![[1.0], [2.0]];
        assert!(graph.aggregate(wrong.view()).is_err());
    }

    #[test]
    fn test_to_petgraph() {
        let data = Array2::<f64>::zeros((3, 1));
        let graph = MapperGraph::assemble(
            vec![vec![0, 1], vec![1, 2], vec![2]],
            data.view(),
            names(3),
            params(),
        );
        let pg = graph.to_petgraph();
        assert_eq!(pg.node_count(), 3);
        assert_eq!(pg.edge_count(), 2);
        assert_eq!(pg[NodeIndex::new(2)], 2);
        assert!(pg.contains_edge(NodeIndex::new(0), NodeIndex::new(1)));
        assert!(pg.contains_edge(NodeIndex::new(2), NodeIndex::new(1)));
    }

    proptest! {
        #[test]
        fn indexed_edges_match_all_pairs_scan(
            memberships in proptest::collection::vec(
                proptest::collection::btree_set(0usize..40, 1..8),
                1..25,
            ),
        ) {
            let nodes: Vec<Node> = memberships
                .into_iter()
                .enumerate()
                .map(|(id, set)| Node { id, members: set.into_iter().collect() })
                .collect();
            prop_assert_eq!(discover_edges(&nodes, 40), brute_force_edges(&nodes));
        }
    }
}
