//! Read-only network view backed by petgraph.
//!
//! Nodes are dense indices `0..node_count`. Undirected inputs are stored as
//! mutual arc pairs, so every traversal below works on out/in arcs regardless
//! of how the network was declared; this is also the directed coercion the
//! Linear Threshold preparation relies on.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

/// An immutable graph over dense node indices.
#[derive(Debug, Clone)]
pub struct Network {
    graph: DiGraph<(), ()>,
    directed: bool,
}

impl Network {
    /// Build a directed network. `nodes` is a minimum node count; edges
    /// referencing higher indices grow the network to fit.
    pub fn directed(nodes: usize, edges: &[(usize, usize)]) -> Self {
        Self::build(nodes, edges, true)
    }

    /// Build an undirected network, stored internally as mutual arc pairs.
    pub fn undirected(nodes: usize, edges: &[(usize, usize)]) -> Self {
        Self::build(nodes, edges, false)
    }

    fn build(nodes: usize, edges: &[(usize, usize)], directed: bool) -> Self {
        let max_endpoint = edges
            .iter()
            .map(|&(u, v)| u.max(v) + 1)
            .max()
            .unwrap_or(0);
        let nodes = nodes.max(max_endpoint);

        let mut graph = DiGraph::with_capacity(
            nodes,
            if directed {
                edges.len()
            } else {
                edges.len() * 2
            },
        );
        for _ in 0..nodes {
            graph.add_node(());
        }
        for &(u, v) in edges {
            graph.add_edge(NodeIndex::new(u), NodeIndex::new(v), ());
            if !directed && u != v {
                graph.add_edge(NodeIndex::new(v), NodeIndex::new(u), ());
            }
        }
        Self { graph, directed }
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether the network was declared directed.
    #[inline]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Whether `node` is a valid index in this network.
    #[inline]
    pub fn contains(&self, node: usize) -> bool {
        node < self.graph.node_count()
    }

    /// Out-neighbors of `node`. For undirected networks this is every
    /// adjacent node. `node` must be below `node_count`.
    pub fn out_neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph
            .neighbors_directed(NodeIndex::new(node), Direction::Outgoing)
            .map(NodeIndex::index)
    }

    /// In-neighbors of `node`. `node` must be below `node_count`.
    pub fn in_neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph
            .neighbors_directed(NodeIndex::new(node), Direction::Incoming)
            .map(NodeIndex::index)
    }

    /// Number of in-arcs of `node`.
    pub fn in_degree(&self, node: usize) -> usize {
        self.in_neighbors(node).count()
    }

    /// Number of out-arcs of `node`.
    pub fn out_degree(&self, node: usize) -> usize {
        self.out_neighbors(node).count()
    }

    /// Degree of `node`: incident edges for undirected networks, in-degree
    /// plus out-degree for directed ones.
    pub fn degree(&self, node: usize) -> usize {
        if self.directed {
            self.in_degree(node) + self.out_degree(node)
        } else {
            self.out_degree(node)
        }
    }
}
