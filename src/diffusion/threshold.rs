//! Linear Threshold Model.

use std::collections::HashSet;

use rand::Rng;

use crate::graph::Network;

use super::{DiffusionError, check_seeds};

/// Per-trial snapshot of the derived Linear Threshold state: one random
/// threshold per node and renormalized in-edge weights. Built fresh for each
/// trial so the caller's [`Network`] is never touched and no trial observes
/// another trial's thresholds.
pub struct PreparedGraph<'a> {
    net: &'a Network,
    thresholds: Vec<f64>,
    in_edges: Vec<Vec<(usize, f64)>>,
}

impl<'a> PreparedGraph<'a> {
    /// Assign each node a threshold drawn uniformly from `[0, 1)` and each
    /// in-edge the weight `1 / in_degree(target)`, so the weights into any
    /// node with at least one in-arc sum to 1. Undirected networks are
    /// already stored as mutual arcs, which is the directed coercion this
    /// model requires.
    pub fn new(net: &'a Network, rng: &mut impl Rng) -> Self {
        let n = net.node_count();
        let thresholds = (0..n).map(|_| rng.gen_range(0.0..1.0)).collect();
        let in_edges = (0..n)
            .map(|v| {
                let sources: Vec<usize> = net.in_neighbors(v).collect();
                let weight = 1.0 / sources.len() as f64;
                sources.into_iter().map(|s| (s, weight)).collect()
            })
            .collect();
        Self {
            net,
            thresholds,
            in_edges,
        }
    }

    /// The activation threshold assigned to `node`.
    pub fn threshold(&self, node: usize) -> f64 {
        self.thresholds[node]
    }

    /// The weighted in-edges of `node` as `(source, weight)` pairs.
    pub fn in_edges(&self, node: usize) -> &[(usize, f64)] {
        &self.in_edges[node]
    }

    /// Deterministic propagation from `seeds` over this snapshot.
    ///
    /// Each round the candidates are the inactive out-neighbors of every
    /// active node, scanned in ascending node order; a candidate activates
    /// once the weight arriving from active nodes (including nodes activated
    /// earlier in the same round) reaches its threshold.
    pub fn propagate(&self, seeds: &[usize]) -> HashSet<usize> {
        let n = self.net.node_count();
        let mut active = vec![false; n];
        for &s in seeds {
            active[s] = true;
        }

        loop {
            let mut candidates: Vec<usize> = (0..n)
                .filter(|&v| active[v])
                .flat_map(|v| self.net.out_neighbors(v))
                .filter(|&u| !active[u])
                .collect();
            candidates.sort_unstable();
            candidates.dedup();

            let mut activated_any = false;
            for v in candidates {
                let incoming: f64 = self.in_edges[v]
                    .iter()
                    .filter(|&&(source, _)| active[source])
                    .map(|&(_, weight)| weight)
                    .sum();
                if incoming >= self.thresholds[v] {
                    active[v] = true;
                    activated_any = true;
                }
            }
            if !activated_any {
                break;
            }
        }

        (0..n).filter(|&v| active[v]).collect()
    }
}

/// Run one Linear Threshold trial: prepare a private snapshot and propagate.
/// The only randomness is the per-node threshold assignment.
pub fn linear_threshold(
    net: &Network,
    seeds: &[usize],
    rng: &mut impl Rng,
) -> Result<HashSet<usize>, DiffusionError> {
    check_seeds(net, seeds)?;
    let prepared = PreparedGraph::new(net, rng);
    Ok(prepared.propagate(seeds))
}
