//! Stochastic diffusion simulation over a network.
//!
//! Two spreading models are provided:
//!
//! - **Independent Cascade** (`cascade`): each newly active node gets one
//!   chance to activate each inactive out-neighbor with probability `p`.
//! - **Linear Threshold** (`threshold`): a node activates once the summed
//!   weight of its active in-neighbors reaches its personal threshold.
//!
//! Every call is one stochastic trial; the returned set always contains the
//! seeds. [`simulate`] dispatches on [`DiffusionModel`], and
//! [`spread_profile`] sweeps seed-list prefixes to profile how spread grows
//! with seed-set size.

use std::collections::{BTreeMap, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::graph::Network;
use crate::schema::DiffusionModel;

mod cascade;
mod threshold;

pub use cascade::independent_cascade;
pub use threshold::{PreparedGraph, linear_threshold};

/// Errors raised by a simulation call.
#[derive(Debug, thiserror::Error)]
pub enum DiffusionError {
    #[error("Seed node {0} is not present in the graph")]
    InvalidSeed(usize),
}

pub(crate) fn check_seeds(net: &Network, seeds: &[usize]) -> Result<(), DiffusionError> {
    for &seed in seeds {
        if !net.contains(seed) {
            return Err(DiffusionError::InvalidSeed(seed));
        }
    }
    Ok(())
}

/// Run one stochastic trial of the selected model and return every node
/// activated, seeds included. `p` is only consulted by the cascade model.
pub fn simulate(
    net: &Network,
    seeds: &[usize],
    model: DiffusionModel,
    p: f64,
    rng: &mut impl Rng,
) -> Result<HashSet<usize>, DiffusionError> {
    match model {
        DiffusionModel::Icm => independent_cascade(net, seeds, p, rng),
        DiffusionModel::Ltm => linear_threshold(net, seeds, rng),
    }
}

/// Prefix sweep over an ordered seed list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SweepRange {
    /// First prefix length.
    pub start: usize,
    /// Last prefix length (inclusive).
    pub stop: usize,
    /// Increment between prefix lengths.
    pub step: usize,
}

/// Profile spread against seed-set size: for each prefix length in `sweep`
/// (clamped at `seeds.len()`), run `trials` simulations of that prefix and
/// collect the cascade sizes, keyed by prefix length.
pub fn spread_profile(
    net: &Network,
    seeds: &[usize],
    model: DiffusionModel,
    p: f64,
    trials: usize,
    sweep: SweepRange,
    rng: &mut impl Rng,
) -> Result<BTreeMap<usize, Vec<usize>>, DiffusionError> {
    let mut profile = BTreeMap::new();
    let step = sweep.step.max(1);

    let mut len = sweep.start;
    while len <= sweep.stop {
        if len > seeds.len() {
            break;
        }
        let mut sizes = Vec::with_capacity(trials);
        for _ in 0..trials {
            sizes.push(simulate(net, &seeds[..len], model, p, rng)?.len());
        }
        profile.insert(len, sizes);
        len += step;
    }

    Ok(profile)
}
