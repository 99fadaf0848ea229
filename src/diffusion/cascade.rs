//! Independent Cascade Model.

use std::collections::HashSet;

use rand::Rng;

use crate::graph::Network;

use super::{DiffusionError, check_seeds};

/// Run one Independent Cascade trial.
///
/// Starting from `seeds`, each round gives every node activated in the
/// previous round one chance per out-arc to activate each not-yet-active
/// neighbor with probability `p`. The trial ends when a round activates
/// nobody; the returned set is every node ever activated.
pub fn independent_cascade(
    net: &Network,
    seeds: &[usize],
    p: f64,
    rng: &mut impl Rng,
) -> Result<HashSet<usize>, DiffusionError> {
    check_seeds(net, seeds)?;

    let mut activations: HashSet<usize> = seeds.iter().copied().collect();
    let mut frontier: Vec<usize> = activations.iter().copied().collect();

    while !frontier.is_empty() {
        let mut new_activated = HashSet::new();
        for &v in &frontier {
            for u in net.out_neighbors(v) {
                if activations.contains(&u) || new_activated.contains(&u) {
                    continue;
                }
                if rng.r#gen::<f64>() <= p {
                    new_activated.insert(u);
                }
            }
        }
        frontier = new_activated.iter().copied().collect();
        activations.extend(new_activated);
    }

    Ok(activations)
}
