//! Seed-set chromosomes, candidate pools, and the genetic operators.
//!
//! A chromosome is a plain value: a fixed-length vector of distinct node ids,
//! a parallel provenance vector recording which pool each gene came from,
//! cached fitness statistics, and the generation it was created in. The
//! crossover/mutation operators live beside the data so the engine stays a
//! pure orchestrator.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::fitness::SpreadStats;

/// Which candidate pool a gene was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneOrigin {
    /// High-degree node from the exploration pool.
    Exploration,
    /// Node from the externally ranked seed pool.
    Ranked,
}

impl GeneOrigin {
    fn opposite(self) -> Self {
        match self {
            GeneOrigin::Exploration => GeneOrigin::Ranked,
            GeneOrigin::Ranked => GeneOrigin::Exploration,
        }
    }
}

/// Both pools are empty of unused nodes; no legal gene replacement exists.
/// This is a configuration problem: the chromosome length is too close to
/// the number of distinct candidates.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("Both candidate pools are exhausted; no unused node is available for a gene replacement")]
pub struct PoolsExhausted;

/// The two node sources chromosomes are built and repaired from: the ranked
/// seed pool and the high-degree exploration pool. Read-only for the whole
/// run; "removal" of a drawn node is expressed by excluding the nodes a
/// chromosome already carries.
#[derive(Debug, Clone)]
pub struct CandidatePools {
    ranked: Vec<usize>,
    exploration: Vec<usize>,
}

impl CandidatePools {
    pub fn new(ranked: Vec<usize>, exploration: Vec<usize>) -> Self {
        Self {
            ranked,
            exploration,
        }
    }

    pub fn ranked(&self) -> &[usize] {
        &self.ranked
    }

    pub fn exploration(&self) -> &[usize] {
        &self.exploration
    }

    /// Total number of candidate nodes across both pools.
    pub fn total(&self) -> usize {
        self.ranked.len() + self.exploration.len()
    }

    fn pool(&self, origin: GeneOrigin) -> &[usize] {
        match origin {
            GeneOrigin::Exploration => &self.exploration,
            GeneOrigin::Ranked => &self.ranked,
        }
    }

    /// Draw a node not in `used`, preferring the pool matching `origin` and
    /// falling back to the opposite pool when the preferred one has no unused
    /// node left. Returns the node and the pool it actually came from.
    pub fn draw(
        &self,
        origin: GeneOrigin,
        used: &[usize],
        rng: &mut impl Rng,
    ) -> Result<(usize, GeneOrigin), PoolsExhausted> {
        for source in [origin, origin.opposite()] {
            let available: Vec<usize> = self
                .pool(source)
                .iter()
                .copied()
                .filter(|v| !used.contains(v))
                .collect();
            if let Some(&v) = available.choose(rng) {
                return Ok((v, source));
            }
        }
        Err(PoolsExhausted)
    }
}

/// One candidate seed set in the genetic search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chromosome {
    genes: Vec<usize>,
    origins: Vec<GeneOrigin>,
    stats: Option<SpreadStats>,
    generation: usize,
}

impl Chromosome {
    /// Build a chromosome from its genes and their provenance. Both vectors
    /// must have the same length.
    pub fn new(genes: Vec<usize>, origins: Vec<GeneOrigin>, generation: usize) -> Self {
        debug_assert_eq!(genes.len(), origins.len());
        Self {
            genes,
            origins,
            stats: None,
            generation,
        }
    }

    pub fn genes(&self) -> &[usize] {
        &self.genes
    }

    pub fn origins(&self) -> &[GeneOrigin] {
        &self.origins
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn contains(&self, node: usize) -> bool {
        self.genes.contains(&node)
    }

    /// Generation this chromosome was created in.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Cached fitness statistics, `None` until evaluated.
    pub fn stats(&self) -> Option<SpreadStats> {
        self.stats
    }

    pub fn set_stats(&mut self, stats: SpreadStats) {
        self.stats = Some(stats);
    }

    /// Scalar fitness: the mean cascade size, or negative infinity while the
    /// chromosome is unevaluated so any evaluated member outranks it.
    pub fn fitness(&self) -> f64 {
        self.stats.map_or(f64::NEG_INFINITY, |s| s.mean)
    }

    /// Order-sensitive seed-set equality, the identity used for duplicate
    /// detection in the population.
    pub fn same_genes(&self, other: &Chromosome) -> bool {
        self.genes == other.genes
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seeds = if self.genes.len() <= 20 {
            format!("{:?}", self.genes)
        } else {
            format!(
                "{:?}..{:?}",
                &self.genes[..7],
                &self.genes[self.genes.len() - 7..]
            )
        };
        match self.stats {
            Some(s) => write!(
                f,
                "{:<24} -> {:<10.2} {:<6} {:<6} {:>8.3} {:>6}",
                seeds, s.mean, s.min, s.max, s.std_dev, self.generation
            ),
            None => write!(
                f,
                "{:<24} -> {:<10} {:<6} {:<6} {:>8} {:>6}",
                seeds, "-", "-", "-", "-", self.generation
            ),
        }
    }
}

/// Single-point crossover of two parents.
///
/// A cut point is drawn uniformly from the interior and the gene AND origin
/// tails are exchanged; duplicates introduced by the swap are repaired from
/// the pool matching each gene's origin marker. With a single gene no
/// interior cut exists and the children are plain copies (mutation is then
/// the only variation operator).
pub fn crossover(
    parent1: &Chromosome,
    parent2: &Chromosome,
    pools: &CandidatePools,
    generation: usize,
    rng: &mut impl Rng,
) -> Result<(Chromosome, Chromosome), PoolsExhausted> {
    let genes = parent1.len();
    let mut g1 = parent1.genes.clone();
    let mut o1 = parent1.origins.clone();
    let mut g2 = parent2.genes.clone();
    let mut o2 = parent2.origins.clone();

    if genes >= 2 {
        let cut = rng.gen_range(1..genes);
        for i in cut..genes {
            std::mem::swap(&mut g1[i], &mut g2[i]);
            std::mem::swap(&mut o1[i], &mut o2[i]);
        }
    }

    let mut child1 = Chromosome::new(g1, o1, generation);
    let mut child2 = Chromosome::new(g2, o2, generation);
    repair_duplicates(&mut child1, pools, rng)?;
    repair_duplicates(&mut child2, pools, rng)?;
    Ok((child1, child2))
}

/// Replace every gene that repeats an earlier gene with an unused node drawn
/// from its origin pool.
fn repair_duplicates(
    ch: &mut Chromosome,
    pools: &CandidatePools,
    rng: &mut impl Rng,
) -> Result<(), PoolsExhausted> {
    for idx in 1..ch.genes.len() {
        if ch.genes[..idx].contains(&ch.genes[idx]) {
            let (v, origin) = pools.draw(ch.origins[idx], &ch.genes, rng)?;
            ch.genes[idx] = v;
            ch.origins[idx] = origin;
        }
    }
    Ok(())
}

/// Per-gene replacement mutation: each gene is replaced with probability `pm`
/// by an unused node from its origin pool. Any replacement invalidates the
/// cached fitness.
pub fn mutate(
    ch: &mut Chromosome,
    pm: f64,
    pools: &CandidatePools,
    rng: &mut impl Rng,
) -> Result<(), PoolsExhausted> {
    for idx in 0..ch.genes.len() {
        if rng.r#gen::<f64>() <= pm {
            let (v, origin) = pools.draw(ch.origins[idx], &ch.genes, rng)?;
            ch.genes[idx] = v;
            ch.origins[idx] = origin;
            ch.stats = None;
        }
    }
    Ok(())
}

/// A fixed-size collection of chromosomes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Population {
    members: Vec<Chromosome>,
}

impl Population {
    pub fn new(members: Vec<Chromosome>) -> Self {
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Chromosome] {
        &self.members
    }

    pub fn get(&self, index: usize) -> &Chromosome {
        &self.members[index]
    }

    pub(crate) fn members_mut(&mut self) -> &mut [Chromosome] {
        &mut self.members
    }

    pub(crate) fn replace(&mut self, index: usize, chromosome: Chromosome) {
        self.members[index] = chromosome;
    }

    /// Whether any member carries the same seed set.
    pub fn contains(&self, chromosome: &Chromosome) -> bool {
        self.members.iter().any(|m| m.same_genes(chromosome))
    }

    /// `(index, fitness)` for every member.
    pub fn fitness_values(&self) -> Vec<(usize, f64)> {
        self.members
            .iter()
            .enumerate()
            .map(|(i, c)| (i, c.fitness()))
            .collect()
    }

    /// Index and fitness of the best member.
    pub fn best_index(&self) -> Option<(usize, f64)> {
        self.fitness_values()
            .into_iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Index and fitness of the worst member.
    pub fn worst_index(&self) -> Option<(usize, f64)> {
        self.fitness_values()
            .into_iter()
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Whole-population fitness summary.
    pub fn summary(&self) -> PopulationSummary {
        let fitness: Vec<f64> = self.members.iter().map(|c| c.fitness()).collect();
        let n = fitness.len();
        let best = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst = fitness.iter().copied().fold(f64::INFINITY, f64::min);
        let mean = if n > 0 {
            fitness.iter().sum::<f64>() / n as f64
        } else {
            0.0
        };
        let std_dev = if n > 1 {
            let variance =
                fitness.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };
        PopulationSummary {
            best,
            worst,
            mean,
            std_dev,
        }
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "----------------------- Population -----------------------")?;
        writeln!(
            f,
            "#   {:<24}    {:<10} {:<6} {:<6} {:>8} {:>6}",
            "seeds", "mean", "min", "max", "stddev", "gen"
        )?;
        for (i, chromosome) in self.members.iter().enumerate() {
            writeln!(f, "{i:<3} {chromosome}")?;
        }
        Ok(())
    }
}

/// Fitness summary of a whole population.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PopulationSummary {
    pub best: f64,
    pub worst: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl fmt::Display for PopulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "----------------------- Statistics -----------------------")?;
        writeln!(
            f,
            "{:<15} {:<15} {:<15} {:<15}",
            "max", "min", "mean", "stddev"
        )?;
        writeln!(
            f,
            "{:<15.2} {:<15.2} {:<15.2} {:<15.2}",
            self.best, self.worst, self.mean, self.std_dev
        )?;
        write!(f, "----------------------------------------------------------")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pools() -> CandidatePools {
        CandidatePools::new((0..10).collect(), (10..20).collect())
    }

    fn assert_distinct(ch: &Chromosome) {
        let mut sorted = ch.genes().to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), ch.len(), "duplicate genes in {:?}", ch.genes());
    }

    #[test]
    fn test_draw_respects_used_nodes() {
        let pools = CandidatePools::new(vec![1, 2], vec![]);
        let mut rng = StdRng::seed_from_u64(1);
        let (v, origin) = pools.draw(GeneOrigin::Ranked, &[1], &mut rng).unwrap();
        assert_eq!(v, 2);
        assert_eq!(origin, GeneOrigin::Ranked);
    }

    #[test]
    fn test_draw_falls_back_to_opposite_pool() {
        let pools = CandidatePools::new(vec![1], vec![5]);
        let mut rng = StdRng::seed_from_u64(2);
        let (v, origin) = pools.draw(GeneOrigin::Ranked, &[1], &mut rng).unwrap();
        assert_eq!(v, 5);
        assert_eq!(origin, GeneOrigin::Exploration);
    }

    #[test]
    fn test_draw_errors_when_both_pools_used_up() {
        let pools = CandidatePools::new(vec![1], vec![2]);
        let mut rng = StdRng::seed_from_u64(3);
        assert!(pools.draw(GeneOrigin::Ranked, &[1, 2], &mut rng).is_err());
    }

    #[test]
    fn test_crossover_swaps_tails() {
        let pools = CandidatePools::new((0..20).collect(), vec![]);
        let p1 = Chromosome::new(vec![0, 1, 2, 3], vec![GeneOrigin::Ranked; 4], 0);
        let p2 = Chromosome::new(vec![10, 11, 12, 13], vec![GeneOrigin::Ranked; 4], 0);
        let mut rng = StdRng::seed_from_u64(4);

        let (c1, c2) = crossover(&p1, &p2, &pools, 3, &mut rng).unwrap();
        assert_eq!(c1.len(), 4);
        assert_eq!(c2.len(), 4);
        assert_eq!(c1.generation(), 3);
        // Disjoint parents leave nothing to repair: the children partition
        // the parents' genes across some cut.
        let mut all: Vec<usize> = c1.genes().iter().chain(c2.genes()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2, 3, 10, 11, 12, 13]);
        assert_distinct(&c1);
        assert_distinct(&c2);
    }

    #[test]
    fn test_crossover_repairs_duplicates() {
        let pools = CandidatePools::new((0..10).collect(), vec![]);
        // Same value set in opposite order guarantees duplicates after a swap.
        let p1 = Chromosome::new(vec![0, 1, 2, 3], vec![GeneOrigin::Ranked; 4], 0);
        let p2 = Chromosome::new(vec![3, 2, 1, 0], vec![GeneOrigin::Ranked; 4], 0);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (c1, c2) = crossover(&p1, &p2, &pools, 1, &mut rng).unwrap();
            assert_distinct(&c1);
            assert_distinct(&c2);
            assert_eq!(c1.len(), 4);
            assert_eq!(c2.len(), 4);
        }
    }

    #[test]
    fn test_single_gene_crossover_copies_parents() {
        let pools = pools();
        let p1 = Chromosome::new(vec![0], vec![GeneOrigin::Ranked], 0);
        let p2 = Chromosome::new(vec![5], vec![GeneOrigin::Ranked], 0);
        let mut rng = StdRng::seed_from_u64(5);
        let (c1, c2) = crossover(&p1, &p2, &pools, 1, &mut rng).unwrap();
        assert_eq!(c1.genes(), &[0]);
        assert_eq!(c2.genes(), &[5]);
    }

    #[test]
    fn test_mutation_invalidates_stats() {
        let pools = pools();
        let mut ch = Chromosome::new(vec![0, 1, 2], vec![GeneOrigin::Ranked; 3], 0);
        ch.set_stats(SpreadStats::from_sizes(&[5]));
        let mut rng = StdRng::seed_from_u64(6);

        // pm = 1 replaces every gene.
        let before = ch.genes().to_vec();
        mutate(&mut ch, 1.0, &pools, &mut rng).unwrap();
        assert!(ch.stats().is_none());
        assert_ne!(ch.genes(), before.as_slice());
        assert_distinct(&ch);
    }

    #[test]
    fn test_mutation_zero_probability_is_identity() {
        let pools = pools();
        let mut ch = Chromosome::new(vec![0, 1, 2], vec![GeneOrigin::Ranked; 3], 0);
        ch.set_stats(SpreadStats::from_sizes(&[5]));
        let mut rng = StdRng::seed_from_u64(7);
        mutate(&mut ch, 0.0, &pools, &mut rng).unwrap();
        assert_eq!(ch.genes(), &[0, 1, 2]);
        assert!(ch.stats().is_some());
    }

    #[test]
    fn test_population_duplicate_detection_is_order_sensitive() {
        let a = Chromosome::new(vec![1, 2], vec![GeneOrigin::Ranked; 2], 0);
        let b = Chromosome::new(vec![2, 1], vec![GeneOrigin::Ranked; 2], 0);
        let population = Population::new(vec![a.clone()]);
        assert!(population.contains(&a));
        assert!(!population.contains(&b));
    }

    #[test]
    fn test_unevaluated_fitness_ranks_below_any_member() {
        let mut a = Chromosome::new(vec![1], vec![GeneOrigin::Ranked], 0);
        a.set_stats(SpreadStats::from_sizes(&[1]));
        let b = Chromosome::new(vec![2], vec![GeneOrigin::Ranked], 0);
        let population = Population::new(vec![a, b]);
        assert_eq!(population.worst_index().map(|(i, _)| i), Some(1));
    }

    proptest! {
        #[test]
        fn prop_offspring_keep_length_and_distinct_genes(seed in any::<u64>(), genes in 1usize..8) {
            let mut rng = StdRng::seed_from_u64(seed);
            let pools = CandidatePools::new((0..10).collect(), (10..20).collect());
            let p1 = Chromosome::new((0..genes).collect(), vec![GeneOrigin::Ranked; genes], 0);
            let p2 = Chromosome::new((0..genes).rev().collect(), vec![GeneOrigin::Ranked; genes], 0);

            let (mut c1, mut c2) = crossover(&p1, &p2, &pools, 1, &mut rng).unwrap();
            mutate(&mut c1, 0.5, &pools, &mut rng).unwrap();
            mutate(&mut c2, 0.5, &pools, &mut rng).unwrap();

            for c in [&c1, &c2] {
                prop_assert_eq!(c.len(), genes);
                prop_assert_eq!(c.origins().len(), genes);
                let mut sorted = c.genes().to_vec();
                sorted.sort_unstable();
                sorted.dedup();
                prop_assert_eq!(sorted.len(), genes);
            }
        }
    }
}
