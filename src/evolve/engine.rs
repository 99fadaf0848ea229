//! The genetic search engine.

use log::debug;
use rand::rngs::StdRng;
use rand::seq::{SliceRandom, index};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::diffusion::DiffusionError;
use crate::graph::Network;
use crate::schema::{ConfigError, ElitismPolicy, GaConfig};

use super::chromosome::{
    CandidatePools, Chromosome, GeneOrigin, Population, PoolsExhausted, PopulationSummary,
    crossover, mutate,
};
use super::fitness::{EvalError, FitnessEvaluator};

/// Attempts to build one distinct chromosome before initialization gives up.
const MAX_DUPLICATE_RETRIES: usize = 1000;

/// Attempts to produce a pair of offspring not already in the population.
/// After the bound, replacement simply skips any still-duplicate child.
const MAX_OFFSPRING_RETRIES: usize = 50;

/// Errors surfaced by the engine.
#[derive(Debug, thiserror::Error)]
pub enum GaError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    InvalidSeed(#[from] DiffusionError),
    #[error(transparent)]
    Evaluate(#[from] EvalError),
    #[error(transparent)]
    Pools(#[from] PoolsExhausted),
    #[error(
        "Gave up building distinct chromosomes after {built} of {wanted}; \
         the population size is too large for the candidate space"
    )]
    SearchSpaceExhausted { built: usize, wanted: usize },
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The generation budget (`ngen`) was spent.
    GenerationBudget,
    /// The best individual activates the whole graph; no improvement is
    /// possible.
    FullCoverage,
}

/// Snapshot handed to progress callbacks after setup and after every
/// generation.
#[derive(Debug, Clone, Serialize)]
pub struct GaProgress {
    /// Generations completed so far (0 right after setup).
    pub generation: usize,
    /// Best fitness seen across the whole run.
    pub best_fitness: f64,
    /// Best fitness of the most recent generation.
    pub generation_best: f64,
    /// Whole-population fitness summary.
    pub summary: PopulationSummary,
}

/// Final result of a run.
#[derive(Debug, Clone, Serialize)]
pub struct GaReport {
    /// Best individual seen across all generations.
    pub best: Chromosome,
    /// The final population.
    pub population: Population,
    /// Generation-best fitness, index 0 being the initial population.
    pub history: Vec<f64>,
    /// Generations executed.
    pub generations: usize,
    pub stop_reason: StopReason,
}

/// Genetic search for a high-influence seed set.
///
/// Owns the network, the candidate pools, the population, and the run-scoped
/// random generator. Constructing the engine validates the configuration,
/// builds and evaluates the initial population, and records the initial best;
/// [`GaEngine::run`] then drives generations until termination.
pub struct GaEngine {
    network: Network,
    config: GaConfig,
    pools: CandidatePools,
    evaluator: FitnessEvaluator,
    rng: StdRng,
    population: Population,
    history: Vec<f64>,
    best: Chromosome,
    generation: usize,
}

impl GaEngine {
    /// Set up a run: validate, build the exploration pool, seed the initial
    /// population, and evaluate it.
    ///
    /// `seed_pool` is the externally ranked candidate list (highest first);
    /// it must hold at least `genes` nodes, all present in the network.
    pub fn new(network: Network, seed_pool: Vec<usize>, config: GaConfig) -> Result<Self, GaError> {
        config.validate()?;
        if seed_pool.len() < config.genes {
            return Err(ConfigError::SeedPoolTooSmall {
                needed: config.genes,
                available: seed_pool.len(),
            }
            .into());
        }
        for &seed in &seed_pool {
            if !network.contains(seed) {
                return Err(DiffusionError::InvalidSeed(seed).into());
            }
        }

        let mut rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let exploration = exploration_pool(&network, &seed_pool, &mut rng);
        debug!(
            "candidate pools: {} ranked, {} exploration",
            seed_pool.len(),
            exploration.len()
        );
        let pools = CandidatePools::new(seed_pool, exploration);
        if pools.total() < config.genes {
            return Err(ConfigError::InsufficientCandidates {
                needed: config.genes,
                available: pools.total(),
            }
            .into());
        }

        let evaluator = FitnessEvaluator::new(config.model, config.trials, config.p)?;

        let mut members: Vec<Chromosome> = Vec::with_capacity(config.population_size);
        while members.len() < config.population_size {
            let mut attempts = 0;
            loop {
                let candidate = random_chromosome(&pools, &config, &mut rng)?;
                if !members.iter().any(|m| m.same_genes(&candidate)) {
                    members.push(candidate);
                    break;
                }
                attempts += 1;
                if attempts >= MAX_DUPLICATE_RETRIES {
                    return Err(GaError::SearchSpaceExhausted {
                        built: members.len(),
                        wanted: config.population_size,
                    });
                }
            }
        }

        let mut population = Population::new(members);
        for member in population.members_mut() {
            let stats = evaluator.evaluate(&network, member.genes(), &mut rng)?;
            member.set_stats(stats);
        }

        let (best_index, best_fitness) = population.best_index().expect("population is non-empty");
        let best = population.get(best_index).clone();
        debug!("initial population evaluated, best fitness {best_fitness:.2}");

        Ok(Self {
            network,
            config,
            pools,
            evaluator,
            rng,
            population,
            history: vec![best_fitness],
            best,
            generation: 0,
        })
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    pub fn pools(&self) -> &CandidatePools {
        &self.pools
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Best individual seen so far; its fitness never decreases.
    pub fn best(&self) -> &Chromosome {
        &self.best
    }

    /// Generation-best fitness history, starting with the initial population.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Generations completed.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Termination check: `Some` once the generation budget is spent or the
    /// best individual already activates the whole graph.
    pub fn finished(&self) -> Option<StopReason> {
        if self.best.fitness() >= self.network.node_count() as f64 {
            return Some(StopReason::FullCoverage);
        }
        if self.generation >= self.config.ngen {
            return Some(StopReason::GenerationBudget);
        }
        None
    }

    /// Current progress snapshot.
    pub fn progress(&self) -> GaProgress {
        GaProgress {
            generation: self.generation,
            best_fitness: self.best.fitness(),
            generation_best: self.history.last().copied().unwrap_or(f64::NEG_INFINITY),
            summary: self.population.summary(),
        }
    }

    /// Execute one generation: tournament selection, crossover with repair,
    /// mutation, offspring evaluation, replacement, bookkeeping.
    pub fn step(&mut self) -> Result<(), GaError> {
        self.generation += 1;

        let (parent1, parent2) = self.select_parents();

        let mut attempts = 0;
        let (child1, child2) = loop {
            let (mut c1, mut c2) = crossover(
                self.population.get(parent1),
                self.population.get(parent2),
                &self.pools,
                self.generation,
                &mut self.rng,
            )?;
            mutate(&mut c1, self.config.pm, &self.pools, &mut self.rng)?;
            mutate(&mut c2, self.config.pm, &self.pools, &mut self.rng)?;

            let stats = self
                .evaluator
                .evaluate(&self.network, c1.genes(), &mut self.rng)?;
            c1.set_stats(stats);
            let stats = self
                .evaluator
                .evaluate(&self.network, c2.genes(), &mut self.rng)?;
            c2.set_stats(stats);

            attempts += 1;
            let duplicates = self.population.contains(&c1) || self.population.contains(&c2);
            if !duplicates || attempts >= MAX_OFFSPRING_RETRIES {
                break (c1, c2);
            }
        };

        match self.config.elitism {
            ElitismPolicy::Fitness => self.fitness_elitism(child1, child2),
            ElitismPolicy::Parents => {
                self.parents_elitism(child1, parent1);
                self.parents_elitism(child2, parent2);
            }
        }

        let (best_index, generation_best) = match self.population.best_index() {
            Some(found) => found,
            None => return Ok(()),
        };
        self.history.push(generation_best);
        if generation_best > self.best.fitness() {
            self.best = self.population.get(best_index).clone();
        }
        debug!(
            "generation {}: best {:.2}, overall best {:.2}",
            self.generation,
            generation_best,
            self.best.fitness()
        );
        Ok(())
    }

    /// Run to termination, handing a progress snapshot to `callback` after
    /// setup and after every generation.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> Result<GaReport, GaError>
    where
        F: FnMut(&GaProgress),
    {
        callback(&self.progress());
        let stop_reason = loop {
            if let Some(reason) = self.finished() {
                break reason;
            }
            self.step()?;
            callback(&self.progress());
        };

        Ok(GaReport {
            best: self.best.clone(),
            population: self.population.clone(),
            history: self.history.clone(),
            generations: self.generation,
            stop_reason,
        })
    }

    /// Run to termination without progress reporting.
    pub fn run(&mut self) -> Result<GaReport, GaError> {
        self.run_with_callback(|_| {})
    }

    /// Binary tournament, twice: the first winner leaves the candidate list
    /// before the second draw, so the parents are distinct members.
    fn select_parents(&mut self) -> (usize, usize) {
        let mut candidates = self.population.fitness_values();
        let first = tournament(&candidates, &mut self.rng);
        candidates.retain(|&(index, _)| index != first);
        let second = tournament(&candidates, &mut self.rng);
        (first, second)
    }

    /// Insert each child that beats the current population minimum, evicting
    /// the worst member; weaker children are discarded. Children considered
    /// in ascending fitness order.
    fn fitness_elitism(&mut self, child1: Chromosome, child2: Chromosome) {
        let mut children = [child1, child2];
        children.sort_by(|a, b| a.fitness().total_cmp(&b.fitness()));
        for child in children {
            if self.population.contains(&child) {
                continue;
            }
            if let Some((worst_index, worst_fitness)) = self.population.worst_index()
                && child.fitness() > worst_fitness
            {
                self.population.replace(worst_index, child);
            }
        }
    }

    /// Overwrite the parent's slot, unless the child duplicates an existing
    /// member.
    fn parents_elitism(&mut self, child: Chromosome, parent_index: usize) {
        if !self.population.contains(&child) {
            self.population.replace(parent_index, child);
        }
    }
}

/// Pick the fitter of two distinct competitors drawn uniformly from
/// `candidates`, returning its population index.
fn tournament(candidates: &[(usize, f64)], rng: &mut impl Rng) -> usize {
    let picks = index::sample(rng, candidates.len(), 2.min(candidates.len()));
    picks
        .iter()
        .map(|i| candidates[i])
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
        .unwrap_or(0)
}

/// Build one chromosome gene-by-gene: with probability `random_seeds` prefer
/// the exploration pool, otherwise the ranked pool; the draw itself may fall
/// back and records the pool actually used.
fn random_chromosome(
    pools: &CandidatePools,
    config: &GaConfig,
    rng: &mut impl Rng,
) -> Result<Chromosome, PoolsExhausted> {
    let mut genes = Vec::with_capacity(config.genes);
    let mut origins = Vec::with_capacity(config.genes);
    for _ in 0..config.genes {
        let preferred = if rng.r#gen::<f64>() <= config.random_seeds {
            GeneOrigin::Exploration
        } else {
            GeneOrigin::Ranked
        };
        let (node, origin) = pools.draw(preferred, &genes, rng)?;
        genes.push(node);
        origins.push(origin);
    }
    Ok(Chromosome::new(genes, origins, 0))
}

/// High-degree nodes not in the seed pool: everything at or above the 75th
/// percentile of the degree distribution, shuffled once.
fn exploration_pool(network: &Network, seed_pool: &[usize], rng: &mut impl Rng) -> Vec<usize> {
    let degrees: Vec<usize> = (0..network.node_count())
        .map(|v| network.degree(v))
        .collect();
    let cut = percentile(&degrees, 75.0);
    let mut pool: Vec<usize> = (0..network.node_count())
        .filter(|&v| degrees[v] as f64 >= cut && !seed_pool.contains(&v))
        .collect();
    pool.shuffle(rng);
    pool
}

/// Linear-interpolation percentile of an unsorted sample.
fn percentile(values: &[usize], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let rank = (sorted.len() - 1) as f64 * q / 100.0;
    let low = rank.floor() as usize;
    let high = rank.ceil() as usize;
    let fraction = rank - low as f64;
    sorted[low] as f64 + (sorted[high] - sorted[low]) as f64 * fraction
}
