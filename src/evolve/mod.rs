//! Genetic search over seed-set chromosomes.
//!
//! The search optimizes the mean cascade size estimated by repeated
//! stochastic diffusion trials:
//!
//! - **Fitness** (`fitness`): repeated-trial spread estimation
//! - **Chromosomes** (`chromosome`): seed-set value types, candidate pools,
//!   crossover and mutation operators
//! - **Engine** (`engine`): initialization, tournament selection, elitism,
//!   and the generation loop
//!
//! # Example
//!
//! ```rust,no_run
//! use influmax::graph::Network;
//! use influmax::evolve::GaEngine;
//! use influmax::schema::GaConfig;
//!
//! let edges: Vec<(usize, usize)> = (0..10).map(|i| (i, (i + 1) % 10)).collect();
//! let network = Network::undirected(10, &edges);
//!
//! let mut config = GaConfig::with_genes(2);
//! config.population_size = 6;
//! config.random_seed = Some(42);
//!
//! let mut engine = GaEngine::new(network, vec![0, 2, 4, 6, 8], config).unwrap();
//! let report = engine
//!     .run_with_callback(|progress| {
//!         println!(
//!             "generation {}: best fitness {:.2}",
//!             progress.generation, progress.best_fitness
//!         );
//!     })
//!     .unwrap();
//!
//! println!("best seed set: {:?}", report.best.genes());
//! ```

mod chromosome;
mod engine;
mod fitness;

pub use chromosome::{
    CandidatePools, Chromosome, GeneOrigin, Population, PoolsExhausted, PopulationSummary,
    crossover, mutate,
};
pub use engine::{GaEngine, GaError, GaProgress, GaReport, StopReason};
pub use fitness::{EvalError, FitnessEvaluator, SpreadStats};
