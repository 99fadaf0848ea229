//! Influence maximization on social networks via genetic search.
//!
//! This crate selects a small set of "seed" nodes that maximizes the
//! expected diffusion spread through a network. Fitness is estimated by
//! repeated stochastic trials of a diffusion model (Independent Cascade or
//! Linear Threshold), and a genetic algorithm searches over fixed-size
//! seed-set chromosomes built from an externally ranked candidate list plus
//! a high-degree exploration pool.
//!
//! # Architecture
//!
//! - `schema`: run configuration with validation
//! - `graph`: read-only network view
//! - `diffusion`: the two spreading models, one stochastic trial per call
//! - `evolve`: fitness estimation and the genetic engine
//!
//! # Example
//!
//! ```rust,no_run
//! use influmax::{GaConfig, GaEngine, Network};
//!
//! // A 10-node ring with every even node as a ranked candidate.
//! let edges: Vec<(usize, usize)> = (0..10).map(|i| (i, (i + 1) % 10)).collect();
//! let network = Network::undirected(10, &edges);
//!
//! let mut config = GaConfig::with_genes(2);
//! config.population_size = 6;
//! config.ngen = 20;
//! config.random_seed = Some(42);
//!
//! let mut engine = GaEngine::new(network, vec![0, 2, 4, 6, 8], config).unwrap();
//! let report = engine.run().unwrap();
//!
//! println!(
//!     "best seed set {:?} with mean spread {:.2}",
//!     report.best.genes(),
//!     report.best.fitness()
//! );
//! ```

pub mod diffusion;
pub mod evolve;
pub mod graph;
pub mod schema;

// Re-export commonly used types
pub use evolve::{FitnessEvaluator, GaEngine, GaReport, SpreadStats};
pub use graph::Network;
pub use schema::{DiffusionModel, ElitismPolicy, GaConfig};
