//! Configuration types for a genetic influence-maximization run.

use serde::{Deserialize, Serialize};

/// Diffusion model used by the fitness simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiffusionModel {
    /// Independent Cascade: each newly active node tries each inactive
    /// out-neighbor once with probability `p`.
    #[default]
    Icm,
    /// Linear Threshold: a node activates once the summed weight of its
    /// active in-neighbors reaches its personal threshold.
    Ltm,
}

/// Replacement policy applied to each pair of offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ElitismPolicy {
    /// A child enters the population only if it beats the current worst
    /// member, which it then evicts.
    #[default]
    Fitness,
    /// Children overwrite their own parents' slots unconditionally.
    Parents,
}

/// Top-level run configuration.
///
/// Immutable once handed to the engine; every parameter of a run lives here
/// so two runs with equal configs and equal `random_seed` are identical.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaConfig {
    /// Chromosome length: the number of seed nodes to select.
    pub genes: usize,
    /// Number of chromosomes in the population.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Probability that a gene is drawn from the exploration pool rather
    /// than the ranked seed pool.
    #[serde(default = "default_random_seeds")]
    pub random_seeds: f64,
    /// Diffusion model driving the fitness simulation.
    #[serde(default)]
    pub model: DiffusionModel,
    /// Stochastic trials per fitness evaluation.
    #[serde(default = "default_trials", alias = "iterations")]
    pub trials: usize,
    /// Generation budget; 0 reports the initial population untouched.
    #[serde(default = "default_ngen")]
    pub ngen: usize,
    /// Activation probability for the Independent Cascade model.
    #[serde(default = "default_p")]
    pub p: f64,
    /// Per-gene mutation probability.
    #[serde(default = "default_pm")]
    pub pm: f64,
    /// Replacement policy for offspring.
    #[serde(default, alias = "selection")]
    pub elitism: ElitismPolicy,
    /// Seed for the run-scoped random generator. `None` seeds from entropy.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

fn default_population_size() -> usize {
    50
}
fn default_random_seeds() -> f64 {
    0.6
}
fn default_trials() -> usize {
    10
}
fn default_ngen() -> usize {
    50
}
fn default_p() -> f64 {
    0.01
}
fn default_pm() -> f64 {
    0.05
}

impl GaConfig {
    /// Configuration with every optional parameter at its default.
    pub fn with_genes(genes: usize) -> Self {
        Self {
            genes,
            population_size: default_population_size(),
            random_seeds: default_random_seeds(),
            model: DiffusionModel::default(),
            trials: default_trials(),
            ngen: default_ngen(),
            p: default_p(),
            pm: default_pm(),
            elitism: ElitismPolicy::default(),
            random_seed: None,
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.genes == 0 {
            return Err(ConfigError::InvalidGenes);
        }
        // Binary tournament removes the first winner and then draws two
        // distinct competitors from the remainder.
        if self.population_size < 3 {
            return Err(ConfigError::PopulationTooSmall {
                size: self.population_size,
            });
        }
        if self.trials == 0 {
            return Err(ConfigError::InvalidTrials);
        }
        for (name, value) in [
            ("random_seeds", self.random_seeds),
            ("p", self.p),
            ("pm", self.pm),
        ] {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Chromosome length (genes) must be non-zero")]
    InvalidGenes,
    #[error("Population size {size} is too small; tournament selection needs at least 3")]
    PopulationTooSmall { size: usize },
    #[error("Fitness evaluation requires at least one trial")]
    InvalidTrials,
    #[error("Parameter {name} = {value} is outside [0, 1]")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    #[error("Seed pool holds {available} candidates, chromosome needs {needed}")]
    SeedPoolTooSmall { needed: usize, available: usize },
    #[error("Combined candidate pools hold {available} nodes, chromosome needs {needed}")]
    InsufficientCandidates { needed: usize, available: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = GaConfig::with_genes(5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_genes_rejected() {
        let config = GaConfig::with_genes(0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidGenes)));
    }

    #[test]
    fn test_probability_range_checked() {
        let mut config = GaConfig::with_genes(5);
        config.pm = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ProbabilityOutOfRange { name: "pm", .. })
        ));
    }

    #[test]
    fn test_tiny_population_rejected() {
        let mut config = GaConfig::with_genes(5);
        config.population_size = 2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PopulationTooSmall { size: 2 })
        ));
    }

    #[test]
    fn test_serde_defaults() {
        let config: GaConfig = serde_json::from_str(r#"{"genes": 8}"#).unwrap();
        assert_eq!(config.genes, 8);
        assert_eq!(config.population_size, 50);
        assert_eq!(config.model, DiffusionModel::Icm);
        assert_eq!(config.elitism, ElitismPolicy::Fitness);
        assert!((config.random_seeds - 0.6).abs() < f64::EPSILON);
        assert!(config.random_seed.is_none());
    }

    #[test]
    fn test_legacy_field_spellings_accepted() {
        let config: GaConfig =
            serde_json::from_str(r#"{"genes": 4, "iterations": 25, "selection": "parents"}"#)
                .unwrap();
        assert_eq!(config.trials, 25);
        assert_eq!(config.elitism, ElitismPolicy::Parents);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut config = GaConfig::with_genes(10);
        config.model = DiffusionModel::Ltm;
        config.elitism = ElitismPolicy::Parents;
        config.random_seed = Some(7);

        let json = serde_json::to_string(&config).unwrap();
        let parsed: GaConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.model, DiffusionModel::Ltm);
        assert_eq!(parsed.elitism, ElitismPolicy::Parents);
        assert_eq!(parsed.random_seed, Some(7));
    }
}
