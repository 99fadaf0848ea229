//! Schema module - Configuration types for influence-maximization runs.

mod config;

pub use config::*;
