//! Random forest configuration parsing from environment variables.

use crate::application::ml::ForestParameters;
use anyhow::{Context, Result, ensure};
use std::env;

/// Forest hyperparameter environment configuration
#[derive(Debug, Clone)]
pub struct ForestEnvConfig {
    pub n_trees: usize,
    pub max_depth: u16,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl ForestEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = ForestParameters::default();

        let n_trees = Self::parse_usize("FOREST_N_TREES", defaults.n_trees)?;
        ensure!(n_trees > 0, "FOREST_N_TREES must be at least 1");

        let min_samples_leaf =
            Self::parse_usize("FOREST_MIN_SAMPLES_LEAF", defaults.min_samples_leaf)?;
        ensure!(
            min_samples_leaf > 0,
            "FOREST_MIN_SAMPLES_LEAF must be at least 1"
        );

        Ok(Self {
            n_trees,
            max_depth: env::var("FOREST_MAX_DEPTH")
                .unwrap_or_else(|_| defaults.max_depth.to_string())
                .parse::<u16>()
                .context("Failed to parse FOREST_MAX_DEPTH")?,
            min_samples_leaf,
            seed: env::var("FOREST_SEED")
                .unwrap_or_else(|_| defaults.seed.to_string())
                .parse::<u64>()
                .context("Failed to parse FOREST_SEED")?,
        })
    }

    pub fn parameters(&self) -> ForestParameters {
        ForestParameters {
            n_trees: self.n_trees,
            max_depth: self.max_depth,
            min_samples_leaf: self.min_samples_leaf,
            seed: self.seed,
        }
    }

    fn parse_usize(key: &str, default: usize) -> Result<usize> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<usize>()
            .context(format!("Failed to parse {}", key))
    }
}
