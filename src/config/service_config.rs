//! Service boundary configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Service environment configuration
#[derive(Debug, Clone)]
pub struct ServiceEnvConfig {
    /// Training requests with fewer rows are rejected at the boundary.
    pub min_training_rows: usize,
    pub service_name: String,
}

impl Default for ServiceEnvConfig {
    fn default() -> Self {
        Self {
            min_training_rows: 100,
            service_name: "tirpe-ai".to_string(),
        }
    }
}

impl ServiceEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            min_training_rows: env::var("MIN_TRAINING_ROWS")
                .unwrap_or_else(|_| defaults.min_training_rows.to_string())
                .parse::<usize>()
                .context("Failed to parse MIN_TRAINING_ROWS")?,
            service_name: env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
        })
    }
}
