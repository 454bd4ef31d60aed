//! Configuration module for the footfall forecast service.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Forest, Service, and Observability.

mod forest_config;
mod observability_config;
mod service_config;

pub use forest_config::ForestEnvConfig;
pub use observability_config::{MIN_INTERVAL_SECONDS, ObservabilityEnvConfig};
pub use service_config::ServiceEnvConfig;

use crate::application::ml::ForestParameters;
use anyhow::{Context, Result};

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub forest: ForestEnvConfig,
    pub service: ServiceEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing variables take their defaults; malformed values are errors.
    pub fn from_env() -> Result<Self> {
        let forest = ForestEnvConfig::from_env().context("Failed to load forest config")?;
        let service = ServiceEnvConfig::from_env().context("Failed to load service config")?;
        let observability = ObservabilityEnvConfig::from_env();

        Ok(Self {
            forest,
            service,
            observability,
        })
    }

    pub fn forest_parameters(&self) -> ForestParameters {
        self.forest.parameters()
    }
}
