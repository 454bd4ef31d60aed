//! Footfall Forecast Server - Headless JSON-lines service
//!
//! Reads one request envelope per line from stdin and writes one reply per
//! line to stdout. Logs and metric snapshots go to stderr.
//!
//! # Usage
//! ```sh
//! echo '{"route":"/health"}' | cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `OBSERVABILITY_ENABLED` - Enable metrics reporting (default: true)
//! - `OBSERVABILITY_INTERVAL` - Interval in seconds between metric outputs (default: 60)
//! - `MIN_TRAINING_ROWS` - Minimum rows accepted by `/train` (default: 100)

use anyhow::Result;
use footfall_forecast::application::ml::ModelManager;
use footfall_forecast::config::Config;
use footfall_forecast::infrastructure::observability::{Metrics, MetricsReporter};
use footfall_forecast::interfaces::api::ForecastService;
use footfall_forecast::interfaces::jsonl;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Setup logging (stderr only, stdout carries replies)
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    info!(
        "Footfall Forecast Server {} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: trees={}, depth={}, min_training_rows={}",
        config.forest.n_trees, config.forest.max_depth, config.service.min_training_rows
    );

    let manager = Arc::new(ModelManager::with_parameters(config.forest_parameters()));
    let metrics = Metrics::new()?;

    if config.observability.enabled {
        let reporter = MetricsReporter::new(
            manager.clone(),
            metrics.clone(),
            config.observability.interval_seconds,
        );

        tokio::spawn(async move {
            reporter.run().await;
        });

        info!(
            "Metrics reporter started (interval: {}s)",
            config.observability.interval_seconds
        );
    } else {
        info!("Metrics reporting disabled.");
    }

    let service = Arc::new(ForecastService::new(
        manager,
        metrics,
        config.service.clone(),
    ));

    info!("Serving on stdin/stdout. Close input or press Ctrl+C to shutdown.");

    tokio::select! {
        result = jsonl::serve(service, BufReader::new(tokio::io::stdin()), tokio::io::stdout()) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting...");
        }
    }

    Ok(())
}
