//! Footfall forecast CLI.
//!
//! Trains a model from a CSV of historical observations and optionally
//! scores a single request with it. Models are not persisted, so `predict`
//! retrains from `--input` on every run.
//!
//! # Usage
//! ```sh
//! cargo run -- train --input data/footfall.csv
//! cargo run -- predict --input data/footfall.csv \
//!     --payload '{"location_id":1,"weather_score":0.4,"holiday_flag":false,"weekend_flag":true,"social_media_spike_index":0.2,"traffic_index":0.6}'
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use footfall_forecast::application::ml::ModelManager;
use footfall_forecast::config::Config;
use footfall_forecast::domain::footfall::PredictionRequest;
use footfall_forecast::infrastructure::load_historical_records;
use footfall_forecast::infrastructure::observability::Metrics;
use footfall_forecast::interfaces::api::{ForecastService, TrainRequest, TrainResponse};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train on a CSV dataset and print the resulting model metadata
    Train {
        /// Path to training data CSV
        #[arg(long, default_value = "data/footfall.csv")]
        input: PathBuf,
    },
    /// Train on a CSV dataset, then score one JSON prediction payload
    Predict {
        /// Path to training data CSV
        #[arg(long, default_value = "data/footfall.csv")]
        input: PathBuf,

        /// Prediction request as JSON
        #[arg(long)]
        payload: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries the JSON results.
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    info!(
        "Forest: {} trees, depth {}, min leaf {}, seed {}",
        config.forest.n_trees,
        config.forest.max_depth,
        config.forest.min_samples_leaf,
        config.forest.seed
    );

    let manager = Arc::new(ModelManager::with_parameters(config.forest_parameters()));
    let service = ForecastService::new(manager, Metrics::new()?, config.service.clone());

    match args.command {
        Command::Train { input } => {
            let trained = train(&service, &input)?;
            println!("{}", serde_json::to_string_pretty(&trained)?);
            let health = service.health()?;
            println!("{}", serde_json::to_string_pretty(&health.model)?);
        }
        Command::Predict { input, payload } => {
            let request: PredictionRequest =
                serde_json::from_str(&payload).context("Invalid prediction payload")?;
            train(&service, &input)?;
            let prediction = service.predict(request)?;
            println!("{}", serde_json::to_string_pretty(&prediction)?);
        }
    }

    Ok(())
}

fn train(service: &ForecastService, input: &Path) -> Result<TrainResponse> {
    let rows = load_historical_records(input)?;
    let trained = service.train(TrainRequest { rows })?;
    info!(
        "Trained {} on {} samples",
        trained.model_version, trained.samples
    );
    Ok(trained)
}
