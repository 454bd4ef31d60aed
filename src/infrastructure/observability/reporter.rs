//! Push-based metrics reporter
//!
//! Periodically emits a structured JSON snapshot through `tracing`.
//! Stdout is left alone so it can carry the request/response stream.

use crate::application::ml::ModelManager;
use crate::config::MIN_INTERVAL_SECONDS;
use crate::domain::footfall::ModelStatus;
use crate::infrastructure::observability::metrics::Metrics;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Metrics snapshot for JSON output
#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub model: ModelStatus,
    pub predictions_served: f64,
    pub predictions_rejected: f64,
    pub trainings_completed: f64,
}

/// Push-based metrics reporter
///
/// Outputs metrics as structured JSON logs on a configurable interval.
/// No HTTP server, no incoming connections - only outbound data.
pub struct MetricsReporter {
    manager: Arc<ModelManager>,
    metrics: Metrics,
    start_time: Instant,
    interval: Duration,
}

impl MetricsReporter {
    /// Create a new metrics reporter
    ///
    /// # Arguments
    /// * `manager` - Shared model lifecycle
    /// * `metrics` - Prometheus metrics (for internal tracking)
    /// * `interval_seconds` - How often to output metrics (default: 60)
    pub fn new(manager: Arc<ModelManager>, metrics: Metrics, interval_seconds: u64) -> Self {
        Self {
            manager,
            metrics,
            start_time: Instant::now(),
            interval: Duration::from_secs(interval_seconds.max(MIN_INTERVAL_SECONDS)),
        }
    }

    /// Run the reporter in a loop, outputting metrics periodically
    pub async fn run(self) {
        info!(
            "MetricsReporter: Starting push-based metrics (interval: {:?})",
            self.interval
        );

        loop {
            tokio::time::sleep(self.interval).await;

            match self.collect_snapshot() {
                Ok(snapshot) => match serde_json::to_string(&snapshot) {
                    Ok(json) => {
                        info!(target: "metrics", "METRICS_JSON:{}", json);
                    }
                    Err(e) => warn!("Failed to serialize metrics: {}", e),
                },
                Err(e) => warn!("Failed to collect metrics: {}", e),
            }
        }
    }

    /// Collect current metrics snapshot
    fn collect_snapshot(&self) -> anyhow::Result<MetricsSnapshot> {
        let model = self.manager.metadata()?;
        let uptime = self.start_time.elapsed().as_secs();

        self.metrics.uptime_seconds.set(uptime as f64);

        Ok(MetricsSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_seconds: uptime,
            version: env!("CARGO_PKG_VERSION").to_string(),
            model,
            predictions_served: self.metrics.predictions_count("ok"),
            predictions_rejected: self.metrics.predictions_count("rejected"),
            trainings_completed: self.metrics.trainings_count("ok"),
        })
    }
}
