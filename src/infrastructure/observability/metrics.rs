//! Prometheus metrics definitions for the footfall forecast service
//!
//! All metrics use the `footfall_` prefix and are read-only.

use prometheus::{
    CounterVec, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

/// Prometheus metrics for training and serving
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Training attempts by outcome
    pub trainings_total: CounterVec,
    /// Prediction requests by outcome
    pub predictions_total: CounterVec,
    /// Time spent producing a prediction
    pub prediction_latency_seconds: Histogram,
    /// Distribution of reported confidence scores
    pub confidence_score: Histogram,
    /// Row count of the model currently served
    pub training_samples: GenericGauge<AtomicF64>,
    /// Uptime in seconds
    pub uptime_seconds: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let trainings_total = CounterVec::new(
            Opts::new("footfall_trainings_total", "Training attempts by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(trainings_total.clone()))?;

        let predictions_total = CounterVec::new(
            Opts::new("footfall_predictions_total", "Prediction requests by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let prediction_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "footfall_prediction_latency_seconds",
                "Prediction latency in seconds",
            )
            .buckets(vec![
                0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25,
            ]),
        )?;
        registry.register(Box::new(prediction_latency_seconds.clone()))?;

        let confidence_score = Histogram::with_opts(
            HistogramOpts::new(
                "footfall_confidence_score",
                "Reported confidence scores (0.15-0.99)",
            )
            .buckets(vec![0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 0.95, 0.99]),
        )?;
        registry.register(Box::new(confidence_score.clone()))?;

        let training_samples = Gauge::with_opts(Opts::new(
            "footfall_training_samples",
            "Rows used to train the served model",
        ))?;
        registry.register(Box::new(training_samples.clone()))?;

        let uptime_seconds = Gauge::with_opts(Opts::new(
            "footfall_uptime_seconds",
            "Server uptime in seconds",
        ))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            trainings_total,
            predictions_total,
            prediction_latency_seconds,
            confidence_score,
            training_samples,
            uptime_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_trainings(&self, outcome: &str) {
        self.trainings_total.with_label_values(&[outcome]).inc();
    }

    pub fn inc_predictions(&self, outcome: &str) {
        self.predictions_total.with_label_values(&[outcome]).inc();
    }

    pub fn predictions_count(&self, outcome: &str) -> f64 {
        self.predictions_total.with_label_values(&[outcome]).get()
    }

    pub fn trainings_count(&self, outcome: &str) -> f64 {
        self.trainings_total.with_label_values(&[outcome]).get()
    }

    /// Record a served prediction
    pub fn observe_prediction(&self, latency: f64, confidence: f64) {
        self.prediction_latency_seconds.observe(latency);
        self.confidence_score.observe(confidence);
    }
}
