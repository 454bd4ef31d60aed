use super::dto::{
    HealthResponse, MetricsResponse, PredictResponse, RootResponse, TrainRequest, TrainResponse,
};
use super::error::ApiError;
use super::validation::{validate_prediction, validate_records};
use crate::application::ml::ModelManager;
use crate::config::ServiceEnvConfig;
use crate::domain::errors::ForecastError;
use crate::domain::footfall::PredictionRequest;
use crate::infrastructure::observability::Metrics;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, warn};

/// Request-level facade over the model lifecycle.
///
/// Enforces the boundary rules the core relies on (value ranges and the
/// minimum training volume) and keeps the service metrics current.
pub struct ForecastService {
    manager: Arc<ModelManager>,
    metrics: Metrics,
    settings: ServiceEnvConfig,
}

impl ForecastService {
    pub fn new(manager: Arc<ModelManager>, metrics: Metrics, settings: ServiceEnvConfig) -> Self {
        Self {
            manager,
            metrics,
            settings,
        }
    }

    pub fn manager(&self) -> &Arc<ModelManager> {
        &self.manager
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn root(&self) -> RootResponse {
        RootResponse {
            service: self.settings.service_name.clone(),
            status: "online".to_string(),
        }
    }

    pub fn health(&self) -> Result<HealthResponse, ApiError> {
        Ok(HealthResponse {
            status: "ok".to_string(),
            service: self.settings.service_name.clone(),
            model: self.manager.metadata()?,
        })
    }

    pub fn metrics_report(&self) -> MetricsResponse {
        MetricsResponse {
            content_type: "text/plain; version=0.0.4".to_string(),
            exposition: self.metrics.render(),
        }
    }

    /// Validate and train. Blocks for the duration of the fit.
    pub fn train(&self, request: TrainRequest) -> Result<TrainResponse, ApiError> {
        if let Err(e) = validate_records(&request.rows) {
            warn!("Rejected training request: {}", e);
            self.metrics.inc_trainings("rejected");
            return Err(e);
        }

        let rows = request.rows.len();
        if rows < self.settings.min_training_rows {
            warn!(
                "Rejected training request: {} rows < {} required",
                rows, self.settings.min_training_rows
            );
            self.metrics.inc_trainings("rejected");
            return Err(ApiError::InsufficientData {
                rows,
                required: self.settings.min_training_rows,
            });
        }

        match self.manager.train(&request.rows) {
            Ok(summary) => {
                self.metrics.inc_trainings("ok");
                self.metrics.training_samples.set(summary.samples as f64);
                Ok(TrainResponse::from(summary))
            }
            Err(e) => {
                error!("Training failed: {}", e);
                self.metrics.inc_trainings("failed");
                Err(e.into())
            }
        }
    }

    pub fn predict(&self, request: PredictionRequest) -> Result<PredictResponse, ApiError> {
        if let Err(e) = validate_prediction(&request) {
            warn!("Rejected prediction request: {}", e);
            self.metrics.inc_predictions("rejected");
            return Err(e);
        }

        let started = Instant::now();
        match self.manager.predict(&request) {
            Ok(prediction) => {
                self.metrics.inc_predictions("ok");
                self.metrics.observe_prediction(
                    started.elapsed().as_secs_f64(),
                    prediction.confidence_score,
                );
                Ok(PredictResponse::from(prediction))
            }
            Err(ForecastError::ModelNotTrained) => {
                self.metrics.inc_predictions("not_trained");
                Err(ForecastError::ModelNotTrained.into())
            }
            Err(e) => {
                error!("Prediction failed: {}", e);
                self.metrics.inc_predictions("failed");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::ForestParameters;
    use crate::domain::footfall::HistoricalRecord;
    use chrono::{Duration, TimeZone, Utc};

    fn service(min_training_rows: usize) -> ForecastService {
        let manager = Arc::new(ModelManager::with_parameters(ForestParameters {
            n_trees: 8,
            max_depth: 6,
            min_samples_leaf: 2,
            seed: 42,
        }));
        ForecastService::new(
            manager,
            Metrics::new().unwrap(),
            ServiceEnvConfig {
                min_training_rows,
                service_name: "tirpe-ai".to_string(),
            },
        )
    }

    fn rows(n: usize) -> Vec<HistoricalRecord> {
        let start = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| HistoricalRecord {
                timestamp: start + Duration::hours(i as i64),
                location_id: (i % 2) as u64 + 1,
                weather_score: (i % 10) as f64 / 10.0,
                holiday_flag: i % 6 == 0,
                weekend_flag: i % 4 == 0,
                social_media_spike_index: 0.3,
                traffic_index: 0.6,
                actual_footfall: 200.0 + (i % 10) as f64 * 5.0,
            })
            .collect()
    }

    fn request() -> PredictionRequest {
        PredictionRequest {
            location_id: 2,
            weather_score: 0.4,
            holiday_flag: false,
            weekend_flag: true,
            social_media_spike_index: 0.3,
            traffic_index: 0.6,
            rolling_mean: None,
        }
    }

    #[test]
    fn test_root_and_health() {
        let svc = service(10);
        assert_eq!(svc.root().status, "online");
        let health = svc.health().unwrap();
        assert_eq!(health.status, "ok");
        assert!(!health.model.ready);
    }

    #[test]
    fn test_insufficient_rows_rejected() {
        let svc = service(100);
        let err = svc.train(TrainRequest { rows: rows(20) }).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(!svc.manager().is_ready());
        assert_eq!(svc.metrics().trainings_count("rejected"), 1.0);
    }

    #[test]
    fn test_predict_untrained_is_503() {
        let svc = service(10);
        let err = svc.predict(request()).unwrap_err();
        assert_eq!(err.status_code(), 503);
        assert_eq!(err.to_string(), "Model is not trained");
    }

    #[test]
    fn test_train_and_predict() {
        let svc = service(10);
        let trained = svc.train(TrainRequest { rows: rows(40) }).unwrap();
        assert_eq!(trained.status, "trained");
        assert_eq!(trained.samples, 40);

        let prediction = svc.predict(request()).unwrap();
        assert!(prediction.predicted_footfall >= 0.0);
        assert!((0.15..=0.99).contains(&prediction.confidence_score));
        assert_eq!(prediction.model_version, trained.model_version);
        assert_eq!(svc.metrics().predictions_count("ok"), 1.0);
    }

    #[test]
    fn test_invalid_prediction_rejected_before_core() {
        let svc = service(10);
        let mut req = request();
        req.weather_score = 3.0;
        // Rejected as invalid even though the model is untrained.
        assert_eq!(svc.predict(req).unwrap_err().status_code(), 422);
    }
}
