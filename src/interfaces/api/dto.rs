use crate::domain::footfall::{HistoricalRecord, ModelStatus, Prediction, TrainSummary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainRequest {
    pub rows: Vec<HistoricalRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainResponse {
    pub status: String,
    pub trained: bool,
    pub samples: usize,
    pub model_version: String,
}

impl From<TrainSummary> for TrainResponse {
    fn from(summary: TrainSummary) -> Self {
        Self {
            status: "trained".to_string(),
            trained: summary.trained,
            samples: summary.samples,
            model_version: summary.model_version,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predicted_footfall: f64,
    pub confidence_score: f64,
    pub model_version: String,
}

impl From<Prediction> for PredictResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            predicted_footfall: prediction.predicted_footfall,
            confidence_score: prediction.confidence_score,
            model_version: prediction.model_version,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub model: ModelStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootResponse {
    pub service: String,
    pub status: String,
}

/// Prometheus text exposition of the service metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub content_type: String,
    pub exposition: String,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
