use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type LocationId = u64;

/// Version tag prefixed to every trained snapshot identifier.
pub const MODEL_SCHEME: &str = "rf-v1";

/// Version reported while no model has been trained.
pub const UNTRAINED_VERSION: &str = "untrained";

/// One labelled observation used for training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    pub location_id: LocationId,
    pub weather_score: f64,
    pub holiday_flag: bool,
    pub weekend_flag: bool,
    pub social_media_spike_index: f64,
    pub traffic_index: f64,
    pub actual_footfall: f64,
}

impl HistoricalRecord {
    pub fn signals(&self) -> ContextSignals {
        ContextSignals {
            location_id: self.location_id,
            weather_score: self.weather_score,
            holiday_flag: self.holiday_flag,
            weekend_flag: self.weekend_flag,
            social_media_spike_index: self.social_media_spike_index,
            traffic_index: self.traffic_index,
        }
    }
}

/// Inference payload. `rolling_mean` overrides the stored trend baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub location_id: LocationId,
    pub weather_score: f64,
    pub holiday_flag: bool,
    pub weekend_flag: bool,
    pub social_media_spike_index: f64,
    pub traffic_index: f64,
    #[serde(default)]
    pub rolling_mean: Option<f64>,
}

impl PredictionRequest {
    pub fn signals(&self) -> ContextSignals {
        ContextSignals {
            location_id: self.location_id,
            weather_score: self.weather_score,
            holiday_flag: self.holiday_flag,
            weekend_flag: self.weekend_flag,
            social_media_spike_index: self.social_media_spike_index,
            traffic_index: self.traffic_index,
        }
    }
}

/// The raw contextual inputs shared by training rows and prediction
/// requests. Both paths engineer features from this view only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextSignals {
    pub location_id: LocationId,
    pub weather_score: f64,
    pub holiday_flag: bool,
    pub weekend_flag: bool,
    pub social_media_spike_index: f64,
    pub traffic_index: f64,
}

/// Engineered model input. Column order lives in
/// [`crate::domain::ml::feature_registry::FEATURE_NAMES`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub location_id: f64,
    pub weather_severity_scaled: f64,
    pub holiday_multiplier: f64,
    pub weekend_encoded: f64,
    pub social_media_spike_index: f64,
    pub traffic_index: f64,
    pub rolling_mean_3h: f64,
}

/// Provenance of the snapshot currently being served.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMetadata {
    pub trained_at: DateTime<Utc>,
    pub samples: usize,
    pub model_version: String,
}

impl ModelMetadata {
    pub fn new(trained_at: DateTime<Utc>, samples: usize) -> Self {
        Self {
            trained_at,
            samples,
            model_version: format!("{}-{}", MODEL_SCHEME, trained_at.to_rfc3339()),
        }
    }
}

/// Read-only view of the lifecycle state, as reported by health checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStatus {
    pub trained_at: Option<String>,
    pub samples: usize,
    pub model_version: String,
    pub ready: bool,
}

impl ModelStatus {
    pub fn untrained() -> Self {
        Self {
            trained_at: None,
            samples: 0,
            model_version: UNTRAINED_VERSION.to_string(),
            ready: false,
        }
    }
}

impl From<&ModelMetadata> for ModelStatus {
    fn from(metadata: &ModelMetadata) -> Self {
        Self {
            trained_at: Some(metadata.trained_at.to_rfc3339()),
            samples: metadata.samples,
            model_version: metadata.model_version.clone(),
            ready: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainSummary {
    pub trained: bool,
    pub samples: usize,
    pub model_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_footfall: f64,
    pub confidence_score: f64,
    pub model_version: String,
}
