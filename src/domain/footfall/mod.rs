//! Footfall domain: raw observations, engineered features and the
//! per-location trend baselines captured at training time.

pub mod baseline;
pub mod timestamp;
pub mod types;

pub use baseline::BaselineState;
pub use types::{
    ContextSignals, FeatureVector, HistoricalRecord, LocationId, ModelMetadata, ModelStatus,
    Prediction, PredictionRequest, TrainSummary,
};
