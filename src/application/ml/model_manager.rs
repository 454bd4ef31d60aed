//! Model lifecycle: train, atomically swap, serve.
//!
//! The served state is a single immutable [`TrainedModel`] snapshot holding
//! the fitted ensemble, the baselines captured from the same training set
//! and the metadata describing it. Training builds a complete replacement
//! outside the lock and then swaps the pointer; a failed training attempt
//! leaves the previous snapshot untouched.

use super::confidence::{confidence_score, ensemble_spread, round_to};
use super::forest::{ForestParameters, SmartCoreForestTrainer};
use crate::application::feature_engineering::{build_predict_features, build_training_features};
use crate::domain::errors::ForecastError;
use crate::domain::footfall::{
    BaselineState, HistoricalRecord, ModelMetadata, ModelStatus, Prediction, PredictionRequest,
    TrainSummary,
};
use crate::domain::ml::estimator::{EnsembleTrainer, TreeEnsemble};
use crate::domain::ml::feature_registry::features_to_vector;
use chrono::Utc;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// A fitted ensemble together with the baselines and metadata of the
/// training run that produced it. Never mutated after construction.
pub struct TrainedModel {
    ensemble: Box<dyn TreeEnsemble>,
    baselines: BaselineState,
    metadata: ModelMetadata,
}

impl TrainedModel {
    pub fn baselines(&self) -> &BaselineState {
        &self.baselines
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    fn predict(&self, request: &PredictionRequest) -> Result<Prediction, ForecastError> {
        let inference = build_predict_features(request, &self.baselines);
        let row = features_to_vector(&inference.features);

        let prediction = self.ensemble.predict(&row)?;
        let members = self.ensemble.member_predictions(&row)?;
        let std_dev = ensemble_spread(&members);
        let confidence = confidence_score(prediction, std_dev);

        debug!(
            "Location {}: raw={:.3} std={:.3} rolling_mean={:.2} members={}",
            request.location_id,
            prediction,
            std_dev,
            inference.rolling_mean,
            members.len()
        );

        Ok(Prediction {
            predicted_footfall: round_to(prediction.max(0.0), 2),
            confidence_score: round_to(confidence, 4),
            model_version: self.metadata.model_version.clone(),
        })
    }
}

/// Owns the current [`TrainedModel`] and serialises access to it.
///
/// `predict` and `metadata` hold the read lock while they compute, so a
/// response is always derived from one snapshot. `train` only takes the
/// write lock for the swap.
pub struct ModelManager {
    trainer: Box<dyn EnsembleTrainer>,
    current: RwLock<Option<Arc<TrainedModel>>>,
}

impl ModelManager {
    pub fn new(trainer: Box<dyn EnsembleTrainer>) -> Self {
        Self {
            trainer,
            current: RwLock::new(None),
        }
    }

    pub fn with_parameters(params: ForestParameters) -> Self {
        Self::new(Box::new(SmartCoreForestTrainer::new(params)))
    }

    /// Fit a new model on `rows` and make it the served snapshot.
    ///
    /// The minimum training volume is enforced by the caller.
    pub fn train(&self, rows: &[HistoricalRecord]) -> Result<TrainSummary, ForecastError> {
        info!(
            "Training {} on {} rows",
            self.trainer.name(),
            rows.len()
        );

        let artifacts = build_training_features(rows)?;
        let ensemble = self.trainer.fit(&artifacts.matrix(), &artifacts.targets)?;

        let summary = {
            let mut guard = self
                .current
                .write()
                .map_err(|_| ForecastError::StatePoisoned)?;
            // Stamped under the guard so the last swap carries the latest version.
            let metadata = ModelMetadata::new(Utc::now(), rows.len());
            let summary = TrainSummary {
                trained: true,
                samples: metadata.samples,
                model_version: metadata.model_version.clone(),
            };
            *guard = Some(Arc::new(TrainedModel {
                ensemble,
                baselines: artifacts.baselines,
                metadata,
            }));
            summary
        };

        info!(
            "Model {} ready ({} samples)",
            summary.model_version, summary.samples
        );
        Ok(summary)
    }

    /// Predict footfall for `request` with the current snapshot.
    pub fn predict(&self, request: &PredictionRequest) -> Result<Prediction, ForecastError> {
        let guard = self
            .current
            .read()
            .map_err(|_| ForecastError::StatePoisoned)?;
        let model = guard.as_ref().ok_or(ForecastError::ModelNotTrained)?;
        model.predict(request)
    }

    pub fn metadata(&self) -> Result<ModelStatus, ForecastError> {
        let guard = self
            .current
            .read()
            .map_err(|_| ForecastError::StatePoisoned)?;
        Ok(guard
            .as_ref()
            .map(|model| ModelStatus::from(&model.metadata))
            .unwrap_or_else(ModelStatus::untrained))
    }

    pub fn is_ready(&self) -> bool {
        self.current
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Handle to the snapshot currently being served, if any.
    pub fn snapshot(&self) -> Result<Option<Arc<TrainedModel>>, ForecastError> {
        let guard = self
            .current
            .read()
            .map_err(|_| ForecastError::StatePoisoned)?;
        Ok(guard.clone())
    }
}

impl Default for ModelManager {
    fn default() -> Self {
        Self::with_parameters(ForestParameters::default())
    }
}
