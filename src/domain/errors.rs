use thiserror::Error;

/// Errors raised by the feature builder and the model lifecycle.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Training dataset is empty")]
    EmptyDataset,

    #[error("Model is not trained")]
    ModelNotTrained,

    #[error("Estimator failure: {reason}")]
    Estimator { reason: String },

    #[error("Model state lock poisoned")]
    StatePoisoned,
}

impl ForecastError {
    pub fn estimator(reason: impl Into<String>) -> Self {
        Self::Estimator {
            reason: reason.into(),
        }
    }
}
