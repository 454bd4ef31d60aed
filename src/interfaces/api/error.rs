use crate::domain::errors::ForecastError;
use thiserror::Error;

/// Outcome of a rejected or failed request at the service boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Insufficient data for training")]
    InsufficientData { rows: usize, required: usize },

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("{0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InsufficientData { .. } => 400,
            ApiError::Validation { .. } => 422,
            ApiError::Unavailable(_) => 503,
            ApiError::Internal(_) => 500,
        }
    }
}

impl From<ForecastError> for ApiError {
    fn from(error: ForecastError) -> Self {
        match error {
            ForecastError::ModelNotTrained => ApiError::Unavailable(error.to_string()),
            ForecastError::EmptyDataset => ApiError::InsufficientData {
                rows: 0,
                required: 1,
            },
            other => ApiError::Internal(other.to_string()),
        }
    }
}
