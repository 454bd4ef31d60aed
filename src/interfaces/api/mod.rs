//! Service boundary for the forecast core.
//!
//! Decodes and validates requests, invokes the model lifecycle and maps the
//! outcome to a status code and a serialisable body.

pub mod dto;
pub mod error;
pub mod service;
pub mod validation;

pub use dto::{
    ErrorBody, HealthResponse, MetricsResponse, PredictResponse, RootResponse, TrainRequest,
    TrainResponse,
};
pub use error::ApiError;
pub use service::ForecastService;
