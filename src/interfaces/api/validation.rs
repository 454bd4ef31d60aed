//! Range checks applied before requests reach the forecast core.
//!
//! The core assumes every score lies in `[0, 1]`, footfall and trend
//! overrides are non-negative and location ids start at 1.

use super::error::ApiError;
use crate::domain::footfall::{HistoricalRecord, LocationId, PredictionRequest};

fn unit_interval(field: &str, value: f64) -> Result<(), ApiError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ApiError::validation(
            field,
            format!("{} must be between 0 and 1", value),
        ))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ApiError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ApiError::validation(
            field,
            format!("{} must be a non-negative number", value),
        ))
    }
}

fn location(field: &str, location_id: LocationId) -> Result<(), ApiError> {
    if location_id >= 1 {
        Ok(())
    } else {
        Err(ApiError::validation(field, "location_id must be at least 1"))
    }
}

pub fn validate_record(index: usize, record: &HistoricalRecord) -> Result<(), ApiError> {
    let field = |name: &str| format!("rows[{}].{}", index, name);
    location(&field("location_id"), record.location_id)?;
    unit_interval(&field("weather_score"), record.weather_score)?;
    unit_interval(
        &field("social_media_spike_index"),
        record.social_media_spike_index,
    )?;
    unit_interval(&field("traffic_index"), record.traffic_index)?;
    non_negative(&field("actual_footfall"), record.actual_footfall)
}

pub fn validate_records(rows: &[HistoricalRecord]) -> Result<(), ApiError> {
    rows.iter()
        .enumerate()
        .try_for_each(|(index, record)| validate_record(index, record))
}

pub fn validate_prediction(request: &PredictionRequest) -> Result<(), ApiError> {
    location("location_id", request.location_id)?;
    unit_interval("weather_score", request.weather_score)?;
    unit_interval("social_media_spike_index", request.social_media_spike_index)?;
    unit_interval("traffic_index", request.traffic_index)?;
    if let Some(rolling_mean) = request.rolling_mean {
        non_negative("rolling_mean", rolling_mean)?;
    }
    Ok(())
}
