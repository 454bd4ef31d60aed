use crate::domain::footfall::FeatureVector;

/// Ordered list of feature names.
/// Training matrices and inference rows are both laid out in this order.
/// Any change here is a breaking change for fitted models.
pub const FEATURE_NAMES: &[&str] = &[
    "location_id",
    "weather_severity_scaled",
    "holiday_multiplier",
    "weekend_encoded",
    "social_media_spike_index",
    "traffic_index",
    "rolling_mean_3h",
];

pub const FEATURE_COUNT: usize = 7;

/// Flattens a feature vector into estimator column order.
pub fn features_to_vector(fv: &FeatureVector) -> Vec<f64> {
    vec![
        fv.location_id,
        fv.weather_severity_scaled,
        fv.holiday_multiplier,
        fv.weekend_encoded,
        fv.social_media_spike_index,
        fv.traffic_index,
        fv.rolling_mean_3h,
    ]
}

/// Builds the row-major estimator matrix for a batch of feature vectors.
pub fn features_to_matrix(rows: &[FeatureVector]) -> Vec<Vec<f64>> {
    rows.iter().map(features_to_vector).collect()
}
