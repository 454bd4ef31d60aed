//! Feature engineering for footfall forecasting
//!
//! This module turns raw observations into estimator rows:
//! - Weather severity scaling and holiday multipliers
//! - Lagged 3-step rolling mean of footfall per location
//! - Trend baselines captured at training time for use at serving time
//!
//! Training and inference both go through [`engineer`], so a feature vector
//! built for a prediction request is laid out and transformed exactly like
//! the rows the estimator was fitted on.

use crate::domain::errors::ForecastError;
use crate::domain::footfall::{
    BaselineState, ContextSignals, FeatureVector, HistoricalRecord, LocationId, PredictionRequest,
};
use crate::domain::ml::feature_registry::features_to_matrix;
use statrs::statistics::Statistics;
use std::collections::{BTreeMap, VecDeque};

/// Exponent applied to the weather score. Values > 1 flatten mild weather
/// and keep severe weather near the top of the range.
pub const WEATHER_EXPONENT: f64 = 1.3;

pub const HOLIDAY_MULTIPLIER: f64 = 1.25;

/// Number of prior observations averaged into `rolling_mean_3h`.
pub const ROLLING_WINDOW: usize = 3;

/// Output of the bulk (training) path.
#[derive(Debug, Clone)]
pub struct TrainingArtifacts {
    /// Feature rows, sorted by location then timestamp.
    pub features: Vec<FeatureVector>,
    /// Targets aligned index-for-index with `features`.
    pub targets: Vec<f64>,
    pub baselines: BaselineState,
}

impl TrainingArtifacts {
    /// Row-major matrix in registry column order.
    pub fn matrix(&self) -> Vec<Vec<f64>> {
        features_to_matrix(&self.features)
    }
}

/// Output of the single-record (inference) path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferenceFeatures {
    pub features: FeatureVector,
    /// The trend value that was actually used for `rolling_mean_3h`.
    pub rolling_mean: f64,
}

pub fn scale_weather(weather_score: f64) -> f64 {
    weather_score.powf(WEATHER_EXPONENT)
}

pub fn scale_weather_all(weather_scores: &[f64]) -> Vec<f64> {
    weather_scores.iter().copied().map(scale_weather).collect()
}

pub fn holiday_multiplier(holiday_flag: bool) -> f64 {
    if holiday_flag { HOLIDAY_MULTIPLIER } else { 1.0 }
}

pub fn holiday_multipliers(holiday_flags: &[bool]) -> Vec<f64> {
    holiday_flags.iter().copied().map(holiday_multiplier).collect()
}

/// Applies the shared transforms to one set of contextual signals.
fn engineer(signals: &ContextSignals, rolling_mean_3h: f64) -> FeatureVector {
    FeatureVector {
        location_id: signals.location_id as f64,
        weather_severity_scaled: scale_weather(signals.weather_score),
        holiday_multiplier: holiday_multiplier(signals.holiday_flag),
        weekend_encoded: if signals.weekend_flag { 1.0 } else { 0.0 },
        social_media_spike_index: signals.social_media_spike_index,
        traffic_index: signals.traffic_index,
        rolling_mean_3h,
    }
}

/// Build the training matrix, targets and trend baselines.
///
/// Records are ordered by location and then timestamp before any rolling
/// statistic is computed. `rolling_mean_3h` for a record only looks at the
/// labels of earlier records at the same location. Records without any
/// prior fall back to their location mean, then to the global mean.
///
/// # Returns
/// * `Ok(TrainingArtifacts)` - rows, aligned targets and baselines
/// * `Err(ForecastError::EmptyDataset)` - if `rows` is empty
pub fn build_training_features(
    rows: &[HistoricalRecord],
) -> Result<TrainingArtifacts, ForecastError> {
    if rows.is_empty() {
        return Err(ForecastError::EmptyDataset);
    }

    let mut sorted: Vec<&HistoricalRecord> = rows.iter().collect();
    sorted.sort_by(|a, b| {
        a.location_id
            .cmp(&b.location_id)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });

    let global_mean = sorted.iter().map(|r| r.actual_footfall).mean();
    let location_means = location_means(&sorted);
    let lagged = lagged_rolling_means(&sorted, ROLLING_WINDOW);

    let mut features = Vec::with_capacity(sorted.len());
    let mut targets = Vec::with_capacity(sorted.len());
    let mut by_location = BTreeMap::new();

    for (record, prior_mean) in sorted.iter().zip(lagged) {
        // Known approximation: the location mean includes this record's own label.
        let rolling_mean_3h = prior_mean
            .or_else(|| {
                location_means
                    .get(&record.location_id)
                    .copied()
                    .filter(|m| m.is_finite())
            })
            .unwrap_or(global_mean);

        features.push(engineer(&record.signals(), rolling_mean_3h));
        targets.push(record.actual_footfall);

        // Sorted by location, so the last insert per key is the most recent.
        let baseline = if rolling_mean_3h.is_finite() {
            rolling_mean_3h
        } else {
            global_mean
        };
        by_location.insert(record.location_id, baseline);
    }

    Ok(TrainingArtifacts {
        features,
        targets,
        baselines: BaselineState::new(by_location, global_mean),
    })
}

/// Build the single inference row for `request`.
///
/// The trend value is taken from the request when present, otherwise from
/// the stored baseline of the location, otherwise from the global baseline.
pub fn build_predict_features(
    request: &PredictionRequest,
    baselines: &BaselineState,
) -> InferenceFeatures {
    let rolling_mean = request
        .rolling_mean
        .unwrap_or_else(|| baselines.resolve(request.location_id));

    InferenceFeatures {
        features: engineer(&request.signals(), rolling_mean),
        rolling_mean,
    }
}

fn location_means(sorted: &[&HistoricalRecord]) -> BTreeMap<LocationId, f64> {
    let mut totals: BTreeMap<LocationId, (f64, usize)> = BTreeMap::new();
    for record in sorted {
        let entry = totals.entry(record.location_id).or_insert((0.0, 0));
        entry.0 += record.actual_footfall;
        entry.1 += 1;
    }
    totals
        .into_iter()
        .map(|(location, (sum, count))| (location, sum / count as f64))
        .collect()
}

/// Mean of up to `window` preceding labels within the same location.
/// `None` for the first record of every location.
fn lagged_rolling_means(sorted: &[&HistoricalRecord], window: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(sorted.len());
    let mut history: VecDeque<f64> = VecDeque::with_capacity(window);
    let mut current: Option<LocationId> = None;

    for record in sorted {
        if current != Some(record.location_id) {
            history.clear();
            current = Some(record.location_id);
        }

        out.push(if history.is_empty() {
            None
        } else {
            Some(history.iter().sum::<f64>() / history.len() as f64)
        });

        if history.len() == window {
            history.pop_front();
        }
        history.push_back(record.actual_footfall);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ml::feature_registry::FEATURE_COUNT;
    use chrono::{Duration, TimeZone, Utc};

    fn record(location_id: LocationId, hour: i64, footfall: f64) -> HistoricalRecord {
        HistoricalRecord {
            timestamp: Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap() + Duration::hours(hour),
            location_id,
            weather_score: 0.5,
            holiday_flag: false,
            weekend_flag: true,
            social_media_spike_index: 0.2,
            traffic_index: 0.4,
            actual_footfall: footfall,
        }
    }

    fn request(location_id: LocationId, rolling_mean: Option<f64>) -> PredictionRequest {
        PredictionRequest {
            location_id,
            weather_score: 0.5,
            holiday_flag: true,
            weekend_flag: false,
            social_media_spike_index: 0.2,
            traffic_index: 0.4,
            rolling_mean,
        }
    }

    #[test]
    fn test_scale_weather() {
        assert_eq!(scale_weather(1.0), 1.0);
        assert_eq!(scale_weather(0.0), 0.0);
        assert!((scale_weather(0.5) - 0.4061).abs() < 1e-4);
    }

    #[test]
    fn test_transforms_are_pure() {
        assert_eq!(scale_weather(0.37), scale_weather(0.37));
        assert_eq!(holiday_multiplier(true), holiday_multiplier(true));
        assert_eq!(scale_weather_all(&[0.5, 1.0]), vec![scale_weather(0.5), 1.0]);
    }

    #[test]
    fn test_holiday_multiplier() {
        assert_eq!(holiday_multiplier(true), 1.25);
        assert_eq!(holiday_multiplier(false), 1.0);
        assert_eq!(holiday_multipliers(&[true, false]), vec![1.25, 1.0]);
    }

    #[test]
    fn test_empty_dataset_rejected() {
        assert!(matches!(
            build_training_features(&[]),
            Err(ForecastError::EmptyDataset)
        ));
    }

    #[test]
    fn test_rolling_mean_uses_only_prior_labels() {
        // Shuffled input: sorting must restore temporal order.
        let rows = vec![record(1, 2, 110.0), record(1, 0, 100.0), record(1, 1, 120.0)];
        let artifacts = build_training_features(&rows).unwrap();

        let rolling: Vec<f64> = artifacts
            .features
            .iter()
            .map(|f| f.rolling_mean_3h)
            .collect();
        // t0 has no prior and falls back to the location mean (110).
        assert_eq!(rolling, vec![110.0, 100.0, 110.0]);
        assert_eq!(artifacts.targets, vec![100.0, 120.0, 110.0]);
    }

    #[test]
    fn test_rolling_window_caps_at_three_priors() {
        let rows: Vec<_> = [10.0, 20.0, 30.0, 40.0, 50.0]
            .iter()
            .enumerate()
            .map(|(i, f)| record(2, i as i64, *f))
            .collect();
        let artifacts = build_training_features(&rows).unwrap();

        // Record 4 sees 20, 30, 40 only.
        assert_eq!(artifacts.features[4].rolling_mean_3h, 30.0);
        // Record 3 sees 10, 20, 30.
        assert_eq!(artifacts.features[3].rolling_mean_3h, 20.0);
    }

    #[test]
    fn test_own_label_does_not_leak() {
        let base = vec![record(1, 0, 100.0), record(1, 1, 120.0), record(1, 2, 110.0)];
        let mut changed = base.clone();
        changed[1].actual_footfall = 999.0;

        let a = build_training_features(&base).unwrap();
        let b = build_training_features(&changed).unwrap();

        assert_eq!(a.features[1].rolling_mean_3h, b.features[1].rolling_mean_3h);
        assert_ne!(a.features[2].rolling_mean_3h, b.features[2].rolling_mean_3h);
    }

    #[test]
    fn test_locations_do_not_share_history() {
        let rows = vec![
            record(1, 0, 100.0),
            record(1, 1, 200.0),
            record(2, 2, 10.0),
            record(2, 3, 30.0),
        ];
        let artifacts = build_training_features(&rows).unwrap();

        // First row of location 2 falls back to its own mean (20), not location 1.
        assert_eq!(artifacts.features[2].rolling_mean_3h, 20.0);
        assert_eq!(artifacts.features[3].rolling_mean_3h, 10.0);
    }

    #[test]
    fn test_matrix_shape_and_alignment() {
        let rows = vec![record(3, 0, 5.0), record(1, 0, 7.0), record(3, 1, 9.0)];
        let artifacts = build_training_features(&rows).unwrap();
        let matrix = artifacts.matrix();

        assert_eq!(matrix.len(), artifacts.targets.len());
        assert!(matrix.iter().all(|row| row.len() == FEATURE_COUNT));
        // Sorted by location first.
        assert_eq!(matrix[0][0], 1.0);
        assert_eq!(artifacts.targets[0], 7.0);
    }

    #[test]
    fn test_baselines_cover_exactly_training_locations() {
        let rows = vec![
            record(5, 0, 50.0),
            record(2, 0, 20.0),
            record(5, 1, 70.0),
            record(9, 0, 90.0),
        ];
        let artifacts = build_training_features(&rows).unwrap();

        let locations: Vec<_> = artifacts.baselines.locations().collect();
        assert_eq!(locations, vec![2, 5, 9]);
        // Last rolling value for location 5 is the lagged mean of [50].
        assert_eq!(artifacts.baselines.for_location(5), Some(50.0));
        assert_eq!(artifacts.baselines.global(), 57.5);
    }

    #[test]
    fn test_single_sample_location_baseline_is_its_own_mean() {
        let artifacts = build_training_features(&[record(4, 0, 42.0)]).unwrap();
        assert_eq!(artifacts.features[0].rolling_mean_3h, 42.0);
        assert_eq!(artifacts.baselines.for_location(4), Some(42.0));
    }

    #[test]
    fn test_encoded_columns() {
        let mut row = record(1, 0, 10.0);
        row.holiday_flag = true;
        row.weekend_flag = false;
        row.weather_score = 1.0;
        let artifacts = build_training_features(&[row]).unwrap();
        let fv = artifacts.features[0];

        assert_eq!(fv.holiday_multiplier, 1.25);
        assert_eq!(fv.weekend_encoded, 0.0);
        assert_eq!(fv.weather_severity_scaled, 1.0);
    }

    #[test]
    fn test_explicit_rolling_mean_wins() {
        let artifacts = build_training_features(&[record(1, 0, 100.0), record(1, 1, 300.0)])
            .unwrap();
        let inference = build_predict_features(&request(1, Some(50.0)), &artifacts.baselines);

        assert_eq!(inference.rolling_mean, 50.0);
        assert_eq!(inference.features.rolling_mean_3h, 50.0);
    }

    #[test]
    fn test_stored_baseline_used_for_known_location() {
        let artifacts = build_training_features(&[record(1, 0, 100.0), record(1, 1, 300.0)])
            .unwrap();
        let inference = build_predict_features(&request(1, None), &artifacts.baselines);
        assert_eq!(inference.rolling_mean, 100.0);
    }

    #[test]
    fn test_unseen_location_uses_global_baseline() {
        let artifacts = build_training_features(&[record(1, 0, 100.0), record(1, 1, 300.0)])
            .unwrap();
        let inference = build_predict_features(&request(77, None), &artifacts.baselines);

        assert_eq!(inference.rolling_mean, 200.0);
        assert_eq!(inference.features.location_id, 77.0);
    }

    #[test]
    fn test_training_and_inference_share_transforms() {
        let row = record(6, 0, 80.0);
        let artifacts = build_training_features(std::slice::from_ref(&row)).unwrap();
        let req = PredictionRequest {
            location_id: row.location_id,
            weather_score: row.weather_score,
            holiday_flag: row.holiday_flag,
            weekend_flag: row.weekend_flag,
            social_media_spike_index: row.social_media_spike_index,
            traffic_index: row.traffic_index,
            rolling_mean: None,
        };
        let inference = build_predict_features(&req, &artifacts.baselines);

        assert_eq!(inference.features, artifacts.features[0]);
    }
}
