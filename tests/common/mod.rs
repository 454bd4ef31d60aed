#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use footfall_forecast::application::ml::{ForestParameters, ModelManager};
use footfall_forecast::domain::footfall::{HistoricalRecord, LocationId, PredictionRequest};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn small_forest() -> ForestParameters {
    ForestParameters {
        n_trees: 24,
        max_depth: 8,
        min_samples_leaf: 2,
        seed: 42,
    }
}

pub fn manager() -> ModelManager {
    ModelManager::with_parameters(small_forest())
}

/// Hourly observations for `locations` sites with footfall driven by
/// weather, holidays, weekends and traffic.
pub fn synthetic_rows(locations: LocationId, hours: usize, seed: u64) -> Vec<HistoricalRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
    let mut rows = Vec::with_capacity(locations as usize * hours);

    for hour in 0..hours {
        for location_id in 1..=locations {
            let weather_score: f64 = rng.random_range(0.0..=1.0);
            let traffic_index: f64 = rng.random_range(0.0..=1.0);
            let social_media_spike_index: f64 = rng.random_range(0.0..=1.0);
            let holiday_flag = rng.random_bool(0.1);
            let weekend_flag = (hour / 24) % 7 >= 5;

            let base = 80.0 * location_id as f64;
            let mut footfall = base * (1.0 + traffic_index) * (1.2 - 0.6 * weather_score);
            if holiday_flag {
                footfall *= 1.4;
            }
            if weekend_flag {
                footfall *= 1.2;
            }
            footfall += 40.0 * social_media_spike_index;

            rows.push(HistoricalRecord {
                timestamp: start + Duration::hours(hour as i64),
                location_id,
                weather_score,
                holiday_flag,
                weekend_flag,
                social_media_spike_index,
                traffic_index,
                actual_footfall: footfall.max(0.0),
            });
        }
    }

    rows
}

pub fn request(location_id: LocationId) -> PredictionRequest {
    PredictionRequest {
        location_id,
        weather_score: 0.35,
        holiday_flag: false,
        weekend_flag: true,
        social_media_spike_index: 0.5,
        traffic_index: 0.7,
        rolling_mean: None,
    }
}
