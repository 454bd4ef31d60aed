//! Confidence scoring from ensemble disagreement.
//!
//! The spread of per-tree estimates, relative to the size of the point
//! estimate, is mapped to a score in `[MIN_CONFIDENCE, MAX_CONFIDENCE]`.

use statrs::statistics::Statistics;

pub const MIN_CONFIDENCE: f64 = 0.15;
pub const MAX_CONFIDENCE: f64 = 0.99;

/// Population standard deviation of the member estimates.
/// `NaN` when there are no members.
pub fn ensemble_spread(member_predictions: &[f64]) -> f64 {
    member_predictions.iter().population_std_dev()
}

/// Map a point estimate and the ensemble spread to a confidence score.
///
/// `1 - std / (max(prediction, 1) + 1)`, clamped. A non-finite spread is
/// treated as maximal disagreement.
pub fn confidence_score(prediction: f64, std_dev: f64) -> f64 {
    if !std_dev.is_finite() {
        return MIN_CONFIDENCE;
    }
    let denom = prediction.max(1.0);
    let raw = 1.0 - (std_dev / (denom + 1.0));
    raw.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
