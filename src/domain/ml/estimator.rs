use crate::domain::errors::ForecastError;

/// A fitted ensemble of regression trees.
///
/// Rows are laid out in [`super::feature_registry::FEATURE_NAMES`] order.
pub trait TreeEnsemble: Send + Sync {
    /// Point estimate for a single row.
    fn predict(&self, row: &[f64]) -> Result<f64, ForecastError>;

    /// Estimate of every constituent tree for a single row, in member order.
    fn member_predictions(&self, row: &[f64]) -> Result<Vec<f64>, ForecastError>;

    /// Number of constituent trees.
    fn n_members(&self) -> usize;
}

/// Interface for ensemble training algorithms.
pub trait EnsembleTrainer: Send + Sync {
    /// Fit a fresh ensemble on a row-major feature matrix and its targets.
    fn fit(&self, x: &[Vec<f64>], y: &[f64]) -> Result<Box<dyn TreeEnsemble>, ForecastError>;

    /// Get algorithm name
    fn name(&self) -> &str;
}
