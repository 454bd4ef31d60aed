pub mod estimator;
pub mod feature_registry;
