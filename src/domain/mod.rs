// Footfall records, features and model state
pub mod footfall;

// Estimator contract and feature layout
pub mod ml;

// Domain-specific error types
pub mod errors;
