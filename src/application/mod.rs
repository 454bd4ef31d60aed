// Feature engineering shared by training and inference
pub mod feature_engineering;

// Ensemble training, confidence scoring and the model lifecycle
pub mod ml;
