pub mod confidence;
pub mod forest;
pub mod model_manager;

pub use forest::{ForestParameters, SmartCoreForestTrainer};
pub use model_manager::{ModelManager, TrainedModel};
