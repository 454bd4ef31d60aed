pub mod dataset;
pub mod observability;

pub use dataset::{load_historical_records, read_historical_records};
