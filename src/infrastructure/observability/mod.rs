//! Push-based observability for the footfall forecast service
//!
//! This module provides observability through **outbound data only** - no HTTP server,
//! no incoming requests. Metrics are exposed via:
//!
//! 1. **Structured JSON Logs**: Periodic JSON snapshots emitted through `tracing`
//! 2. **Prometheus text format**: `Metrics::render()` for scraping adapters

pub mod metrics;
pub mod reporter;

pub use metrics::Metrics;
pub use reporter::MetricsReporter;
