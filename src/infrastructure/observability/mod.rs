//! Push-based observability for quantreg
//!
//! Observability through **outbound data only**: Prometheus gauges rendered
//! on request and structured JSON snapshots on stdout. No server, no
//! incoming requests.

pub mod metrics;
pub mod reporter;

pub use metrics::Metrics;
pub use reporter::{MetricsReporter, MetricsSnapshot};
