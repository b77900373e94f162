//! Push-based metrics reporter for quantreg
//!
//! Outputs a metrics snapshot as structured JSON to stdout on demand. The
//! caller decides when to report; nothing here schedules itself.

use crate::application::analytics::PredictiveAnalytics;
use crate::domain::metrics::AnalyticsMetrics;
use crate::infrastructure::observability::metrics::Metrics;
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// Metrics snapshot for JSON output
#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub analytics_id: String,
    pub feature_observations: usize,
    pub registry: AnalyticsMetrics,
}

/// Push-based metrics reporter
pub struct MetricsReporter {
    metrics: Metrics,
    start_time: Instant,
}

impl MetricsReporter {
    pub fn new(metrics: Metrics) -> Self {
        Self {
            metrics,
            start_time: Instant::now(),
        }
    }

    /// Collect, mirror into gauges and print one `METRICS_JSON:` line.
    pub fn report_once(&self, analytics: &PredictiveAnalytics) -> Option<MetricsSnapshot> {
        let snapshot = self.collect_snapshot(analytics);

        match serde_json::to_string(&snapshot) {
            Ok(json) => {
                // Use a special prefix so logs can be easily filtered
                println!("METRICS_JSON:{}", json);
                info!(
                    "Models: {} ({} deployed) | Predictions: {} | Uptime: {}s",
                    snapshot.registry.total_models,
                    snapshot.registry.deployed_models,
                    snapshot.registry.total_predictions,
                    snapshot.uptime_seconds
                );
                Some(snapshot)
            }
            Err(e) => {
                warn!("Failed to serialize metrics: {}", e);
                None
            }
        }
    }

    /// Collect current metrics snapshot
    pub fn collect_snapshot(&self, analytics: &PredictiveAnalytics) -> MetricsSnapshot {
        let registry = analytics.get_metrics();
        let uptime = self.start_time.elapsed().as_secs();

        self.metrics.record(&registry);
        self.metrics.uptime_seconds.set(uptime as f64);

        MetricsSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_seconds: uptime,
            version: env!("CARGO_PKG_VERSION").to_string(),
            analytics_id: analytics.id().to_string(),
            feature_observations: analytics.feature_count(),
            registry,
        }
    }
}
