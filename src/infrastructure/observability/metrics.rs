//! Prometheus metrics definitions for quantreg
//!
//! All metrics use the `analytics_` prefix and are read-only mirrors of the
//! registry's `AnalyticsMetrics`.

use crate::domain::metrics::AnalyticsMetrics;
use prometheus::{
    Gauge, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

/// Prometheus gauges for the analytics registry
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Models ever created
    pub total_models: GenericGauge<AtomicF64>,
    /// Models currently held by the registry
    pub active_models: GenericGauge<AtomicF64>,
    /// Trained or deployed models
    pub trained_models: GenericGauge<AtomicF64>,
    pub deployed_models: GenericGauge<AtomicF64>,
    pub predictions_total: GenericGauge<AtomicF64>,
    /// Mean accuracy of trained models (0-1)
    pub average_accuracy: GenericGauge<AtomicF64>,
    /// Uptime in seconds
    pub uptime_seconds: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let total_models = Self::register_gauge(
            &registry,
            "analytics_models_total",
            "Models created since startup",
        )?;
        let active_models = Self::register_gauge(
            &registry,
            "analytics_models_active",
            "Models currently held by the registry",
        )?;
        let trained_models = Self::register_gauge(
            &registry,
            "analytics_models_trained",
            "Models that reached Trained (deployed included)",
        )?;
        let deployed_models = Self::register_gauge(
            &registry,
            "analytics_models_deployed",
            "Models currently deployed",
        )?;
        let predictions_total = Self::register_gauge(
            &registry,
            "analytics_predictions_total",
            "Successful predictions served",
        )?;
        let average_accuracy = Self::register_gauge(
            &registry,
            "analytics_average_accuracy",
            "Mean accuracy of trained models (0-1)",
        )?;
        let uptime_seconds = Self::register_gauge(
            &registry,
            "analytics_uptime_seconds",
            "Process uptime in seconds",
        )?;

        Ok(Self {
            registry: Arc::new(registry),
            total_models,
            active_models,
            trained_models,
            deployed_models,
            predictions_total,
            average_accuracy,
            uptime_seconds,
        })
    }

    fn register_gauge(
        registry: &Registry,
        name: &str,
        help: &str,
    ) -> anyhow::Result<GenericGauge<AtomicF64>> {
        let gauge = Gauge::with_opts(Opts::new(name, help))?;
        registry.register(Box::new(gauge.clone()))?;
        Ok(gauge)
    }

    /// Mirror a metrics snapshot into the gauges
    pub fn record(&self, snapshot: &AnalyticsMetrics) {
        self.total_models.set(snapshot.total_models as f64);
        self.active_models.set(snapshot.active_models as f64);
        self.trained_models.set(snapshot.trained_models as f64);
        self.deployed_models.set(snapshot.deployed_models as f64);
        self.predictions_total.set(snapshot.total_predictions as f64);
        self.average_accuracy.set(snapshot.average_accuracy);
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }
}
