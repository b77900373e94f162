use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary counters over the model registry.
///
/// Invariant: `deployed_models <= trained_models <= total_models`, where
/// `trained_models` counts every model that has reached `Trained` (deployed
/// models included).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsMetrics {
    pub total_models: u64,
    /// Models still held by the registry
    pub active_models: u64,
    pub trained_models: u64,
    pub deployed_models: u64,
    pub total_predictions: u64,
    /// Mean accuracy across trained and deployed models, 0.0 when none
    pub average_accuracy: f64,
    pub last_update: DateTime<Utc>,
}

impl Default for AnalyticsMetrics {
    fn default() -> Self {
        Self {
            total_models: 0,
            active_models: 0,
            trained_models: 0,
            deployed_models: 0,
            total_predictions: 0,
            average_accuracy: 0.0,
            last_update: Utc::now(),
        }
    }
}

impl AnalyticsMetrics {
    pub fn is_consistent(&self) -> bool {
        self.deployed_models <= self.trained_models
            && self.trained_models <= self.total_models
            && self.active_models <= self.total_models
    }
}
