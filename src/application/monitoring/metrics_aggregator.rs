use crate::application::ml::model_registry::ModelRegistry;
use crate::domain::metrics::AnalyticsMetrics;
use crate::domain::ml::model::ModelStatus;
use chrono::Utc;
use statrs::statistics::{Data, Distribution};

/// Keeps `AnalyticsMetrics` in step with the registry.
///
/// Counters are derived from registry contents on every `recompute`, except
/// for the prediction counter which has no other source of truth.
#[derive(Debug, Default)]
pub struct MetricsAggregator {
    total_predictions: u64,
    current: AnalyticsMetrics,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_prediction(&mut self) {
        self.total_predictions += 1;
    }

    /// Rebuild every counter from `registry` and stamp `last_update`.
    pub fn recompute(&mut self, registry: &ModelRegistry) -> &AnalyticsMetrics {
        let mut trained_models = 0u64;
        let mut deployed_models = 0u64;
        let mut accuracies = Vec::new();

        for model in registry.iter() {
            if model.status.is_trained() {
                trained_models += 1;
                if let Some(accuracy) = model.accuracy() {
                    accuracies.push(accuracy);
                }
            }
            if model.status == ModelStatus::Deployed {
                deployed_models += 1;
            }
        }

        let average_accuracy = if accuracies.is_empty() {
            0.0
        } else {
            Data::new(accuracies).mean().unwrap_or(0.0)
        };

        self.current = AnalyticsMetrics {
            total_models: registry.total_created(),
            active_models: registry.len() as u64,
            trained_models,
            deployed_models,
            total_predictions: self.total_predictions,
            average_accuracy,
            last_update: Utc::now(),
        };
        &self.current
    }

    /// Independent copy of the last recomputed metrics
    pub fn snapshot(&self) -> AnalyticsMetrics {
        self.current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::performance_simulator::FixedPerformance;
    use crate::config::AnalyticsConfig;
    use crate::domain::ml::feature::MarketFeature;
    use crate::domain::ml::model::{Hyperparameters, ModelType, PredictionType};
    use std::sync::Arc;

    fn registry() -> ModelRegistry {
        let config = AnalyticsConfig {
            min_data_points: 1,
            ..Default::default()
        }
        .with_defaults();
        ModelRegistry::new(&config, Arc::new(FixedPerformance::new(0.8)))
    }

    fn add_model(reg: &mut ModelRegistry) -> String {
        reg.create(
            "m",
            ModelType::XgBoost,
            "SPY",
            PredictionType::Trend,
            &["close".to_string()],
            &Hyperparameters::new(),
        )
        .unwrap()
        .id
    }

    #[test]
    fn test_empty_registry() {
        let mut aggregator = MetricsAggregator::new();
        let metrics = aggregator.recompute(&registry()).clone();
        assert_eq!(metrics.total_models, 0);
        assert_eq!(metrics.average_accuracy, 0.0);
        assert!(metrics.is_consistent());
    }

    #[test]
    fn test_counts_follow_lifecycle() {
        let mut reg = registry();
        let obs = vec![MarketFeature::new(Utc::now(), "SPY", "close", 1.0, "test")];

        let a = add_model(&mut reg);
        let b = add_model(&mut reg);
        add_model(&mut reg);
        reg.train(&a, &obs).unwrap();
        reg.train(&b, &obs).unwrap();
        reg.deploy(&b).unwrap();

        let mut aggregator = MetricsAggregator::new();
        aggregator.record_prediction();
        let metrics = aggregator.recompute(&reg).clone();

        assert_eq!(metrics.total_models, 3);
        assert_eq!(metrics.active_models, 3);
        assert_eq!(metrics.trained_models, 2);
        assert_eq!(metrics.deployed_models, 1);
        assert_eq!(metrics.total_predictions, 1);
        assert!((metrics.average_accuracy - 0.8).abs() < 1e-9);
        assert!(metrics.is_consistent());
    }
}
