use super::performance_simulator::PerformanceModel;
use crate::config::AnalyticsConfig;
use crate::domain::errors::{AnalyticsError, Result};
use crate::domain::ml::feature::{FeatureSnapshot, MarketFeature};
use crate::domain::ml::feature_registry;
use crate::domain::ml::model::{
    Hyperparameters, Model, ModelStatus, ModelType, PredictionType, TrainingData,
};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const TRAIN_SPLIT_RATIO: f64 = 0.8;

/// Owner of every model record and guardian of the lifecycle.
///
/// Callers only ever receive clones; nothing returned aliases internal
/// state. Preconditions are checked before any field is written.
pub struct ModelRegistry {
    models: HashMap<String, Model>,
    max_models: u64,
    min_data_points: u64,
    min_deployment_accuracy: Option<f64>,
    performance: Arc<dyn PerformanceModel>,
    total_created: u64,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.models.len())
            .field("max_models", &self.max_models)
            .field("min_data_points", &self.min_data_points)
            .field("min_deployment_accuracy", &self.min_deployment_accuracy)
            .field("total_created", &self.total_created)
            .finish()
    }
}

impl ModelRegistry {
    pub fn new(config: &AnalyticsConfig, performance: Arc<dyn PerformanceModel>) -> Self {
        Self {
            models: HashMap::new(),
            max_models: config.max_models,
            min_data_points: config.min_data_points,
            min_deployment_accuracy: config.min_deployment_accuracy,
            performance,
            total_created: 0,
        }
    }

    /// Register a new model in `Training` status.
    ///
    /// The name must be non-empty; any other string, whitespace included, is
    /// accepted. Feature names must be non-blank and unique.
    pub fn create(
        &mut self,
        name: &str,
        model_type: ModelType,
        asset: &str,
        prediction_type: PredictionType,
        features: &[String],
        hyperparameters: &Hyperparameters,
    ) -> Result<Model> {
        if name.is_empty() {
            return Err(AnalyticsError::validation("model name cannot be empty"));
        }
        if features.is_empty() {
            return Err(AnalyticsError::validation(
                "at least one feature must be specified",
            ));
        }
        if features.iter().any(|f| f.trim().is_empty()) {
            return Err(AnalyticsError::validation("feature names cannot be empty"));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = features.iter().find(|f| !seen.insert(f.as_str())) {
            return Err(AnalyticsError::validation(format!(
                "duplicate feature: {}",
                dup
            )));
        }
        if self.models.len() as u64 >= self.max_models {
            warn!(
                "ModelRegistry: rejecting model '{}', registry full ({})",
                name, self.max_models
            );
            return Err(AnalyticsError::Capacity {
                resource: "model registry".to_string(),
                limit: self.max_models,
            });
        }

        let model = Model::new(
            name,
            model_type,
            asset,
            prediction_type,
            features,
            hyperparameters,
        );
        self.models.insert(model.id.clone(), model.clone());
        self.total_created += 1;

        info!(
            "ModelRegistry: created {} '{}' ({:?}, {:?} on {})",
            model.id, model.name, model.model_type, model.prediction_type, model.asset
        );
        Ok(model)
    }

    /// Move a model from `Training` to `Trained` using `observations` as the
    /// training batch. No learning happens; performance is synthesized.
    pub fn train(&mut self, model_id: &str, observations: &[MarketFeature]) -> Result<()> {
        let min_data_points = self.min_data_points;
        let performance_model = Arc::clone(&self.performance);

        let model = self
            .models
            .get_mut(model_id)
            .ok_or_else(|| AnalyticsError::not_found(model_id))?;

        if model.status != ModelStatus::Training {
            return Err(invalid_state(model, ModelStatus::Training));
        }

        let actual = observations.len() as u64;
        if actual < min_data_points {
            warn!(
                "ModelRegistry: {} training rejected, {} of {} data points",
                model_id, actual, min_data_points
            );
            return Err(AnalyticsError::InsufficientData {
                required: min_data_points,
                actual,
            });
        }

        let (Some(start_date), Some(end_date)) = (
            observations.iter().map(|o| o.timestamp).min(),
            observations.iter().map(|o| o.timestamp).max(),
        ) else {
            // Only reachable with min_data_points == 0 and an empty batch
            return Err(AnalyticsError::InsufficientData {
                required: min_data_points.max(1),
                actual,
            });
        };

        let feature_count = observations
            .iter()
            .map(|o| o.feature.as_str())
            .collect::<HashSet<_>>()
            .len() as u64;

        let now = Utc::now();
        let performance = performance_model.evaluate(model.model_type);

        model.training_data = Some(TrainingData {
            start_date,
            end_date,
            data_points: actual,
            feature_count,
            split_ratio: TRAIN_SPLIT_RATIO,
            validation_set: true,
            last_update: now,
        });
        info!(
            "ModelRegistry: trained {} on {} points ({} features), accuracy {:.3}",
            model_id, actual, feature_count, performance.accuracy
        );
        model.performance = Some(performance);
        model.status = ModelStatus::Trained;
        model.last_update = now;

        Ok(())
    }

    pub fn deploy(&mut self, model_id: &str) -> Result<()> {
        let min_accuracy = self.min_deployment_accuracy;

        let model = self
            .models
            .get_mut(model_id)
            .ok_or_else(|| AnalyticsError::not_found(model_id))?;

        if model.status != ModelStatus::Trained {
            return Err(invalid_state(model, ModelStatus::Trained));
        }

        if let (Some(floor), Some(accuracy)) = (min_accuracy, model.accuracy()) {
            if accuracy < floor {
                warn!(
                    "ModelRegistry: {} accuracy {:.3} below deployment floor {:.3}",
                    model_id, accuracy, floor
                );
                return Err(AnalyticsError::InvalidState {
                    model_id: model_id.to_string(),
                    expected: format!("accuracy >= {:.3}", floor),
                    actual: format!("accuracy {:.3}", accuracy),
                });
            }
        }

        model.status = ModelStatus::Deployed;
        model.last_update = Utc::now();
        info!("ModelRegistry: deployed {}", model_id);
        Ok(())
    }

    /// Copy of a model that may serve `features`: it must be deployed and the
    /// snapshot must carry at least one of its required features.
    pub fn servable(&self, model_id: &str, features: &FeatureSnapshot) -> Result<Model> {
        let model = self
            .models
            .get(model_id)
            .ok_or_else(|| AnalyticsError::not_found(model_id))?;

        if model.status != ModelStatus::Deployed {
            return Err(invalid_state(model, ModelStatus::Deployed));
        }
        if feature_registry::present_count(&model.features, features) == 0 {
            return Err(AnalyticsError::MissingFeature {
                model_id: model.id.clone(),
                required: model.features.clone(),
            });
        }
        Ok(model.clone())
    }

    /// Store the latest inference latency on a trained model. Unknown or
    /// untrained models are ignored.
    pub fn record_inference(&mut self, model_id: &str, inference_time: Duration) {
        if let Some(performance) = self
            .models
            .get_mut(model_id)
            .and_then(|model| model.performance.as_mut())
        {
            performance.inference_time = inference_time;
        }
    }

    /// Independent copy of one model
    pub fn get(&self, model_id: &str) -> Result<Model> {
        self.models
            .get(model_id)
            .cloned()
            .ok_or_else(|| AnalyticsError::not_found(model_id))
    }

    /// Independent copies of every model, keyed by ID
    pub fn all(&self) -> HashMap<String, Model> {
        self.models.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Models ever created, including any since removed
    pub fn total_created(&self) -> u64 {
        self.total_created
    }
}

fn invalid_state(model: &Model, expected: ModelStatus) -> AnalyticsError {
    AnalyticsError::InvalidState {
        model_id: model.id.clone(),
        expected: expected.to_string(),
        actual: model.status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::performance_simulator::{FixedPerformance, SimulatedPerformance};
    use chrono::{Duration, TimeZone};

    fn registry(max_models: u64, min_data_points: u64) -> ModelRegistry {
        let config = AnalyticsConfig {
            max_models,
            min_data_points,
            ..Default::default()
        }
        .with_defaults();
        ModelRegistry::new(&config, Arc::new(SimulatedPerformance::new()))
    }

    fn features(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn batch(n: usize) -> Vec<MarketFeature> {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| {
                let name = if i % 2 == 0 { "price" } else { "volume" };
                MarketFeature::new(base + Duration::minutes(i as i64), "BTC", name, i as f64, "test")
            })
            .collect()
    }

    fn create(registry: &mut ModelRegistry) -> Model {
        registry
            .create(
                "btc-rf",
                ModelType::RandomForest,
                "BTC",
                PredictionType::Price,
                &features(&["price", "volume"]),
                &Hyperparameters::new(),
            )
            .unwrap()
    }

    #[test]
    fn test_create_validation() {
        let mut reg = registry(5, 10);
        let empty_name = reg.create(
            "",
            ModelType::Lstm,
            "BTC",
            PredictionType::Price,
            &features(&["price"]),
            &Hyperparameters::new(),
        );
        assert!(matches!(empty_name, Err(AnalyticsError::Validation { .. })));

        let spaced_name = reg.create(
            " ",
            ModelType::Lstm,
            "BTC",
            PredictionType::Price,
            &features(&["price"]),
            &Hyperparameters::new(),
        );
        assert!(spaced_name.is_ok());

        let no_features = reg.create(
            "x",
            ModelType::Lstm,
            "BTC",
            PredictionType::Price,
            &[],
            &Hyperparameters::new(),
        );
        assert!(matches!(no_features, Err(AnalyticsError::Validation { .. })));

        let duplicate = reg.create(
            "x",
            ModelType::Lstm,
            "BTC",
            PredictionType::Price,
            &features(&["price", "price"]),
            &Hyperparameters::new(),
        );
        assert!(matches!(duplicate, Err(AnalyticsError::Validation { .. })));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.total_created(), 1);
    }

    #[test]
    fn test_capacity_limit() {
        let mut reg = registry(2, 10);
        create(&mut reg);
        create(&mut reg);
        let third = reg.create(
            "overflow",
            ModelType::XgBoost,
            "ETH",
            PredictionType::Volatility,
            &features(&["volatility"]),
            &Hyperparameters::new(),
        );
        assert!(matches!(
            third,
            Err(AnalyticsError::Capacity { limit: 2, .. })
        ));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_train_summarizes_batch() {
        let mut reg = registry(5, 10);
        let model = create(&mut reg);
        reg.train(&model.id, &batch(12)).unwrap();

        let trained = reg.get(&model.id).unwrap();
        assert_eq!(trained.status, ModelStatus::Trained);
        let data = trained.training_data.unwrap();
        assert_eq!(data.data_points, 12);
        assert_eq!(data.feature_count, 2);
        assert!(data.start_date < data.end_date);
        assert!(trained.performance.is_some());
    }

    #[test]
    fn test_insufficient_data_leaves_model_untouched() {
        let mut reg = registry(5, 10);
        let model = create(&mut reg);
        let err = reg.train(&model.id, &batch(9)).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::InsufficientData {
                required: 10,
                actual: 9
            }
        );
        assert_eq!(reg.get(&model.id).unwrap(), model);
    }

    #[test]
    fn test_retraining_is_rejected() {
        let mut reg = registry(5, 10);
        let model = create(&mut reg);
        reg.train(&model.id, &batch(10)).unwrap();
        let err = reg.train(&model.id, &batch(10)).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidState { .. }));
    }

    #[test]
    fn test_deploy_requires_trained() {
        let mut reg = registry(5, 10);
        let model = create(&mut reg);

        assert!(matches!(
            reg.deploy(&model.id),
            Err(AnalyticsError::InvalidState { .. })
        ));
        reg.train(&model.id, &batch(10)).unwrap();
        reg.deploy(&model.id).unwrap();
        assert_eq!(reg.get(&model.id).unwrap().status, ModelStatus::Deployed);
        assert!(matches!(
            reg.deploy(&model.id),
            Err(AnalyticsError::InvalidState { .. })
        ));
        assert!(matches!(
            reg.deploy("model_missing"),
            Err(AnalyticsError::NotFound { .. })
        ));
    }

    #[test]
    fn test_deployment_accuracy_floor() {
        let config = AnalyticsConfig {
            min_data_points: 1,
            min_deployment_accuracy: Some(0.9),
            ..Default::default()
        }
        .with_defaults();
        let mut reg = ModelRegistry::new(&config, Arc::new(FixedPerformance::new(0.8)));
        let model = create(&mut reg);
        reg.train(&model.id, &batch(1)).unwrap();

        assert!(matches!(
            reg.deploy(&model.id),
            Err(AnalyticsError::InvalidState { .. })
        ));
        assert_eq!(reg.get(&model.id).unwrap().status, ModelStatus::Trained);
    }

    #[test]
    fn test_only_deployed_models_are_servable() {
        let mut reg = registry(5, 10);
        let model = create(&mut reg);
        let snapshot = FeatureSnapshot::from([("price".to_string(), 10.0)]);

        assert!(matches!(
            reg.servable(&model.id, &snapshot),
            Err(AnalyticsError::InvalidState { .. })
        ));
        reg.train(&model.id, &batch(10)).unwrap();
        assert!(matches!(
            reg.servable(&model.id, &snapshot),
            Err(AnalyticsError::InvalidState { .. })
        ));
        reg.deploy(&model.id).unwrap();
        assert_eq!(reg.servable(&model.id, &snapshot).unwrap().id, model.id);
        assert!(matches!(
            reg.servable("model_missing", &snapshot),
            Err(AnalyticsError::NotFound { .. })
        ));
    }

    #[test]
    fn test_servable_requires_some_required_feature() {
        let mut reg = registry(5, 10);
        let model = create(&mut reg);
        reg.train(&model.id, &batch(10)).unwrap();
        reg.deploy(&model.id).unwrap();

        let unrelated = FeatureSnapshot::from([("rsi".to_string(), 40.0)]);
        assert!(matches!(
            reg.servable(&model.id, &unrelated),
            Err(AnalyticsError::MissingFeature { .. })
        ));
        let partial = FeatureSnapshot::from([("volume".to_string(), 1.0)]);
        assert!(reg.servable(&model.id, &partial).is_ok());
    }

    #[test]
    fn test_returned_copies_are_independent() {
        let mut reg = registry(5, 10);
        let mut model = create(&mut reg);
        model.name = "mutated".to_string();
        model.features.push("injected".to_string());

        let stored = reg.get(&model.id).unwrap();
        assert_eq!(stored.name, "btc-rf");
        assert_eq!(stored.features, features(&["price", "volume"]));

        let mut all = reg.all();
        all.values_mut().for_each(|m| m.status = ModelStatus::Deployed);
        assert_eq!(reg.get(&model.id).unwrap().status, ModelStatus::Training);
    }
}
