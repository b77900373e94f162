//! Predictive analytics facade.
//!
//! Owns the model registry, the feature store and the metrics aggregator as
//! one consistency domain behind a single reader-writer lock. Mutating calls
//! take the write side and refresh metrics before releasing it; reads take
//! the read side and hand back independent copies. Prediction math and risk
//! assessment run outside the lock.

use crate::application::ml::feature_store::FeatureStore;
use crate::application::ml::model_registry::ModelRegistry;
use crate::application::ml::performance_simulator::{PerformanceModel, SimulatedPerformance};
use crate::application::ml::perturbation_predictor::PerturbationPredictor;
use crate::application::ml::predictor::MLPredictor;
use crate::application::monitoring::metrics_aggregator::MetricsAggregator;
use crate::application::risk_management::risk_engine::RiskEngine;
use crate::config::AnalyticsConfig;
use crate::domain::errors::Result;
use crate::domain::metrics::AnalyticsMetrics;
use crate::domain::ml::feature::{FeatureSnapshot, MarketFeature};
use crate::domain::ml::model::{Hyperparameters, Model, ModelType, PredictionType};
use crate::domain::ml::prediction::Prediction;
use crate::domain::risk::risk_assessment::RiskAssessment;
use crate::infrastructure::observability::Metrics;
use anyhow::Context;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

struct AnalyticsState {
    registry: ModelRegistry,
    features: FeatureStore,
    metrics: MetricsAggregator,
}

pub struct PredictiveAnalytics {
    id: String,
    config: AnalyticsConfig,
    state: RwLock<AnalyticsState>,
    predictor: Arc<dyn MLPredictor>,
    risk_engine: RiskEngine,
    exporter: Option<Metrics>,
}

// Manual Debug implementation for PredictiveAnalytics
impl std::fmt::Debug for PredictiveAnalytics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictiveAnalytics")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("state", &"<RwLock>")
            .field("predictor", &self.predictor.name())
            .field("risk_engine", &self.risk_engine)
            .finish()
    }
}

impl PredictiveAnalytics {
    /// Build with the simulated training and perturbation predictor.
    /// Zero-valued config fields take their defaults.
    pub fn new(config: AnalyticsConfig) -> anyhow::Result<Self> {
        Self::with_components(
            config,
            Arc::new(SimulatedPerformance::new()),
            Arc::new(PerturbationPredictor::default()),
        )
    }

    pub fn with_components(
        config: AnalyticsConfig,
        performance: Arc<dyn PerformanceModel>,
        predictor: Arc<dyn MLPredictor>,
    ) -> anyhow::Result<Self> {
        let config = config.with_defaults();
        let risk_engine =
            RiskEngine::new(config.risk.clone()).context("Failed to build risk engine")?;
        let max_features = usize::try_from(config.max_features)
            .context("max_features does not fit in memory on this platform")?;

        let registry = ModelRegistry::new(&config, performance);
        let mut metrics = MetricsAggregator::new();
        metrics.recompute(&registry);

        let analytics = Self {
            id: format!("analytics_{}", Uuid::new_v4().simple()),
            state: RwLock::new(AnalyticsState {
                registry,
                features: FeatureStore::new(max_features),
                metrics,
            }),
            predictor,
            risk_engine,
            exporter: None,
            config,
        };

        info!(
            "PredictiveAnalytics {} ready: max_models={}, max_features={}, min_data_points={}, predictor={}",
            analytics.id,
            analytics.config.max_models,
            analytics.config.max_features,
            analytics.config.min_data_points,
            analytics.predictor.name()
        );
        Ok(analytics)
    }

    /// Push every metrics refresh into Prometheus gauges as well.
    pub fn with_metrics(mut self, exporter: Metrics) -> Self {
        exporter.record(&self.get_metrics());
        self.exporter = Some(exporter);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Horizon to use when the caller has no preference
    pub fn default_horizon(&self) -> Duration {
        self.config.prediction_horizon
    }

    pub fn create_model(
        &self,
        name: &str,
        model_type: ModelType,
        asset: &str,
        prediction_type: PredictionType,
        features: &[String],
        hyperparameters: &Hyperparameters,
    ) -> Result<Model> {
        let mut state = self.write_state();
        let model = state.registry.create(
            name,
            model_type,
            asset,
            prediction_type,
            features,
            hyperparameters,
        )?;
        self.refresh_metrics(&mut state);
        Ok(model)
    }

    pub fn train_model(&self, model_id: &str, observations: &[MarketFeature]) -> Result<()> {
        let mut state = self.write_state();
        state.registry.train(model_id, observations)?;
        self.refresh_metrics(&mut state);
        Ok(())
    }

    pub fn deploy_model(&self, model_id: &str) -> Result<()> {
        let mut state = self.write_state();
        state.registry.deploy(model_id)?;
        self.refresh_metrics(&mut state);
        Ok(())
    }

    pub fn make_prediction(
        &self,
        model_id: &str,
        features: &FeatureSnapshot,
        horizon: Duration,
    ) -> Result<Prediction> {
        // Shared access only for the lookup and lifecycle gate
        let lookup = self.read_state().registry.servable(model_id, features);
        let model = match lookup {
            Ok(model) => model,
            Err(e) => {
                warn!("Prediction rejected for {}: {}", model_id, e);
                return Err(e);
            }
        };

        let started = Instant::now();
        let prediction = match self.predictor.predict(&model, features, horizon) {
            Ok(prediction) => prediction,
            Err(e) => {
                warn!("Prediction rejected for {}: {}", model_id, e);
                return Err(e);
            }
        };
        let inference_time = started.elapsed();

        let mut state = self.write_state();
        state.registry.record_inference(model_id, inference_time);
        state.metrics.record_prediction();
        self.refresh_metrics(&mut state);

        Ok(prediction)
    }

    /// Independent of the registry; never takes the lock.
    pub fn assess_risk(&self, asset: &str, features: &FeatureSnapshot) -> Result<RiskAssessment> {
        self.risk_engine.assess(asset, features)
    }

    pub fn add_feature(&self, feature: MarketFeature) -> Result<()> {
        let mut state = self.write_state();
        state.features.add(feature)?;
        self.refresh_metrics(&mut state);
        Ok(())
    }

    pub fn get_model(&self, model_id: &str) -> Result<Model> {
        self.read_state().registry.get(model_id)
    }

    pub fn get_models(&self) -> HashMap<String, Model> {
        self.read_state().registry.all()
    }

    pub fn get_metrics(&self) -> AnalyticsMetrics {
        self.read_state().metrics.snapshot()
    }

    /// Stored observations for one `(asset, feature)` bucket, oldest first
    pub fn get_features(&self, asset: &str, feature: &str) -> Vec<MarketFeature> {
        self.read_state().features.features(asset, feature)
    }

    /// Latest value of each stored feature for `asset`, ready to feed into
    /// `make_prediction` or `assess_risk`.
    pub fn latest_snapshot(&self, asset: &str) -> FeatureSnapshot {
        self.read_state().features.latest_snapshot(asset)
    }

    pub fn feature_count(&self) -> usize {
        self.read_state().features.len()
    }

    fn refresh_metrics(&self, state: &mut AnalyticsState) {
        let AnalyticsState {
            registry, metrics, ..
        } = state;
        let current = metrics.recompute(registry);
        debug!(
            "Metrics: total={} trained={} deployed={} predictions={} avg_accuracy={:.3}",
            current.total_models,
            current.trained_models,
            current.deployed_models,
            current.total_predictions,
            current.average_accuracy
        );
        if let Some(exporter) = &self.exporter {
            exporter.record(current);
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, AnalyticsState> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("PredictiveAnalytics: Lock poisoned during read, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, AnalyticsState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("PredictiveAnalytics: Lock poisoned during write, recovering");
                poisoned.into_inner()
            }
        }
    }
}
