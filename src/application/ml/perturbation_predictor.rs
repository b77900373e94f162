use super::performance_simulator::MIN_ACCURACY;
use super::predictor::{MLPredictor, confidence};
use crate::domain::errors::{AnalyticsError, Result};
use crate::domain::ml::feature::FeatureSnapshot;
use crate::domain::ml::feature_registry;
use crate::domain::ml::model::{Model, ModelStatus};
use crate::domain::ml::prediction::{Prediction, generate_prediction_id};
use chrono::Utc;
use rand::Rng;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_BASE_VALUE: f64 = 100.0;
pub const DEFAULT_NOISE_SCALE: f64 = 0.2;

/// Predicts by nudging the snapshot's `price` (or `close`) upwards by noise
/// that shrinks as model accuracy grows: `base * (1 + (1 - accuracy) * u * scale)`
/// with `u` uniform in [0, 1).
#[derive(Debug, Clone)]
pub struct PerturbationPredictor {
    default_base_value: f64,
    noise_scale: f64,
}

impl PerturbationPredictor {
    pub fn new(default_base_value: f64, noise_scale: f64) -> Self {
        Self {
            default_base_value,
            noise_scale: noise_scale.max(0.0),
        }
    }

    fn predict_value(&self, accuracy: f64, features: &FeatureSnapshot) -> f64 {
        let base = feature_registry::base_value(features).unwrap_or(self.default_base_value);
        let noise = (1.0 - accuracy).max(0.0) * rand::rng().random_range(0.0..1.0) * self.noise_scale;
        base * (1.0 + noise)
    }
}

impl Default for PerturbationPredictor {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_VALUE, DEFAULT_NOISE_SCALE)
    }
}

impl MLPredictor for PerturbationPredictor {
    fn predict(
        &self,
        model: &Model,
        features: &FeatureSnapshot,
        horizon: Duration,
    ) -> Result<Prediction> {
        if model.status != ModelStatus::Deployed {
            return Err(AnalyticsError::InvalidState {
                model_id: model.id.clone(),
                expected: ModelStatus::Deployed.to_string(),
                actual: model.status.to_string(),
            });
        }

        let completeness = feature_registry::completeness(&model.features, features);
        if completeness == 0.0 {
            return Err(AnalyticsError::MissingFeature {
                model_id: model.id.clone(),
                required: model.features.clone(),
            });
        }

        let started = Instant::now();
        let accuracy = model.accuracy().unwrap_or(MIN_ACCURACY);
        let value = self.predict_value(accuracy, features);
        let confidence = confidence(accuracy, completeness);
        let inference_time = started.elapsed();

        debug!(
            "{}: {} -> {:.4} (confidence {:.3}, completeness {:.2})",
            self.name(),
            model.id,
            value,
            confidence,
            completeness
        );

        let mut metadata = HashMap::new();
        metadata.insert(
            "inference_time_us".to_string(),
            serde_json::Value::from(inference_time.as_micros() as u64),
        );
        metadata.insert(
            "feature_completeness".to_string(),
            serde_json::Value::from(completeness),
        );

        Ok(Prediction {
            id: generate_prediction_id(),
            model_id: model.id.clone(),
            asset: model.asset.clone(),
            prediction_type: model.prediction_type,
            value,
            confidence,
            horizon,
            features: features.clone(),
            metadata,
            timestamp: Utc::now(),
        })
    }

    fn name(&self) -> &str {
        "PerturbationPredictor"
    }
}
