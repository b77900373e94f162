//! Synthesized evaluation metrics for the training transition.
//!
//! Training in this registry is bookkeeping: no optimizer runs and no
//! numeric model output is reproducible. What is guaranteed are the ranges:
//! accuracy in [0.6, 0.98], precision/recall/F1 in [0.5, 1.1] and
//! RMSE/MAE/R² in [0, 1.1].

use crate::domain::ml::model::{ModelPerformance, ModelType};
use chrono::Utc;
use rand::Rng;
use std::time::{Duration, Instant};

pub const MIN_ACCURACY: f64 = 0.6;
pub const MAX_ACCURACY: f64 = 0.98;

/// Source of performance metrics for a freshly trained model.
pub trait PerformanceModel: Send + Sync {
    fn evaluate(&self, model_type: ModelType) -> ModelPerformance;
}

/// Random metrics around a per-family baseline.
#[derive(Debug, Clone, Default)]
pub struct SimulatedPerformance;

impl SimulatedPerformance {
    pub fn new() -> Self {
        Self
    }

    /// Relative skill of each model family
    fn type_factor(model_type: ModelType) -> f64 {
        match model_type {
            ModelType::LinearRegression => 0.9,
            ModelType::RandomForest => 1.0,
            ModelType::NeuralNetwork => 1.1,
            ModelType::Lstm => 1.15,
            ModelType::XgBoost => 1.05,
            ModelType::Custom => 1.0,
        }
    }
}

impl PerformanceModel for SimulatedPerformance {
    fn evaluate(&self, model_type: ModelType) -> ModelPerformance {
        let started = Instant::now();
        let mut rng = rand::rng();

        let accuracy = ((0.75 + rng.random_range(0.0..0.2)) * Self::type_factor(model_type))
            .clamp(MIN_ACCURACY, MAX_ACCURACY);

        let precision = (accuracy * rng.random_range(0.9..1.1)).clamp(0.5, 1.1);
        let recall = (accuracy * rng.random_range(0.9..1.1)).clamp(0.5, 1.1);
        // Harmonic mean of two values in [0.5, 1.1] stays in [0.5, 1.1]
        let f1_score = 2.0 * precision * recall / (precision + recall);
        let rmse = (1.0 - accuracy) * rng.random_range(0.5..=1.0);
        let mae = (rmse * rng.random_range(0.7..1.3)).clamp(0.0, 1.1);
        let r2_score = (accuracy * rng.random_range(0.8..1.2)).clamp(0.0, 1.0);

        ModelPerformance {
            accuracy,
            precision,
            recall,
            f1_score,
            rmse,
            mae,
            r2_score,
            training_time: started.elapsed(),
            inference_time: Duration::ZERO,
            last_evaluation: Utc::now(),
        }
    }
}

/// Always reports the same accuracy. Useful where callers need
/// reproducible confidence values.
#[derive(Debug, Clone)]
pub struct FixedPerformance {
    pub accuracy: f64,
}

impl FixedPerformance {
    pub fn new(accuracy: f64) -> Self {
        Self {
            accuracy: accuracy.clamp(MIN_ACCURACY, MAX_ACCURACY),
        }
    }
}

impl PerformanceModel for FixedPerformance {
    fn evaluate(&self, _model_type: ModelType) -> ModelPerformance {
        let error = 1.0 - self.accuracy;
        ModelPerformance {
            accuracy: self.accuracy,
            precision: self.accuracy,
            recall: self.accuracy,
            f1_score: self.accuracy,
            rmse: error,
            mae: error * 0.8,
            r2_score: self.accuracy,
            training_time: Duration::ZERO,
            inference_time: Duration::ZERO,
            last_evaluation: Utc::now(),
        }
    }
}
