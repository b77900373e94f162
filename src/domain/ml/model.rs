use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Opaque hyperparameter bag, passed through untouched.
pub type Hyperparameters = HashMap<String, serde_json::Value>;

/// Family of the predictive model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelType {
    LinearRegression,
    RandomForest,
    NeuralNetwork,
    Lstm,
    XgBoost,
    Custom,
}

impl ModelType {
    pub const ALL: [ModelType; 6] = [
        ModelType::LinearRegression,
        ModelType::RandomForest,
        ModelType::NeuralNetwork,
        ModelType::Lstm,
        ModelType::XgBoost,
        ModelType::Custom,
    ];
}

/// Lifecycle of a model: Training -> Trained -> Deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModelStatus {
    Training,
    Trained,
    Deployed,
}

impl ModelStatus {
    /// Trained and Deployed models both carry performance metrics.
    pub fn is_trained(&self) -> bool {
        matches!(self, ModelStatus::Trained | ModelStatus::Deployed)
    }
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModelStatus::Training => "Training",
            ModelStatus::Trained => "Trained",
            ModelStatus::Deployed => "Deployed",
        };
        write!(f, "{}", s)
    }
}

/// What quantity the model forecasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredictionType {
    Price,
    Volatility,
    Risk,
    Trend,
    Volume,
}

/// Evaluation metrics synthesized at training time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPerformance {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r2_score: f64,
    pub training_time: Duration,
    pub inference_time: Duration,
    pub last_evaluation: DateTime<Utc>,
}

/// Summary of the observation batch a model was trained on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingData {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub data_points: u64,
    /// Distinct feature names present in the batch
    pub feature_count: u64,
    pub split_ratio: f64,
    pub validation_set: bool,
    pub last_update: DateTime<Utc>,
}

/// A registered predictive model.
///
/// Cloning yields a fully independent snapshot (every field is owned), which
/// is what the registry hands out to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: String,
    pub model_type: ModelType,
    pub status: ModelStatus,
    pub asset: String,
    pub prediction_type: PredictionType,
    /// Required features, in declaration order. Never empty.
    pub features: Vec<String>,
    pub hyperparameters: Hyperparameters,
    /// `None` until the model has been trained
    pub performance: Option<ModelPerformance>,
    pub training_data: Option<TrainingData>,
    pub last_update: DateTime<Utc>,
}

impl Model {
    /// Builds a fresh model in `Training` status with a generated ID.
    /// Input validation is the registry's job.
    pub fn new(
        name: &str,
        model_type: ModelType,
        asset: &str,
        prediction_type: PredictionType,
        features: &[String],
        hyperparameters: &Hyperparameters,
    ) -> Self {
        Self {
            id: generate_model_id(),
            name: name.to_string(),
            model_type,
            status: ModelStatus::Training,
            asset: asset.to_string(),
            prediction_type,
            features: features.to_vec(),
            hyperparameters: hyperparameters.clone(),
            performance: None,
            training_data: None,
            last_update: Utc::now(),
        }
    }

    /// Accuracy of a trained model, `None` before training.
    pub fn accuracy(&self) -> Option<f64> {
        self.performance.as_ref().map(|p| p.accuracy)
    }
}

pub fn generate_model_id() -> String {
    format!("model_{}", Uuid::new_v4().simple())
}
