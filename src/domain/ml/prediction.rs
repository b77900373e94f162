use super::feature::FeatureSnapshot;
use super::model::PredictionType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

/// Output of a deployed model for one feature snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub model_id: String,
    pub asset: String,
    pub prediction_type: PredictionType,
    pub value: f64,
    /// Confidence in [0.1, 0.99]
    pub confidence: f64,
    pub horizon: Duration,
    /// Copy of the snapshot the prediction was made from
    pub features: FeatureSnapshot,
    pub metadata: HashMap<String, serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

pub fn generate_prediction_id() -> String {
    format!("prediction_{}", Uuid::new_v4().simple())
}
