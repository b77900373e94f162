use crate::domain::errors::Result;
use crate::domain::ml::feature::FeatureSnapshot;
use crate::domain::ml::model::Model;
use crate::domain::ml::prediction::Prediction;
use std::time::Duration;

pub const MIN_CONFIDENCE: f64 = 0.1;
pub const MAX_CONFIDENCE: f64 = 0.99;

/// Interface for turning a deployed model plus a feature snapshot into a
/// prediction. Implementations are pure: they never touch the registry.
pub trait MLPredictor: Send + Sync {
    /// Fails with `InvalidState` unless `model` is deployed and with
    /// `MissingFeature` when the snapshot holds none of its required features.
    fn predict(
        &self,
        model: &Model,
        features: &FeatureSnapshot,
        horizon: Duration,
    ) -> Result<Prediction>;

    /// Get predictor name/type
    fn name(&self) -> &str;
}

/// Confidence grows with both model accuracy and feature completeness.
///
/// The product keeps confidence under 0.5 whenever fewer than half of the
/// required features are supplied, however accurate the model.
pub fn confidence(accuracy: f64, completeness: f64) -> f64 {
    (accuracy * completeness).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}
