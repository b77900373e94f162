use thiserror::Error;

/// Errors returned by the model registry, feature store and engines.
///
/// Every variant is produced before any state is mutated, so a failed call
/// leaves the registry exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    #[error("Validation failed: {reason}")]
    Validation { reason: String },

    #[error("Capacity reached for {resource}: limit {limit}")]
    Capacity { resource: String, limit: u64 },

    #[error("Model not found: {model_id}")]
    NotFound { model_id: String },

    #[error("Model {model_id} is {actual}, operation requires {expected}")]
    InvalidState {
        model_id: String,
        expected: String,
        actual: String,
    },

    #[error("Insufficient data points for training: need at least {required}, got {actual}")]
    InsufficientData { required: u64, actual: u64 },

    #[error("Model {model_id} received none of its required features: {}", required.join(", "))]
    MissingFeature {
        model_id: String,
        required: Vec<String>,
    },
}

impl AnalyticsError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    pub fn not_found(model_id: impl Into<String>) -> Self {
        Self::NotFound {
            model_id: model_id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
