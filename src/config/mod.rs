//! Configuration module for quantreg.
//!
//! Structured configuration loading from environment variables, organized by
//! concern: the analytics registry (including risk parameters) and
//! observability.

mod analytics_config;
mod observability_config;

pub use analytics_config::{
    AnalyticsConfig, DEFAULT_EVALUATION_INTERVAL, DEFAULT_MAX_FEATURES, DEFAULT_MAX_MODELS,
    DEFAULT_MIN_DATA_POINTS, DEFAULT_MODEL_RETENTION_DAYS, DEFAULT_PREDICTION_HORIZON,
    DEFAULT_TRAINING_INTERVAL,
};
pub use observability_config::{LogFormat, ObservabilityEnvConfig};
