//! Analytics registry configuration, with defaults and environment loading.
//!
//! Any zero-valued field falls back to its default when the configuration
//! is finalized with [`AnalyticsConfig::with_defaults`].

use crate::domain::risk::risk_config::RiskConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const DEFAULT_MAX_MODELS: u64 = 50;
pub const DEFAULT_MAX_FEATURES: u64 = 10_000;
pub const DEFAULT_TRAINING_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_EVALUATION_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);
pub const DEFAULT_PREDICTION_HORIZON: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_MIN_DATA_POINTS: u64 = 1_000;
pub const DEFAULT_MODEL_RETENTION_DAYS: u64 = 365;

/// Process-wide configuration, supplied once at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub max_models: u64,
    /// Per `<asset>_<feature>` bucket
    pub max_features: u64,
    pub training_interval: Duration,
    pub evaluation_interval: Duration,
    /// Horizon used when a caller does not supply one
    pub prediction_horizon: Duration,
    pub min_data_points: u64,
    pub model_retention_days: u64,
    /// Consumed by external schedulers; the registry never trains on its own
    pub enable_auto_training: bool,
    /// Optional accuracy floor for deployment, disabled by default
    pub min_deployment_accuracy: Option<f64>,
    pub risk: RiskConfig,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            max_models: DEFAULT_MAX_MODELS,
            max_features: DEFAULT_MAX_FEATURES,
            training_interval: DEFAULT_TRAINING_INTERVAL,
            evaluation_interval: DEFAULT_EVALUATION_INTERVAL,
            prediction_horizon: DEFAULT_PREDICTION_HORIZON,
            min_data_points: DEFAULT_MIN_DATA_POINTS,
            model_retention_days: DEFAULT_MODEL_RETENTION_DAYS,
            enable_auto_training: false,
            min_deployment_accuracy: None,
            risk: RiskConfig::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Replace every zero-valued field with its default.
    pub fn with_defaults(mut self) -> Self {
        if self.max_models == 0 {
            self.max_models = DEFAULT_MAX_MODELS;
        }
        if self.max_features == 0 {
            self.max_features = DEFAULT_MAX_FEATURES;
        }
        if self.training_interval.is_zero() {
            self.training_interval = DEFAULT_TRAINING_INTERVAL;
        }
        if self.evaluation_interval.is_zero() {
            self.evaluation_interval = DEFAULT_EVALUATION_INTERVAL;
        }
        if self.prediction_horizon.is_zero() {
            self.prediction_horizon = DEFAULT_PREDICTION_HORIZON;
        }
        if self.min_data_points == 0 {
            self.min_data_points = DEFAULT_MIN_DATA_POINTS;
        }
        if self.model_retention_days == 0 {
            self.model_retention_days = DEFAULT_MODEL_RETENTION_DAYS;
        }
        self
    }

    pub fn from_env() -> Result<Self> {
        let risk_defaults = RiskConfig::default();
        let risk = RiskConfig {
            var_confidence: Self::parse_f64("RISK_VAR_CONFIDENCE", risk_defaults.var_confidence)?,
            expected_shortfall_multiplier: Self::parse_f64(
                "RISK_ES_MULTIPLIER",
                risk_defaults.expected_shortfall_multiplier,
            )?,
            default_volatility: Self::parse_f64(
                "RISK_DEFAULT_VOLATILITY",
                risk_defaults.default_volatility,
            )?,
            reference_assets: risk_defaults.reference_assets,
        };
        risk.validate().context("Invalid risk configuration")?;

        let min_deployment_accuracy = match env::var("ANALYTICS_MIN_DEPLOYMENT_ACCURACY") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<f64>()
                    .context("Failed to parse ANALYTICS_MIN_DEPLOYMENT_ACCURACY")?,
            ),
            _ => None,
        };

        let config = Self {
            max_models: Self::parse_u64("ANALYTICS_MAX_MODELS", DEFAULT_MAX_MODELS)?,
            max_features: Self::parse_u64("ANALYTICS_MAX_FEATURES", DEFAULT_MAX_FEATURES)?,
            training_interval: Duration::from_secs(Self::parse_u64(
                "ANALYTICS_TRAINING_INTERVAL_SECS",
                DEFAULT_TRAINING_INTERVAL.as_secs(),
            )?),
            evaluation_interval: Duration::from_secs(Self::parse_u64(
                "ANALYTICS_EVALUATION_INTERVAL_SECS",
                DEFAULT_EVALUATION_INTERVAL.as_secs(),
            )?),
            prediction_horizon: Duration::from_secs(Self::parse_u64(
                "ANALYTICS_PREDICTION_HORIZON_SECS",
                DEFAULT_PREDICTION_HORIZON.as_secs(),
            )?),
            min_data_points: Self::parse_u64("ANALYTICS_MIN_DATA_POINTS", DEFAULT_MIN_DATA_POINTS)?,
            model_retention_days: Self::parse_u64(
                "ANALYTICS_MODEL_RETENTION_DAYS",
                DEFAULT_MODEL_RETENTION_DAYS,
            )?,
            enable_auto_training: Self::parse_bool("ANALYTICS_AUTO_TRAINING", false),
            min_deployment_accuracy,
            risk,
        };

        Ok(config.with_defaults())
    }

    fn parse_u64(key: &str, default: u64) -> Result<u64> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<u64>()
            .context(format!("Failed to parse {}", key))
    }

    fn parse_f64(key: &str, default: f64) -> Result<f64> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<f64>()
            .context(format!("Failed to parse {}", key))
    }

    fn parse_bool(key: &str, default: bool) -> bool {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<bool>()
            .unwrap_or(default)
    }
}
