use crate::config::{AnalyticsConfig, LogFormat, ObservabilityEnvConfig};
use std::env;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::time::Duration;

// Global lock to prevent race conditions when modifying environment variables in tests
static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn get_env_lock() -> &'static Mutex<()> {
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

const ANALYTICS_VARS: &[&str] = &[
    "ANALYTICS_MAX_MODELS",
    "ANALYTICS_MAX_FEATURES",
    "ANALYTICS_TRAINING_INTERVAL_SECS",
    "ANALYTICS_EVALUATION_INTERVAL_SECS",
    "ANALYTICS_PREDICTION_HORIZON_SECS",
    "ANALYTICS_MIN_DATA_POINTS",
    "ANALYTICS_MODEL_RETENTION_DAYS",
    "ANALYTICS_AUTO_TRAINING",
    "ANALYTICS_MIN_DEPLOYMENT_ACCURACY",
    "RISK_VAR_CONFIDENCE",
    "RISK_ES_MULTIPLIER",
    "RISK_DEFAULT_VOLATILITY",
    "LOG_FORMAT",
];

fn clear_env() {
    for key in ANALYTICS_VARS {
        unsafe { env::remove_var(key) };
    }
}

#[test]
fn test_config_defaults_from_empty_env() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();

    let config = AnalyticsConfig::from_env().unwrap();
    assert_eq!(config, AnalyticsConfig::default());
}

#[test]
fn test_config_overrides() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();
    unsafe {
        env::set_var("ANALYTICS_MAX_MODELS", "12");
        env::set_var("ANALYTICS_MIN_DATA_POINTS", "250");
        env::set_var("ANALYTICS_PREDICTION_HORIZON_SECS", "3600");
        env::set_var("ANALYTICS_AUTO_TRAINING", "true");
        env::set_var("ANALYTICS_MIN_DEPLOYMENT_ACCURACY", "0.7");
        env::set_var("RISK_ES_MULTIPLIER", "2.0");
    }

    let config = AnalyticsConfig::from_env().unwrap();
    assert_eq!(config.max_models, 12);
    assert_eq!(config.min_data_points, 250);
    assert_eq!(config.prediction_horizon, Duration::from_secs(3600));
    assert!(config.enable_auto_training);
    assert_eq!(config.min_deployment_accuracy, Some(0.7));
    assert_eq!(config.risk.expected_shortfall_multiplier, 2.0);

    clear_env();
}

#[test]
fn test_zero_from_env_falls_back_to_default() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();
    unsafe { env::set_var("ANALYTICS_MAX_FEATURES", "0") };

    let config = AnalyticsConfig::from_env().unwrap();
    assert_eq!(config.max_features, 10_000);

    clear_env();
}

#[test]
fn test_malformed_value_is_error() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();
    unsafe { env::set_var("ANALYTICS_MAX_MODELS", "lots") };

    let err = AnalyticsConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("ANALYTICS_MAX_MODELS"));

    clear_env();
}

#[test]
fn test_out_of_range_risk_multiplier_is_error() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();
    unsafe { env::set_var("RISK_ES_MULTIPLIER", "3.0") };

    assert!(AnalyticsConfig::from_env().is_err());

    clear_env();
}

#[test]
fn test_json_log_format() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();
    unsafe { env::set_var("LOG_FORMAT", "JSON") };

    assert_eq!(ObservabilityEnvConfig::from_env().log_format, LogFormat::Json);

    clear_env();
}

#[test]
fn test_nan_var_confidence_is_error() {
    let _guard = get_env_lock().lock().unwrap();
    clear_env();
    unsafe { env::set_var("RISK_VAR_CONFIDENCE", "NaN") };

    let err = AnalyticsConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("Invalid risk configuration"));

    clear_env();
}
