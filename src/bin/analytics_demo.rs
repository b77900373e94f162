//! quantreg demo - headless walk through the registry
//!
//! Feeds a synthetic price/volume series into the feature store, trains and
//! deploys one model on it, then prints a prediction, a risk assessment and a
//! metrics snapshot.
//!
//! # Usage
//! ```sh
//! LOG_FORMAT=json cargo run --bin analytics_demo -- --asset BTC --observations 1500
//! ```
//!
//! # Environment Variables
//! - `ANALYTICS_*` / `RISK_*` - registry configuration (see `AnalyticsConfig::from_env`)
//! - `OBSERVABILITY_ENABLED` - print the JSON metrics snapshot (default: true)
//! - `LOG_FORMAT` - `pretty` (default) or `json`

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use quantreg::application::analytics::PredictiveAnalytics;
use quantreg::config::{AnalyticsConfig, LogFormat, ObservabilityEnvConfig};
use quantreg::domain::ml::feature::MarketFeature;
use quantreg::domain::ml::feature_registry::{PRICE, PRICE_CHANGE, VOLATILITY, VOLUME};
use quantreg::domain::ml::model::{Hyperparameters, ModelType, PredictionType};
use quantreg::infrastructure::observability::{Metrics, MetricsReporter};
use rand::Rng;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "analytics_demo", about = "Drive the model registry end to end")]
struct Args {
    /// Asset symbol to model
    #[arg(long, default_value = "BTC")]
    asset: String,

    /// Observations generated per feature
    #[arg(long, default_value_t = 1_200)]
    observations: usize,

    /// Starting price of the synthetic series
    #[arg(long, default_value_t = 100.0)]
    start_price: f64,
}

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let observability = ObservabilityEnvConfig::from_env();

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into());
    match observability.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init(),
    }

    info!("quantreg demo {} starting...", env!("CARGO_PKG_VERSION"));

    let config = AnalyticsConfig::from_env()?;
    let metrics = Metrics::new()?;
    let analytics = PredictiveAnalytics::new(config)?.with_metrics(metrics.clone());

    // Synthetic random walk
    let mut rng = rand::rng();
    let start = Utc::now() - Duration::minutes(args.observations as i64);
    let mut price = args.start_price;
    let mut batch = Vec::with_capacity(args.observations * 2);
    for i in 0..args.observations {
        let at = start + Duration::minutes(i as i64);
        price *= 1.0 + rng.random_range(-0.01..0.01);
        let volume = rng.random_range(100_000.0..900_000.0);
        for feature in [
            MarketFeature::new(at, &args.asset, PRICE, price, "demo"),
            MarketFeature::new(at, &args.asset, VOLUME, volume, "demo"),
        ] {
            analytics.add_feature(feature.clone())?;
            batch.push(feature);
        }
    }
    info!(
        "Loaded {} observations for {}",
        analytics.feature_count(),
        args.asset
    );

    let model = analytics.create_model(
        &format!("{}-price-lstm", args.asset.to_lowercase()),
        ModelType::Lstm,
        &args.asset,
        PredictionType::Price,
        &[PRICE.to_string(), VOLUME.to_string()],
        &Hyperparameters::from([("hidden_units".to_string(), serde_json::json!(64))]),
    )?;
    analytics
        .train_model(&model.id, &batch)
        .context("Training failed; raise --observations or lower ANALYTICS_MIN_DATA_POINTS")?;
    analytics.deploy_model(&model.id)?;

    let snapshot = analytics.latest_snapshot(&args.asset);
    let prediction =
        analytics.make_prediction(&model.id, &snapshot, analytics.default_horizon())?;
    info!(
        "Prediction for {}: {:.4} (confidence {:.2}, horizon {:?})",
        prediction.asset, prediction.value, prediction.confidence, prediction.horizon
    );

    let mut risk_snapshot = snapshot.clone();
    risk_snapshot.insert(VOLATILITY.to_string(), 0.35);
    risk_snapshot.insert(
        PRICE_CHANGE.to_string(),
        (price - args.start_price) / args.start_price,
    );
    let assessment = analytics.assess_risk(&args.asset, &risk_snapshot)?;
    info!(
        "Risk for {}: {} (score {:.3}, VaR {:.4}, ES {:.4}, {} factors)",
        assessment.asset,
        assessment.risk_level,
        assessment.risk_score,
        assessment.value_at_risk,
        assessment.expected_shortfall,
        assessment.factors.len()
    );

    if observability.enabled {
        MetricsReporter::new(metrics).report_once(&analytics);
    } else {
        info!("Metrics reporting disabled.");
    }

    Ok(())
}
