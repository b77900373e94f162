//! Point-in-time risk from an arbitrary feature snapshot.
//!
//! Everything here is a function of the snapshot and the immutable
//! `RiskConfig`; the engine holds no mutable state and takes no lock.
//! Missing or non-finite inputs fall back to defaults, so an empty snapshot
//! still yields a complete assessment.

use crate::domain::errors::Result;
use crate::domain::ml::feature::FeatureSnapshot;
use crate::domain::ml::feature_registry::{MARKET_CAP, PRICE_CHANGE, VOLATILITY, VOLUME};
use crate::domain::risk::risk_assessment::{
    RiskAssessment, RiskFactor, RiskLevel, generate_risk_assessment_id,
};
use crate::domain::risk::risk_config::{RiskConfig, RiskConfigError};
use chrono::Utc;
use rand::Rng;
use statrs::distribution::{ContinuousCDF, Normal};
use std::collections::HashMap;
use tracing::debug;

// Risk score weights
const VOLATILITY_WEIGHT: f64 = 0.4;
const VOLUME_WEIGHT: f64 = 0.2;
const PRICE_CHANGE_WEIGHT: f64 = 0.3;
const MARKET_CAP_WEIGHT: f64 = 0.1;
const SENTIMENT_WEIGHT: f64 = 0.1;

// Normalization scales
const VOLUME_SCALE: f64 = 1_000_000.0;
const MARKET_CAP_SCALE: f64 = 1_000_000_000.0;

// Factor thresholds
const HIGH_VOLATILITY_THRESHOLD: f64 = 0.3;
const HIGH_VOLUME_THRESHOLD: f64 = 500_000.0;
const LARGE_MOVE_THRESHOLD: f64 = 0.1;

pub const MARKET_SENTIMENT: &str = "Market Sentiment";

#[derive(Debug, Clone)]
pub struct RiskEngine {
    config: RiskConfig,
    /// One-sided standard normal quantile at `var_confidence`
    z_score: f64,
}

impl RiskEngine {
    pub fn new(config: RiskConfig) -> std::result::Result<Self, RiskConfigError> {
        config.validate()?;
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| RiskConfigError::ValidationError(e.to_string()))?;
        let z_score = normal.inverse_cdf(config.var_confidence);
        Ok(Self { config, z_score })
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    pub fn z_score(&self) -> f64 {
        self.z_score
    }

    /// Compose every metric into a single assessment. Never fails.
    pub fn assess(&self, asset: &str, features: &FeatureSnapshot) -> Result<RiskAssessment> {
        let volatility = self.calculate_volatility(features);
        let value_at_risk = self.calculate_var(features);
        let expected_shortfall = self.calculate_expected_shortfall(value_at_risk);
        let risk_score = Self::calculate_risk_score(features);
        let risk_level = Self::classify_risk_level(risk_score);
        let correlation = self.calculate_correlations(asset, features);
        let factors = Self::identify_risk_factors(features);

        debug!(
            "RiskEngine: {} score={:.3} ({}) vol={:.3} VaR={:.4} ES={:.4} factors={}",
            asset,
            risk_score,
            risk_level,
            volatility,
            value_at_risk,
            expected_shortfall,
            factors.len()
        );

        Ok(RiskAssessment {
            id: generate_risk_assessment_id(),
            asset: asset.to_string(),
            risk_score,
            risk_level,
            value_at_risk,
            expected_shortfall,
            volatility,
            correlation,
            factors,
            timestamp: Utc::now(),
        })
    }

    /// Supplied `volatility` by magnitude, or the configured default when it
    /// is absent, zero or non-finite. Always positive.
    pub fn calculate_volatility(&self, features: &FeatureSnapshot) -> f64 {
        match finite(features, VOLATILITY) {
            Some(v) if v != 0.0 => v.abs(),
            _ => self.config.default_volatility,
        }
    }

    /// Parametric VaR under normal returns: `-z * volatility` (z = 1.645 at 95%).
    pub fn calculate_var(&self, features: &FeatureSnapshot) -> f64 {
        -self.z_score * self.calculate_volatility(features)
    }

    /// Tail loss beyond VaR; more negative than `value_at_risk` by the
    /// configured multiplier.
    pub fn calculate_expected_shortfall(&self, value_at_risk: f64) -> f64 {
        -value_at_risk.abs() * self.config.expected_shortfall_multiplier
    }

    /// Placeholder correlations against the reference set: 1.0 for the asset
    /// itself, otherwise a synthetic value in [-1, 1].
    pub fn calculate_correlations(
        &self,
        asset: &str,
        _features: &FeatureSnapshot,
    ) -> HashMap<String, f64> {
        let mut rng = rand::rng();
        self.config
            .reference_assets
            .iter()
            .map(|reference| {
                let corr = if reference.eq_ignore_ascii_case(asset) {
                    1.0
                } else {
                    rng.random_range(-1.0..=1.0)
                };
                (reference.clone(), corr)
            })
            .collect()
    }

    /// Weighted blend of volatility, normalized volume, absolute price change
    /// and inverse normalized market cap, clamped to [0, 1].
    pub fn calculate_risk_score(features: &FeatureSnapshot) -> f64 {
        let mut score = 0.0;

        if let Some(volatility) = finite(features, VOLATILITY) {
            score += volatility.abs() * VOLATILITY_WEIGHT;
        }
        if let Some(volume) = finite(features, VOLUME) {
            score += (volume / VOLUME_SCALE).clamp(0.0, 1.0) * VOLUME_WEIGHT;
        }
        if let Some(change) = finite(features, PRICE_CHANGE) {
            score += change.abs() * PRICE_CHANGE_WEIGHT;
        }
        if let Some(market_cap) = finite(features, MARKET_CAP).filter(|m| *m > 0.0) {
            score += (1.0 - (market_cap / MARKET_CAP_SCALE).min(1.0)) * MARKET_CAP_WEIGHT;
        }

        score.clamp(0.0, 1.0)
    }

    pub fn classify_risk_level(score: f64) -> RiskLevel {
        RiskLevel::from_score(score)
    }

    /// Threshold-triggered factors, followed by the ever-present market
    /// sentiment factor.
    pub fn identify_risk_factors(features: &FeatureSnapshot) -> Vec<RiskFactor> {
        let mut factors = Vec::new();

        if let Some(volatility) = finite(features, VOLATILITY).map(f64::abs) {
            if volatility > HIGH_VOLATILITY_THRESHOLD {
                factors.push(RiskFactor::new(
                    "High Volatility",
                    volatility,
                    VOLATILITY_WEIGHT,
                    "Asset shows high price volatility",
                ));
            }
        }

        if let Some(volume) = finite(features, VOLUME) {
            if volume > HIGH_VOLUME_THRESHOLD {
                factors.push(RiskFactor::new(
                    "High Volume",
                    volume / VOLUME_SCALE,
                    VOLUME_WEIGHT,
                    "Unusually high trading volume",
                ));
            }
        }

        if let Some(change) = finite(features, PRICE_CHANGE).map(f64::abs) {
            if change > LARGE_MOVE_THRESHOLD {
                factors.push(RiskFactor::new(
                    "Large Price Movement",
                    change,
                    PRICE_CHANGE_WEIGHT,
                    "Significant price change detected",
                ));
            }
        }

        factors.push(RiskFactor::new(
            MARKET_SENTIMENT,
            0.5 + rand::rng().random_range(0.0..=0.5),
            SENTIMENT_WEIGHT,
            "General market sentiment impact",
        ));

        factors
    }
}

fn finite(features: &FeatureSnapshot, name: &str) -> Option<f64> {
    features.get(name).copied().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RiskEngine {
        RiskEngine::new(RiskConfig::default()).unwrap()
    }

    fn snapshot(entries: &[(&str, f64)]) -> FeatureSnapshot {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_var_at_twenty_percent_volatility() {
        let var = engine().calculate_var(&snapshot(&[("volatility", 0.2)]));
        assert!((var - (-0.329)).abs() < 0.001, "VaR was {}", var);
    }

    #[test]
    fn test_var_is_linear_in_volatility() {
        let engine = engine();
        let v1 = engine.calculate_var(&snapshot(&[("volatility", 0.1)]));
        let v2 = engine.calculate_var(&snapshot(&[("volatility", 0.6)]));
        let slope = (v2 - v1) / 0.5;
        assert!((slope - (-1.645)).abs() < 0.001, "slope was {}", slope);
    }

    #[test]
    fn test_volatility_fallbacks() {
        let engine = engine();
        assert_eq!(engine.calculate_volatility(&FeatureSnapshot::new()), 0.2);
        assert_eq!(engine.calculate_volatility(&snapshot(&[("volatility", 0.0)])), 0.2);
        assert_eq!(engine.calculate_volatility(&snapshot(&[("volatility", f64::NAN)])), 0.2);
        assert_eq!(engine.calculate_volatility(&snapshot(&[("volatility", -0.4)])), 0.4);
        assert_eq!(engine.calculate_volatility(&snapshot(&[("volatility", 0.45)])), 0.45);
    }

    #[test]
    fn test_expected_shortfall_beyond_var() {
        let engine = engine();
        let var = engine.calculate_var(&snapshot(&[("volatility", 0.3)]));
        let es = engine.calculate_expected_shortfall(var);
        assert!(es < var);
        assert!((es / var - 1.75).abs() < 1e-9);
    }

    #[test]
    fn test_correlations_cover_reference_set() {
        let correlations = engine().calculate_correlations("ETH", &FeatureSnapshot::new());
        assert_eq!(correlations.len(), 5);
        for asset in ["BTC", "ETH", "SPY", "QQQ", "GLD"] {
            let c = correlations[asset];
            assert!((-1.0..=1.0).contains(&c));
        }
        assert_eq!(correlations["ETH"], 1.0);
    }

    #[test]
    fn test_risk_score_components() {
        assert_eq!(RiskEngine::calculate_risk_score(&FeatureSnapshot::new()), 0.0);

        let score = RiskEngine::calculate_risk_score(&snapshot(&[
            ("volatility", 0.5),
            ("volume", 500_000.0),
            ("price_change", -0.2),
            ("market_cap", 500_000_000.0),
        ]));
        // 0.2 + 0.1 + 0.06 + 0.05
        assert!((score - 0.41).abs() < 1e-9);

        let capped = RiskEngine::calculate_risk_score(&snapshot(&[
            ("volatility", 3.0),
            ("price_change", 2.0),
        ]));
        assert_eq!(capped, 1.0);
    }

    #[test]
    fn test_risk_level_classification() {
        assert_eq!(RiskEngine::classify_risk_level(0.25), RiskLevel::Low);
        assert_eq!(RiskEngine::classify_risk_level(0.55), RiskLevel::Medium);
        assert_eq!(RiskEngine::classify_risk_level(0.7), RiskLevel::High);
        assert_eq!(RiskEngine::classify_risk_level(0.85), RiskLevel::Critical);
    }

    #[test]
    fn test_empty_snapshot_yields_only_sentiment() {
        let factors = RiskEngine::identify_risk_factors(&FeatureSnapshot::new());
        assert_eq!(factors.len(), 1);
        assert_eq!(factors[0].name, MARKET_SENTIMENT);
        assert!(factors[0].impact >= 0.5 && factors[0].impact <= 1.0);
    }

    #[test]
    fn test_all_factors_triggered() {
        let factors = RiskEngine::identify_risk_factors(&snapshot(&[
            ("volatility", 0.4),
            ("volume", 600_000.0),
            ("price_change", 0.12),
        ]));
        assert_eq!(factors.len(), 4);
        assert_eq!(factors.last().unwrap().name, MARKET_SENTIMENT);
        for factor in &factors {
            assert!(factor.impact > 0.0);
            assert!(factor.weight > 0.0 && factor.weight <= 1.0);
        }
    }

    #[test]
    fn test_nan_confidence_rejected_before_quantile() {
        let config = RiskConfig {
            var_confidence: f64::NAN,
            ..Default::default()
        };
        assert!(RiskEngine::new(config).is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RiskConfig {
            expected_shortfall_multiplier: 1.2,
            ..Default::default()
        };
        assert!(RiskEngine::new(config).is_err());
    }
}
