use serde::{Deserialize, Serialize};

/// Error type for risk engine configuration validation
#[derive(Debug, thiserror::Error)]
pub enum RiskConfigError {
    #[error("Invalid RiskConfig: {0}")]
    ValidationError(String),
}

pub const DEFAULT_REFERENCE_ASSETS: &[&str] = &["BTC", "ETH", "SPY", "QQQ", "GLD"];

/// Risk engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    pub var_confidence: f64, // One-sided confidence for parametric VaR (0.95 -> z = 1.645)
    pub expected_shortfall_multiplier: f64, // ES = VaR * multiplier, within [1.5, 2.0]
    pub default_volatility: f64, // Used when the snapshot carries no usable volatility
    pub reference_assets: Vec<String>, // Correlation targets
}

impl RiskConfig {
    pub fn validate(&self) -> Result<(), RiskConfigError> {
        if !(self.var_confidence > 0.5 && self.var_confidence < 1.0) {
            return Err(RiskConfigError::ValidationError(format!(
                "var_confidence must be in (0.5, 1.0), got {}",
                self.var_confidence
            )));
        }
        if !(1.5..=2.0).contains(&self.expected_shortfall_multiplier) {
            return Err(RiskConfigError::ValidationError(format!(
                "expected_shortfall_multiplier must be in [1.5, 2.0], got {}",
                self.expected_shortfall_multiplier
            )));
        }
        if !(0.2..=0.5).contains(&self.default_volatility) {
            return Err(RiskConfigError::ValidationError(format!(
                "default_volatility must be in [0.2, 0.5], got {}",
                self.default_volatility
            )));
        }
        if self.reference_assets.is_empty() {
            return Err(RiskConfigError::ValidationError(
                "reference_assets must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            var_confidence: 0.95,
            expected_shortfall_multiplier: 1.75,
            default_volatility: 0.2,
            reference_assets: DEFAULT_REFERENCE_ASSETS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
