use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Caller-supplied mapping of named numeric indicators.
pub type FeatureSnapshot = HashMap<String, f64>;

/// A single time-stamped market observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketFeature {
    pub timestamp: DateTime<Utc>,
    pub asset: String,
    /// Feature name, e.g. "price" or "volatility"
    pub feature: String,
    pub value: f64,
    /// Where the observation came from (exchange, feed, ...)
    pub source: String,
}

impl MarketFeature {
    pub fn new(
        timestamp: DateTime<Utc>,
        asset: impl Into<String>,
        feature: impl Into<String>,
        value: f64,
        source: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            asset: asset.into(),
            feature: feature.into(),
            value,
            source: source.into(),
        }
    }

    /// Feature store bucket key, `<asset>_<feature>`
    pub fn key(&self) -> String {
        feature_key(&self.asset, &self.feature)
    }
}

pub fn feature_key(asset: &str, feature: &str) -> String {
    format!("{}_{}", asset, feature)
}
