use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Bucketed risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// `score < 0.3` Low, `< 0.6` Medium, `< 0.8` High, otherwise Critical.
    pub fn from_score(score: f64) -> Self {
        if score < 0.3 {
            RiskLevel::Low
        } else if score < 0.6 {
            RiskLevel::Medium
        } else if score < 0.8 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        };
        write!(f, "{}", s)
    }
}

/// A contributing factor behind a risk assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    /// Positive magnitude of the factor
    pub impact: f64,
    /// Relative weight in (0, 1]
    pub weight: f64,
    pub description: String,
}

impl RiskFactor {
    pub fn new(name: &str, impact: f64, weight: f64, description: &str) -> Self {
        Self {
            name: name.to_string(),
            impact,
            weight,
            description: description.to_string(),
        }
    }
}

/// Point-in-time risk view of one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub id: String,
    pub asset: String,
    /// In [0, 1]
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    /// Always negative (a loss)
    pub value_at_risk: f64,
    /// Always more negative than `value_at_risk`
    pub expected_shortfall: f64,
    /// Always positive
    pub volatility: f64,
    /// Reference asset -> correlation in [-1, 1]
    pub correlation: HashMap<String, f64>,
    /// Ordered; always ends with "Market Sentiment"
    pub factors: Vec<RiskFactor>,
    pub timestamp: DateTime<Utc>,
}

pub fn generate_risk_assessment_id() -> String {
    format!("risk_{}", Uuid::new_v4().simple())
}
