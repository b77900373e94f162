// Risk assessment domain
pub mod risk_assessment;
pub mod risk_config;

pub use risk_assessment::{RiskAssessment, RiskFactor, RiskLevel};
pub use risk_config::{RiskConfig, RiskConfigError};
