// Risk scoring modules
pub mod risk_engine;
