// Model registry, feature store and prediction
pub mod ml;

// Registry metrics
pub mod monitoring;

// Point-in-time risk assessment
pub mod risk_management;

// Facade owning the shared state
pub mod analytics;
