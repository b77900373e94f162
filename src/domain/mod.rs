// Model, feature and prediction domain
pub mod ml;

// Risk assessment domain
pub mod risk;

// Registry summary counters
pub mod metrics;

// Domain-specific error types
pub mod errors;
