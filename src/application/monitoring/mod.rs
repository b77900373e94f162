// Registry metrics modules
pub mod metrics_aggregator;
