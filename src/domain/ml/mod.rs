// Model, feature and prediction types
pub mod feature;
pub mod feature_registry;
pub mod model;
pub mod prediction;

pub use feature::{FeatureSnapshot, MarketFeature};
pub use model::{
    Hyperparameters, Model, ModelPerformance, ModelStatus, ModelType, PredictionType,
    TrainingData,
};
pub use prediction::Prediction;
