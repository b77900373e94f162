// Feature storage, model lifecycle and prediction modules
pub mod feature_store;
pub mod model_registry;
pub mod performance_simulator;
pub mod perturbation_predictor;
pub mod predictor;
