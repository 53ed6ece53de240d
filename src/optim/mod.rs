pub mod adam;
pub mod optimizer;
pub mod optimizer_type;
pub mod per_parameter;
pub mod sgd;

pub use adam::Adam;
pub use optimizer::{FromLearningRate, Optimizer};
pub use optimizer_type::{OptimizerState, OptimizerType};
pub use per_parameter::PerParameter;
pub use sgd::Sgd;
