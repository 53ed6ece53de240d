pub mod activation;
pub mod agent;
pub mod error;
pub mod layers;
pub mod loss;
pub mod math;
pub mod network;
pub mod optim;
pub mod thread;
pub mod train;

// Convenience re-exports
pub use activation::{ReLU, Sigmoid};
pub use agent::{Action, EnvGym, Environment, PongAgent, SarsaAgent, SessionConfig, State};
pub use error::{Error, Result};
pub use layers::{Dense, Init, Layer};
pub use loss::{BceLoss, Loss, LossType, MseLoss};
pub use math::{matrix_product, transpose_2d, Element, Tensor};
pub use network::{LayerSpec, Network, NetworkSpec};
pub use optim::{Adam, Optimizer, OptimizerState, OptimizerType, PerParameter, Sgd};
pub use thread::{ParallelExecutor, ThreadPool};
pub use train::{train_loop, EpochStats, TrainConfig};
