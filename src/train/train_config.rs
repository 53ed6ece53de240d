use std::sync::mpsc;
use std::sync::{atomic::AtomicBool, Arc};

use crate::loss::loss_type::LossType;
use crate::optim::optimizer_type::{OptimizerState, OptimizerType};
use crate::train::epoch_stats::EpochStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`         : total number of full passes over the training data
/// - `batch_size`     : samples per mini-batch; use `1` for online updates
/// - `learning_rate`  : step size handed to the optimizer
/// - `loss_type`      : which loss strategy to build per batch
/// - `optimizer`      : SGD or Adam (with its hyperparameters)
/// - `optimizer_state`: one optimizer per parameter tensor, or one shared
/// - `progress_tx`    : optional channel; one `EpochStats` per epoch. If the
///                       receiver is dropped the loop stops early.
/// - `stop_flag`      : optional flag checked at every epoch boundary.
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub loss_type: LossType,
    pub optimizer: OptimizerType,
    pub optimizer_state: OptimizerState,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// MSE + SGD with per-parameter state, no progress channel, no stop flag.
    pub fn new(epochs: usize, batch_size: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            learning_rate,
            loss_type: LossType::Mse,
            optimizer: OptimizerType::Sgd,
            optimizer_state: OptimizerState::PerParameter,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn loss(mut self, loss_type: LossType) -> Self {
        self.loss_type = loss_type;
        self
    }

    pub fn optimizer(mut self, optimizer: OptimizerType, state: OptimizerState) -> Self {
        self.optimizer = optimizer;
        self.optimizer_state = state;
        self
    }
}
