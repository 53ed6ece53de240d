use serde::{Deserialize, Serialize};

use crate::math::Element;
use crate::optim::adam::Adam;
use crate::optim::optimizer::Optimizer;
use crate::optim::per_parameter::PerParameter;
use crate::optim::sgd::Sgd;

/// Selects the optimizer strategy `train_loop` builds for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptimizerType {
    #[default]
    Sgd,
    Adam {
        #[serde(default = "default_beta1")]
        beta1: f64,
        #[serde(default = "default_beta2")]
        beta2: f64,
        #[serde(default = "default_epsilon")]
        epsilon: f64,
    },
}

/// How optimizer state is shared between parameter tensors.
///
/// - `PerParameter`: one instance per weight/bias tensor (correct Adam).
/// - `Shared`      : a single instance for every tensor in the network.
///   Reproduces legacy trajectories; Adam's moments are then sized by the
///   first layer's weights and reused for everything else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerState {
    #[default]
    PerParameter,
    Shared,
}

fn default_beta1() -> f64 {
    0.9
}

fn default_beta2() -> f64 {
    0.999
}

fn default_epsilon() -> f64 {
    1e-8
}

impl OptimizerType {
    pub fn adam() -> OptimizerType {
        OptimizerType::Adam {
            beta1: default_beta1(),
            beta2: default_beta2(),
            epsilon: default_epsilon(),
        }
    }

    /// Builds a boxed optimizer for one training run.
    pub fn build<T: Element>(
        &self,
        learning_rate: T,
        state: OptimizerState,
    ) -> Box<dyn Optimizer<T>> {
        match (*self, state) {
            (OptimizerType::Sgd, _) => Box::new(Sgd::new(learning_rate)),
            (OptimizerType::Adam { beta1, beta2, epsilon }, OptimizerState::PerParameter) => {
                Box::new(PerParameter::new(move || {
                    Adam::with_hyperparams(
                        learning_rate,
                        T::from_f64(beta1),
                        T::from_f64(beta2),
                        T::from_f64(epsilon),
                    )
                }))
            }
            (OptimizerType::Adam { beta1, beta2, epsilon }, OptimizerState::Shared) => {
                Box::new(Adam::with_hyperparams(
                    learning_rate,
                    T::from_f64(beta1),
                    T::from_f64(beta2),
                    T::from_f64(epsilon),
                ))
            }
        }
    }
}
