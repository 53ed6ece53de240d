use serde::{Deserialize, Serialize};

/// Selects which loss strategy `train_loop` builds for every batch.
///
/// - `Mse`               : mean squared error; pair with an identity output.
/// - `BinaryCrossEntropy`: binary cross-entropy; pair with a Sigmoid output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    #[default]
    Mse,
    BinaryCrossEntropy,
}
