use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::Rng;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::loss::bce::BceLoss;
use crate::loss::loss_fn::Loss;
use crate::loss::loss_type::LossType;
use crate::loss::mse::MseLoss;
use crate::math::{Element, Tensor};
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs and returns the statistics of
/// every completed epoch.
///
/// One optimizer is built for the whole run from `config.optimizer` and
/// `config.optimizer_state`; each epoch reshuffles the rows with `rng`.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// # Errors
/// `InvalidTraining` if `x` is empty, the row counts of `x` and `y` differ,
/// or `batch_size == 0`; any shape error raised by the layers.
#[instrument(
    skip_all,
    fields(samples = x.rows(), epochs = config.epochs, loss = ?config.loss_type)
)]
pub fn train_loop<T, R>(
    network: &mut Network<T>,
    x: &Tensor<T, 2>,
    y: &Tensor<T, 2>,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<Vec<EpochStats>>
where
    T: Element,
    R: Rng + ?Sized,
{
    let mut optimizer = config
        .optimizer
        .build(T::from_f64(config.learning_rate), config.optimizer_state);
    let batch = config.batch_size;
    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            break;
        }

        let t_start = Instant::now();

        // ── One full pass over the training data ───────────────────────────
        let train_loss = match config.loss_type {
            LossType::Mse => {
                network.run_epoch::<MseLoss<T>, R>(x, y, batch, optimizer.as_mut(), rng)?
            }
            LossType::BinaryCrossEntropy => {
                network.run_epoch::<BceLoss<T>, R>(x, y, batch, optimizer.as_mut(), rng)?
            }
        };

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss: train_loss.as_f64(),
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        debug!(
            epoch,
            train_loss = stats.train_loss,
            elapsed_ms = stats.elapsed_ms,
            "epoch finished"
        );
        history.push(stats.clone());

        // ── Emit progress ─────────────────────────────────────────────────
        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                break;
            }
        }
    }

    Ok(history)
}

/// Loss of the whole dataset taken as one batch, via the cache-free path.
pub fn evaluate_loss<T: Element>(
    network: &Network<T>,
    x: &Tensor<T, 2>,
    y: &Tensor<T, 2>,
    loss_type: LossType,
) -> Result<f64> {
    let output = network.infer(x)?;
    let loss = match loss_type {
        LossType::Mse => MseLoss::new(&output, y)?.loss(),
        LossType::BinaryCrossEntropy => BceLoss::new(&output, y)?.loss(),
    };
    Ok(loss.as_f64())
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}
