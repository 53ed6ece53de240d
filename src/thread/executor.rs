use std::sync::Arc;

use crate::agent::state::{scalar_output, Action, State};
use crate::error::Result;
use crate::math::Element;
use crate::network::network::Network;
use crate::thread::pool::{TaskHandle, ThreadPool};

/// Runs policy inference on a worker pool.
///
/// Workers share one read-only snapshot of the network and use its
/// cache-free forward pass, so no layer cache is ever written concurrently.
/// Retrain elsewhere and call [`refresh`](Self::refresh) to publish new
/// parameters.
pub struct ParallelExecutor<T: Element> {
    pool: ThreadPool,
    network: Arc<Network<T>>,
}

impl<T: Element> ParallelExecutor<T> {
    pub fn new(threads: usize, network: Network<T>) -> ParallelExecutor<T> {
        ParallelExecutor {
            pool: ThreadPool::new(threads),
            network: Arc::new(network),
        }
    }

    /// Replaces the snapshot used by tasks submitted from now on.
    pub fn refresh(&mut self, network: Network<T>) {
        self.network = Arc::new(network);
    }

    pub fn infer_async(&self, state: State) -> TaskHandle<Result<Action>> {
        let network = Arc::clone(&self.network);
        self.pool.execute(move || {
            let output = network.infer(&state.to_tensor())?;
            Ok(Action::from_output(scalar_output(&output)?))
        })
    }

    /// Finishes every queued inference, then stops the workers.
    pub fn shutdown(self) {
        self.pool.shutdown();
    }
}
