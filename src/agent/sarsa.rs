use rand::Rng;

use crate::agent::state::{scalar_output, Action, State};
use crate::error::Result;
use crate::loss::mse::MseLoss;
use crate::math::{Element, Tensor};
use crate::network::network::Network;
use crate::optim::sgd::Sgd;

/// Trainable greedy agent refit one transition at a time.
///
/// The network scores states, not state-action pairs, so the actions of a
/// transition only identify it; the target is `r + γ·V(s')`.
pub struct SarsaAgent<'a, T: Element, R: Rng> {
    network: &'a mut Network<T>,
    gamma: T,
    learning_rate: T,
    refit_epochs: usize,
    rng: R,
}

impl<'a, T: Element, R: Rng> SarsaAgent<'a, T, R> {
    pub fn new(
        network: &'a mut Network<T>,
        gamma: T,
        learning_rate: T,
        rng: R,
    ) -> SarsaAgent<'a, T, R> {
        SarsaAgent {
            network,
            gamma,
            learning_rate,
            refit_epochs: 5,
            rng,
        }
    }

    /// Epochs spent refitting each single-sample target.
    pub fn with_refit_epochs(mut self, epochs: usize) -> Self {
        self.refit_epochs = epochs;
        self
    }

    pub fn network(&self) -> &Network<T> {
        self.network
    }

    pub fn act(&mut self, state: &State) -> Result<Action> {
        let output = self.network.predict(&state.to_tensor())?;
        Ok(Action::from_output(scalar_output(&output)?))
    }

    /// One on-policy update from `(s, a, r, s', a')`.
    ///
    /// Returns the loss of the last refit epoch.
    pub fn learn_on_policy(
        &mut self,
        state: &State,
        _action: Action,
        reward: f64,
        next_state: &State,
        _next_action: Action,
    ) -> Result<T> {
        let x = state.to_tensor::<T>();
        let next_value = scalar_output(&self.network.predict(&next_state.to_tensor())?)?;

        let mut target: Tensor<T, 2> = self.network.predict(&x)?;
        target.as_mut_slice()[0] = T::from_f64(reward) + self.gamma * next_value;

        self.network.train::<MseLoss<T>, Sgd<T>, R>(
            &x,
            &target,
            self.refit_epochs,
            1,
            self.learning_rate,
            &mut self.rng,
        )
    }
}
