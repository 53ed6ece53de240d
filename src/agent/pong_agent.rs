use std::marker::PhantomData;

use crate::agent::state::{scalar_output, Action, State};
use crate::error::Result;
use crate::math::{Element, Tensor};

/// Greedy policy over any forward function producing a scalar score.
pub struct PongAgent<T, F> {
    forward: F,
    _element: PhantomData<fn() -> T>,
}

impl<T, F> PongAgent<T, F>
where
    T: Element,
    F: FnMut(&Tensor<T, 2>) -> Result<Tensor<T, 2>>,
{
    pub fn new(forward: F) -> PongAgent<T, F> {
        PongAgent {
            forward,
            _element: PhantomData,
        }
    }

    pub fn act(&mut self, state: &State) -> Result<Action> {
        let output = (self.forward)(&state.to_tensor())?;
        Ok(Action::from_output(scalar_output(&output)?))
    }
}
