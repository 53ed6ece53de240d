use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::{Element, Tensor};

/// Observation of the paddle game, each coordinate normalized to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub ball_x: f64,
    pub ball_y: f64,
    pub paddle_y: f64,
}

impl State {
    /// The 1×3 network input `[ball_x, ball_y, paddle_y]`.
    pub fn to_tensor<T: Element>(&self) -> Tensor<T, 2> {
        let mut input = Tensor::zeros([1, 3]);
        input[[0, 0]] = T::from_f64(self.ball_x);
        input[[0, 1]] = T::from_f64(self.ball_y);
        input[[0, 2]] = T::from_f64(self.paddle_y);
        input
    }
}

/// Paddle move: one step down, stay, or one step up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Down,
    Stay,
    Up,
}

/// Dead zone around zero in which the policy output means "stay".
const ACTION_THRESHOLD: f64 = 0.1;

impl Action {
    pub const ALL: [Action; 3] = [Action::Down, Action::Stay, Action::Up];

    /// Thresholds a scalar network output into an action.
    pub fn from_output<T: Element>(value: T) -> Action {
        let value = value.as_f64();
        if value > ACTION_THRESHOLD {
            Action::Up
        } else if value < -ACTION_THRESHOLD {
            Action::Down
        } else {
            Action::Stay
        }
    }

    /// -1, 0 or +1.
    pub fn direction(self) -> f64 {
        match self {
            Action::Down => -1.0,
            Action::Stay => 0.0,
            Action::Up => 1.0,
        }
    }
}

/// First element of a policy network's output.
pub(crate) fn scalar_output<T: Element>(output: &Tensor<T, 2>) -> Result<T> {
    output.as_slice().first().copied().ok_or_else(|| Error::ShapeMismatch {
        expected: vec![1, 1],
        got: output.shape().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(Action::from_output(0.1f64), Action::Stay);
        assert_eq!(Action::from_output(0.11f64), Action::Up);
        assert_eq!(Action::from_output(-0.1f64), Action::Stay);
        assert_eq!(Action::from_output(-0.5f32), Action::Down);
    }
}
