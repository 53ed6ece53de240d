use rand::Rng;

use crate::agent::state::{Action, State};

/// Outcome of one environment step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: State,
    pub reward: f64,
    pub done: bool,
}

/// An episodic environment driven by discrete paddle actions.
pub trait Environment {
    fn reset(&mut self) -> State;

    fn step(&mut self, action: Action) -> Transition;
}

const PADDLE_STEP: f64 = 0.1;
const HIT_RADIUS: f64 = 0.2;

/// One-shot paddle game: the paddle moves once, the ball lands at a random
/// height, and the episode ends with +1 if the paddle is within reach.
#[derive(Debug, Clone)]
pub struct EnvGym<R: Rng> {
    rng: R,
    paddle_y: f64,
    ball_y: f64,
}

impl<R: Rng> EnvGym<R> {
    pub fn new(rng: R) -> EnvGym<R> {
        EnvGym {
            rng,
            paddle_y: 0.5,
            ball_y: 0.5,
        }
    }

    fn observe(&self) -> State {
        State {
            ball_x: 0.5,
            ball_y: self.ball_y,
            paddle_y: self.paddle_y,
        }
    }
}

impl<R: Rng> Environment for EnvGym<R> {
    fn reset(&mut self) -> State {
        self.paddle_y = 0.5;
        self.ball_y = self.rng.gen();
        self.observe()
    }

    fn step(&mut self, action: Action) -> Transition {
        self.paddle_y = (self.paddle_y + PADDLE_STEP * action.direction()).clamp(0.0, 1.0);
        self.ball_y = self.rng.gen();

        let reward = if (self.ball_y - self.paddle_y).abs() < HIT_RADIUS { 1.0 } else { -1.0 };
        Transition {
            state: self.observe(),
            reward,
            done: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn paddle_is_clamped_and_episode_ends() {
        let mut env = EnvGym::new(StdRng::seed_from_u64(3));
        let start = env.reset();
        assert_eq!(start.paddle_y, 0.5);
        assert_eq!(start.ball_x, 0.5);

        let mut last = env.step(Action::Up);
        assert!(last.done);
        assert!((last.state.paddle_y - 0.6).abs() < 1e-12);
        for _ in 0..10 {
            last = env.step(Action::Up);
        }
        assert_eq!(last.state.paddle_y, 1.0);

        let hit = (last.state.ball_y - last.state.paddle_y).abs() < HIT_RADIUS;
        assert_eq!(last.reward, if hit { 1.0 } else { -1.0 });
    }
}
