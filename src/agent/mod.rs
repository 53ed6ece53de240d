pub mod env;
pub mod pong_agent;
pub mod sarsa;
pub mod session;
pub mod state;

pub use env::{EnvGym, Environment, Transition};
pub use pong_agent::PongAgent;
pub use sarsa::SarsaAgent;
pub use session::{evaluate, run_training, BlockStats, SessionConfig, SessionReport};
pub use state::{Action, State};
