use std::io::Write;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::agent::env::Environment;
use crate::agent::pong_agent::PongAgent;
use crate::agent::sarsa::SarsaAgent;
use crate::agent::state::{Action, State};
use crate::error::{Error, Result};
use crate::layers::init::Init;
use crate::loss::loss_type::LossType;
use crate::math::{Element, Tensor};
use crate::network::network::Network;
use crate::network::spec::{LayerSpec, NetworkSpec};

/// Settings for an on-policy training session, loadable from JSON.
///
/// Every field has a default, so a partial (or empty) JSON object is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub episodes: usize,
    /// Episodes per win-rate report.
    pub block_size: usize,
    /// Probability of a uniformly random exploratory action.
    pub epsilon: f64,
    /// Discount applied to the next state's value.
    pub gamma: f64,
    pub learning_rate: f64,
    /// Epochs spent refitting each transition.
    pub refit_epochs: usize,
    /// Widths of the ReLU hidden layers between the 3 inputs and 1 output.
    pub hidden_layers: Vec<usize>,
    /// Initial weights and biases are drawn from `[-init_range, init_range)`.
    pub init_range: f64,
    /// Fixed seed for reproducible runs; entropy when absent.
    pub seed: Option<u64>,
    pub weights_path: String,
    pub winrate_csv: String,
    /// Greedy episodes played after training to report a final win rate.
    pub eval_episodes: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            episodes: 3000,
            block_size: 100,
            epsilon: 0.1,
            gamma: 0.95,
            learning_rate: 0.005,
            refit_epochs: 5,
            hidden_layers: vec![16, 8],
            init_range: 0.5,
            seed: None,
            weights_path: "weights.txt".to_string(),
            winrate_csv: "winrate.csv".to_string(),
            eval_episodes: 100,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(Error::InvalidConfig("block_size must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(Error::InvalidConfig(format!(
                "epsilon {} is not a probability",
                self.epsilon
            )));
        }
        if !(self.init_range.is_finite() && self.init_range > 0.0) {
            return Err(Error::InvalidConfig("init_range must be positive and finite".into()));
        }
        if let Some(i) = self.hidden_layers.iter().position(|&w| w == 0) {
            return Err(Error::InvalidConfig(format!("hidden layer {i} has zero width")));
        }
        self.network_spec().validate()
    }

    /// `3 → hidden… (ReLU) → 1` policy network with uniform initialization.
    pub fn network_spec(&self) -> NetworkSpec {
        let init = Init::Uniform {
            low: -self.init_range,
            high: self.init_range,
        };
        let mut layers = Vec::new();
        let mut width = 3;
        for &hidden in &self.hidden_layers {
            layers.push(LayerSpec::Dense {
                inputs: width,
                outputs: hidden,
                weight_init: init,
                bias_init: init,
            });
            layers.push(LayerSpec::Relu);
            width = hidden;
        }
        layers.push(LayerSpec::Dense {
            inputs: width,
            outputs: 1,
            weight_init: init,
            bias_init: init,
        });

        NetworkSpec {
            name: "paddle-policy".to_string(),
            layers,
            loss: LossType::Mse,
        }
    }

    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load_json(path: &str) -> Result<SessionConfig> {
        let file = std::fs::File::open(path)?;
        let config: SessionConfig = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }
}

/// Win rate (percent) over one block of episodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockStats {
    /// Episode count at the end of the block.
    pub episode: usize,
    pub winrate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub episodes: usize,
    pub wins: usize,
    pub blocks: Vec<BlockStats>,
}

impl SessionReport {
    /// Writes the `Block,Winrate` table, one row per completed block.
    pub fn write_csv<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Block,Winrate")?;
        for block in &self.blocks {
            writeln!(out, "{},{}", block.episode, block.winrate)?;
        }
        Ok(())
    }
}

/// Runs `config.episodes` epsilon-greedy episodes, refitting `network` after
/// every transition.
#[instrument(skip_all, fields(episodes = config.episodes))]
pub fn run_training<T, E, R>(
    network: &mut Network<T>,
    env: &mut E,
    config: &SessionConfig,
    rng: &mut R,
) -> Result<SessionReport>
where
    T: Element,
    E: Environment,
    R: Rng + ?Sized,
{
    config.validate()?;
    let refit_rng = StdRng::seed_from_u64(rng.gen());
    let mut agent = SarsaAgent::new(
        network,
        T::from_f64(config.gamma),
        T::from_f64(config.learning_rate),
        refit_rng,
    )
    .with_refit_epochs(config.refit_epochs);

    let mut report = SessionReport::default();
    let mut block_wins = 0;

    for episode in 0..config.episodes {
        let mut state = env.reset();
        let mut action = choose_action(&mut agent, &state, config.epsilon, rng)?;
        let mut total_reward = 0.0;

        loop {
            let transition = env.step(action);
            let next_action = choose_action(&mut agent, &transition.state, config.epsilon, rng)?;
            agent.learn_on_policy(
                &state,
                action,
                transition.reward,
                &transition.state,
                next_action,
            )?;

            total_reward += transition.reward;
            state = transition.state;
            action = next_action;
            if transition.done {
                break;
            }
        }

        if total_reward > 0.0 {
            block_wins += 1;
            report.wins += 1;
        }
        report.episodes += 1;
        debug!(episode, reward = total_reward, "episode finished");

        if (episode + 1) % config.block_size == 0 {
            let winrate = 100.0 * block_wins as f64 / config.block_size as f64;
            info!(episode = episode + 1, winrate, "block finished");
            report.blocks.push(BlockStats {
                episode: episode + 1,
                winrate,
            });
            block_wins = 0;
        }
    }

    Ok(report)
}

/// Plays `episodes` greedy episodes without learning; returns the win rate
/// in percent.
pub fn evaluate<T, E>(network: &Network<T>, env: &mut E, episodes: usize) -> Result<f64>
where
    T: Element,
    E: Environment,
{
    if episodes == 0 {
        return Ok(0.0);
    }
    let mut agent = PongAgent::new(|x: &Tensor<T, 2>| network.infer(x));
    let mut wins = 0;
    for _ in 0..episodes {
        let state = env.reset();
        let action = agent.act(&state)?;
        if env.step(action).reward > 0.0 {
            wins += 1;
        }
    }
    Ok(100.0 * wins as f64 / episodes as f64)
}

fn choose_action<T, A, R>(
    agent: &mut SarsaAgent<'_, T, A>,
    state: &State,
    epsilon: f64,
    rng: &mut R,
) -> Result<Action>
where
    T: Element,
    A: Rng,
    R: Rng + ?Sized,
{
    if rng.gen::<f64>() < epsilon {
        Ok(Action::ALL[rng.gen_range(0..Action::ALL.len())])
    } else {
        agent.act(state)
    }
}
