//! paddle-nn training driver.
//!
//! Run with:
//!   cargo run --release -- [session.json]
//!
//! Without a config file the built-in defaults are used. Logging follows
//! `RUST_LOG` (default `info`).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use paddle_nn::agent::{evaluate, run_training, EnvGym, SessionConfig};
use paddle_nn::{Network, Result};

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "training session failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "loading session config");
            SessionConfig::load_json(&path)?
        }
        None => SessionConfig::default(),
    };

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut network: Network<f32> = config.network_spec().build(&mut rng)?;
    if Path::new(&config.weights_path).exists() {
        network.load_model(&config.weights_path)?;
        info!(path = %config.weights_path, "loaded previous weights");
    } else {
        info!(path = %config.weights_path, "no saved weights, starting untrained");
    }

    let mut env = EnvGym::new(StdRng::seed_from_u64(rng.gen()));
    let report = run_training(&mut network, &mut env, &config, &mut rng)?;

    let mut csv = BufWriter::new(File::create(&config.winrate_csv)?);
    report.write_csv(&mut csv)?;
    csv.flush()?;
    info!(path = %config.winrate_csv, blocks = report.blocks.len(), "wrote win-rate table");

    network.save_model(&config.weights_path)?;
    info!(path = %config.weights_path, "saved weights");

    let winrate = evaluate(&network, &mut env, config.eval_episodes)?;
    info!(episodes = config.eval_episodes, winrate, "greedy evaluation");
    Ok(())
}
