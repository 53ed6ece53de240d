// Paddle-game agent and on-policy training sessions.

use rand::rngs::StdRng;
use rand::SeedableRng;

use paddle_nn::agent::{evaluate, run_training, SessionReport};
use paddle_nn::{EnvGym, Environment, Error, Network, SessionConfig};

fn small_config() -> SessionConfig {
    SessionConfig {
        episodes: 20,
        block_size: 5,
        hidden_layers: vec![4],
        seed: Some(7),
        ..SessionConfig::default()
    }
}

fn run(config: &SessionConfig) -> (Network<f64>, SessionReport) {
    let mut rng = StdRng::seed_from_u64(config.seed.unwrap());
    let mut network = config.network_spec().build(&mut rng).unwrap();
    let mut env = EnvGym::new(StdRng::seed_from_u64(11));
    let report = run_training(&mut network, &mut env, config, &mut rng).unwrap();
    (network, report)
}

#[test]
fn session_reports_one_block_per_block_size() {
    let (_, report) = run(&small_config());
    assert_eq!(report.episodes, 20);
    assert_eq!(report.blocks.iter().map(|b| b.episode).collect::<Vec<_>>(), vec![5, 10, 15, 20]);
    assert!(report.blocks.iter().all(|b| (0.0..=100.0).contains(&b.winrate)));

    let block_wins: f64 = report.blocks.iter().map(|b| b.winrate * 5.0 / 100.0).sum();
    assert_eq!(block_wins.round() as usize, report.wins);
}

#[test]
fn session_is_reproducible_with_a_seed() {
    let (net_a, report_a) = run(&small_config());
    let (net_b, report_b) = run(&small_config());
    assert_eq!(report_a, report_b);

    let (mut a, mut b) = (Vec::new(), Vec::new());
    net_a.save(&mut a).unwrap();
    net_b.save(&mut b).unwrap();
    assert_eq!(a, b);
}

#[test]
fn csv_lists_every_block() {
    let (_, report) = run(&small_config());
    let mut out = Vec::new();
    report.write_csv(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Block,Winrate");
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("5,"));
}

#[test]
fn evaluate_returns_a_percentage() {
    let (network, _) = run(&small_config());
    let mut env = EnvGym::new(StdRng::seed_from_u64(1));
    let rate = evaluate(&network, &mut env, 50).unwrap();
    assert!((0.0..=100.0).contains(&rate));
    assert_eq!(evaluate(&network, &mut env, 0).unwrap(), 0.0);
}

#[test]
fn zero_width_block_is_rejected() {
    let config = SessionConfig { block_size: 0, ..small_config() };
    let mut network: Network<f64> =
        config.network_spec().build(&mut StdRng::seed_from_u64(0)).unwrap();
    let mut env = EnvGym::new(StdRng::seed_from_u64(0));
    let err = run_training(&mut network, &mut env, &config, &mut StdRng::seed_from_u64(0))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[test]
fn zero_width_hidden_layer_is_rejected() {
    let config = SessionConfig { hidden_layers: vec![8, 0], ..small_config() };
    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let path = path.to_str().unwrap();
    std::fs::write(path, r#"{ "hidden_layers": [0] }"#).unwrap();
    assert!(matches!(SessionConfig::load_json(path), Err(Error::InvalidConfig(_))));
}

#[test]
fn session_config_json_fills_defaults_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let path = path.to_str().unwrap();

    std::fs::write(path, r#"{ "episodes": 10, "hidden_layers": [6] }"#).unwrap();
    let config = SessionConfig::load_json(path).unwrap();
    assert_eq!(config.episodes, 10);
    assert_eq!(config.hidden_layers, vec![6]);
    assert_eq!(config.block_size, SessionConfig::default().block_size);

    std::fs::write(path, r#"{ "epsilon": 1.5 }"#).unwrap();
    assert!(matches!(SessionConfig::load_json(path), Err(Error::InvalidConfig(_))));

    small_config().save_json(path).unwrap();
    assert_eq!(SessionConfig::load_json(path).unwrap(), small_config());
}

#[test]
fn gym_episode_ends_after_one_move() {
    let mut env = EnvGym::new(StdRng::seed_from_u64(5));
    let start = env.reset();
    assert_eq!(start.paddle_y, 0.5);
    let transition = env.step(paddle_nn::Action::Up);
    assert!(transition.done);
    assert!(transition.reward == 1.0 || transition.reward == -1.0);
    assert!((transition.state.paddle_y - 0.6).abs() < 1e-12);
}
