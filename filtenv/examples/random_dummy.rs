use anyhow::Result;
use clap::Parser;
use filtenv::{FilteredEnv, FilteredEnvConfig};
use filtenv_core::{
    dummy::{DummyEnv, DummyEnvConfig},
    ArrayAct, Env,
};
use log::info;
use ndarray::Array1;

type Config = FilteredEnvConfig<DummyEnvConfig>;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML file of the configuration; a Reacher-like environment is used if omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Number of episodes
    #[arg(short, long, default_value_t = 5)]
    episodes: usize,

    /// Random seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Do not normalize observation and action spaces
    #[arg(long, default_value_t = false)]
    skip_space_norm: bool,
}

fn default_config() -> Config {
    let env = DummyEnvConfig::default()
        .id("Reacher-v1")
        .obs_bounds(vec![-1.0; 11], vec![1.0; 11])
        .act_bounds(vec![-0.5, -0.5], vec![0.5, 0.5])
        .max_steps(50);
    FilteredEnvConfig::new(env)
}

/// Runs episodes with uniformly random actions in the exposed action space.
///
/// Returns the raw and the rescaled return of each episode.
fn run(config: &Config, n_episodes: usize, seed: u64) -> Result<Vec<(f32, f32)>> {
    let mut env = FilteredEnv::<DummyEnv>::build(config, seed as i64)?;
    let mut rng = fastrand::Rng::with_seed(seed);
    let space = env
        .action_space()
        .bounds()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("continuous action space required"))?;
    let mut returns = Vec::with_capacity(n_episodes);

    for episode in 0..n_episodes {
        env.reset_with_index(episode)?;
        let (mut r_raw, mut r_filtered) = (0.0, 0.0);
        loop {
            let act: Array1<f32> = space.sample(&mut rng);
            let (step, _) = env.step(&ArrayAct(act));
            r_raw += step.reward;
            r_filtered += env.filter_reward(step.reward);
            if step.is_done() {
                break;
            }
        }
        info!(
            "Episode {}, return = {}, rescaled return = {}",
            episode, r_raw, r_filtered
        );
        returns.push((r_raw, r_filtered));
    }

    Ok(returns)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => default_config(),
    };
    if args.skip_space_norm {
        config.filter = config.filter.skip_space_norm(true);
    }

    run(&config, args.episodes, args.seed)?;

    Ok(())
}

#[test]
fn test_random_dummy() -> Result<()> {
    let returns = run(&default_config(), 2, 42)?;
    assert_eq!(returns.len(), 2);
    for (r_raw, r_filtered) in returns {
        assert!((200.0 * r_raw - r_filtered).abs() <= 1e-3 * r_filtered.abs().max(1.0));
    }
    Ok(())
}
