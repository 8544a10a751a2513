//! Trains a Deep Q-Network fleet manager and saves it as a policy artifact.
//!
//! Usage: cargo run --release --bin train_fleet [--training-steps 10000] [--artifact DIR]

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use burn::{
    backend::{Autodiff, NdArray},
    module::AutodiffModule,
    optim::AdamConfig,
    prelude::*,
};
use clap::Parser;
use fleet_rl::{data::memory::RingbufferMemory, environment::fleet::FleetEnvironmentConfig};
use fleet_rl_agents::{
    artifact::{save_policy, Policy, DEFAULT_ARTIFACT},
    dqn::DeepQNetworkAgentConfig,
    model::FleetQNetworkConfig,
    off_policy::OffPolicyAlgorithmConfig,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "train_fleet")]
#[command(about = "Train a fleet management policy", long_about = None)]
struct Args {
    /// Directory the trained policy is written to
    #[arg(long, default_value = DEFAULT_ARTIFACT)]
    artifact: PathBuf,

    /// Environment config as JSON; defaults to a 5x5 grid with 2 vehicles and 3 passengers
    #[arg(long)]
    config: Option<PathBuf>,

    /// Steps after which a training episode is cut short
    #[arg(long, default_value_t = 100)]
    max_episode_steps: usize,

    #[arg(long, default_value_t = 10_000)]
    training_steps: u64,

    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    type B = Autodiff<NdArray>;
    let device: &Device<B> = &Default::default();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let env_config = match &args.config {
        Some(path) => FleetEnvironmentConfig::load(path)
            .map_err(|err| anyhow!("failed to load {}: {err:?}", path.display()))?,
        None => FleetEnvironmentConfig::new(),
    };
    let env_config = match env_config.max_episode_steps {
        Some(_) => env_config,
        None => env_config.with_max_episode_steps(Some(args.max_episode_steps)),
    };
    let env = env_config.init_seeded(rng.gen())?;
    let eval_env = env_config.init_seeded(rng.gen())?;

    let network_config = FleetQNetworkConfig::for_environment(&env);
    let network = network_config.init::<B>(device)?;
    let agent = DeepQNetworkAgentConfig::new().init(network, AdamConfig::new().init());
    let memory = RingbufferMemory::new(10_000, StdRng::from_seed(rng.gen()));

    info!(%env_config, "training the fleet manager");
    let summary = OffPolicyAlgorithmConfig::new(args.training_steps)
        .init(env, eval_env, agent, memory, rng)
        .train();

    let model = summary.agent.into_model().valid();
    save_policy(
        &args.artifact,
        Policy {
            environment: env_config,
            network: network_config,
            model,
        },
    )?;
    info!(artifact = %args.artifact.display(), "training complete, policy saved");
    Ok(())
}
