//! Runs a trained fleet manager and prints the grid after every step.
//!
//! Usage: cargo run --bin evaluate_fleet [--artifact DIR] [--max-steps 50]

use std::path::PathBuf;

use anyhow::Result;
use burn::backend::NdArray;
use clap::Parser;
use fleet_rl::{environment::Environment, module::component::Actor};
use fleet_rl_agents::artifact::{load_policy, DEFAULT_ARTIFACT};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "evaluate_fleet")]
#[command(about = "Watch a trained fleet management policy", long_about = None)]
struct Args {
    /// Directory written by train_fleet
    #[arg(long, default_value = DEFAULT_ARTIFACT)]
    artifact: PathBuf,

    #[arg(long, default_value_t = 50)]
    max_steps: usize,

    /// Seed for passenger and vehicle placement; random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let device = Default::default();
    let policy = load_policy::<NdArray>(&args.artifact, &device)?;
    let mut env = policy.environment.init()?;
    let (mut observation, _) = env.reset(args.seed);
    println!("{env}\n");

    let mut total_reward = 0.0;
    for _ in 0..args.max_steps {
        let action = policy.model.a(&observation);
        let step = env.step(action);
        total_reward += step.reward;
        println!("{env}\n");
        if step.finished() {
            break;
        }
        observation = step.observation;
    }

    info!(
        steps = env.steps(),
        total_reward,
        waiting = env.requests().len(),
        "evaluation finished"
    );
    Ok(())
}
