//! A trained policy on disk: a directory holding the network weights and the configs needed
//! to rebuild both the network and the environment it was trained on.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use burn::{
    config::Config,
    module::Module,
    prelude::Backend,
    record::{FullPrecisionSettings, NamedMpkFileRecorder},
};
use fleet_rl::environment::fleet::FleetEnvironmentConfig;

use crate::model::{FleetQNetwork, FleetQNetworkConfig};

pub const DEFAULT_ARTIFACT: &str = "fleet_manager_dqn";

const ENVIRONMENT_CONFIG: &str = "environment.json";
const NETWORK_CONFIG: &str = "network.json";
const MODEL: &str = "model";

fn recorder() -> NamedMpkFileRecorder<FullPrecisionSettings> {
    NamedMpkFileRecorder::new()
}

pub struct Policy<B: Backend> {
    pub environment: FleetEnvironmentConfig,
    pub network: FleetQNetworkConfig,
    pub model: FleetQNetwork<B>,
}

pub fn save_policy<B: Backend>(dir: &Path, policy: Policy<B>) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create artifact directory {}", dir.display()))?;
    policy
        .environment
        .save(dir.join(ENVIRONMENT_CONFIG))
        .context("failed to save environment config")?;
    policy
        .network
        .save(dir.join(NETWORK_CONFIG))
        .context("failed to save network config")?;
    policy
        .model
        .save_file(dir.join(MODEL), &recorder())
        .map_err(|err| anyhow!("failed to save model weights: {err:?}"))?;
    Ok(())
}

pub fn load_policy<B: Backend>(dir: &Path, device: &B::Device) -> Result<Policy<B>> {
    let environment = FleetEnvironmentConfig::load(dir.join(ENVIRONMENT_CONFIG))
        .map_err(|err| anyhow!("failed to load environment config: {err:?}"))?;
    let network = FleetQNetworkConfig::load(dir.join(NETWORK_CONFIG))
        .map_err(|err| anyhow!("failed to load network config: {err:?}"))?;
    let model = network
        .init::<B>(device)?
        .load_file(dir.join(MODEL), &recorder(), device)
        .map_err(|err| anyhow!("failed to load model weights: {err:?}"))?;
    Ok(Policy {
        environment,
        network,
        model,
    })
}
