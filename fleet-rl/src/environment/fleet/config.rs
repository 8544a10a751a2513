use burn::config::Config;
use rand::{rngs::StdRng, SeedableRng};

use super::{error::FleetError, FleetEnvironment};

#[derive(Config, Debug)]
pub struct FleetEnvironmentConfig {
    /// Side length of the square grid.
    #[config(default = 5)]
    pub grid_size: usize,
    #[config(default = 2)]
    pub num_vehicles: usize,
    /// Passenger requests placed at every reset.
    #[config(default = 3)]
    pub num_passengers: usize,
    /// Steps after which an unfinished episode is truncated. Unbounded when absent.
    pub max_episode_steps: Option<usize>,
}

impl FleetEnvironmentConfig {
    /// Builds an environment seeded from system entropy and resets it once.
    pub fn init(&self) -> Result<FleetEnvironment, FleetError> {
        self.validate()?;
        Ok(FleetEnvironment::new(self.clone(), StdRng::from_entropy()))
    }

    /// Builds an environment whose whole episode sequence is determined by `seed`.
    pub fn init_seeded(&self, seed: u64) -> Result<FleetEnvironment, FleetError> {
        self.validate()?;
        Ok(FleetEnvironment::new(self.clone(), StdRng::seed_from_u64(seed)))
    }

    pub fn num_actions(&self) -> usize {
        super::Direction::COUNT * self.num_vehicles
    }

    pub fn validate(&self) -> Result<(), FleetError> {
        if self.grid_size == 0 {
            return Err(FleetError::EmptyGrid);
        }
        if self.num_vehicles == 0 {
            return Err(FleetError::NoVehicles);
        }
        if self.max_episode_steps == Some(0) {
            return Err(FleetError::EmptyHorizon);
        }
        Ok(())
    }
}
