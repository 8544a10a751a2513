//! A square city grid where a small fleet of vehicles collects waiting passengers.
//!
//! One action moves one vehicle by one cell. A passenger is picked up as soon as any vehicle
//! stands on their pickup cell, which pays [`PICKUP_REWARD`]; every step costs [`STEP_COST`].
//! The episode is done once no passenger is left waiting. Dropoff cells are only observed.

use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

pub use config::FleetEnvironmentConfig;
pub use error::FleetError;
pub use grid::{Direction, PassengerRequest, Position};
pub use observation::{Channel, Observation};

use super::{BoxSpace, Discrete, Environment, Info, Reward, Step};

mod config;
mod error;
mod grid;
mod observation;

pub const PICKUP_REWARD: Reward = 10.0;
pub const STEP_COST: Reward = 1.0;

pub struct FleetEnvironment {
    config: FleetEnvironmentConfig,
    rng: StdRng,
    vehicles: Vec<Position>,
    requests: Vec<PassengerRequest>,
    steps: usize,
    action_space: Discrete,
    observation_space: BoxSpace,
}

impl FleetEnvironment {
    /// Expects a validated config; see [`FleetEnvironmentConfig::init`].
    pub(crate) fn new(config: FleetEnvironmentConfig, rng: StdRng) -> Self {
        let action_space = Discrete::new(config.num_actions());
        let observation_space = BoxSpace::new(
            vec![config.grid_size, config.grid_size, Channel::COUNT],
            0.0,
            1.0,
        );
        let mut env = FleetEnvironment {
            config,
            rng,
            vehicles: Vec::new(),
            requests: Vec::new(),
            steps: 0,
            action_space,
            observation_space,
        };
        env.reset(None);
        env
    }

    pub fn config(&self) -> &FleetEnvironmentConfig {
        &self.config
    }

    pub fn grid_size(&self) -> usize {
        self.config.grid_size
    }

    pub fn vehicles(&self) -> &[Position] {
        &self.vehicles
    }

    /// Passengers still waiting for a vehicle, in placement order.
    pub fn requests(&self) -> &[PassengerRequest] {
        &self.requests
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn observation(&self) -> Observation {
        Observation::encode(self.grid_size(), &self.vehicles, &self.requests)
    }

    /// Replaces the episode in progress with a hand-placed one and restarts the step counter.
    ///
    /// Vehicles may share cells here, as they may after a random reset.
    pub fn set_state(
        &mut self,
        vehicles: Vec<Position>,
        requests: Vec<PassengerRequest>,
    ) -> Result<Observation, FleetError> {
        if vehicles.len() != self.config.num_vehicles {
            return Err(FleetError::VehicleCountMismatch {
                expected: self.config.num_vehicles,
                actual: vehicles.len(),
            });
        }
        let grid_size = self.grid_size();
        let positions = vehicles
            .iter()
            .chain(requests.iter().flat_map(|r| [&r.pickup, &r.dropoff]));
        for position in positions {
            if !position.within(grid_size) {
                return Err(FleetError::PositionOutOfBounds {
                    position: *position,
                    grid_size,
                });
            }
        }
        self.vehicles = vehicles;
        self.requests = requests;
        self.steps = 0;
        Ok(self.observation())
    }

    /// Text view of the grid: `V` vehicle, `P` waiting passenger, `.` empty.
    ///
    /// Pickups are drawn over vehicles, so a vehicle standing on an unresolved pickup shows as `P`.
    pub fn render(&self) -> String {
        let grid_size = self.grid_size();
        let mut cells = vec![vec!['.'; grid_size]; grid_size];
        for vehicle in &self.vehicles {
            cells[vehicle.y][vehicle.x] = 'V';
        }
        for request in &self.requests {
            cells[request.pickup.y][request.pickup.x] = 'P';
        }
        cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(char::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn move_vehicle(&mut self, vehicle_index: usize, direction: Direction) {
        let current = self.vehicles[vehicle_index];
        let target = current.moved(direction, self.grid_size());
        // Staying put counts as moving onto an occupied cell.
        if self.vehicles.contains(&target) {
            trace!(vehicle_index, ?direction, %current, "move blocked");
            return;
        }
        self.vehicles[vehicle_index] = target;
    }

    /// Removes every request whose pickup cell holds a vehicle and returns how many there were.
    fn resolve_pickups(&mut self) -> usize {
        let vehicles = &self.vehicles;
        let (picked_up, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.requests)
            .into_iter()
            .partition(|request| vehicles.contains(&request.pickup));
        self.requests = waiting;
        for request in &picked_up {
            debug!(pickup = %request.pickup, dropoff = %request.dropoff, "passenger picked up");
        }
        picked_up.len()
    }
}

impl Environment for FleetEnvironment {
    type A = usize;
    type O = Observation;
    type ActionSpace = Discrete;

    fn action_space(&self) -> &Discrete {
        &self.action_space
    }

    fn observation_space(&self) -> &BoxSpace {
        &self.observation_space
    }

    fn reset(&mut self, seed: Option<u64>) -> (Observation, Info) {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        let grid_size = self.grid_size();
        let rng = &mut self.rng;
        self.vehicles = (0..self.config.num_vehicles)
            .map(|_| Position::random(rng, grid_size))
            .collect();
        self.requests = (0..self.config.num_passengers)
            .map(|_| {
                let pickup = Position::random(rng, grid_size);
                let dropoff = Position::random(rng, grid_size);
                PassengerRequest::new(pickup, dropoff)
            })
            .collect();
        self.steps = 0;
        debug!(
            vehicles = self.vehicles.len(),
            requests = self.requests.len(),
            "episode reset"
        );
        (self.observation(), Info::new())
    }

    fn step(&mut self, action: usize) -> Step<Observation> {
        let vehicle_index = action / Direction::COUNT;
        let direction = Direction::from_index(action);
        if vehicle_index < self.vehicles.len() {
            self.move_vehicle(vehicle_index, direction);
        } else {
            trace!(action, "ignoring action for unknown vehicle");
        }
        self.steps += 1;

        let pickups = self.resolve_pickups();
        let reward = PICKUP_REWARD * pickups as Reward - STEP_COST;
        let done = self.requests.is_empty();
        let truncated = !done
            && self
                .config
                .max_episode_steps
                .is_some_and(|limit| self.steps >= limit);

        Step {
            observation: self.observation(),
            reward,
            done,
            truncated,
            info: Info::new(),
        }
    }
}

impl fmt::Display for FleetEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;

    fn env(grid_size: usize, num_vehicles: usize, num_passengers: usize) -> FleetEnvironment {
        FleetEnvironmentConfig::new()
            .with_grid_size(grid_size)
            .with_num_vehicles(num_vehicles)
            .with_num_passengers(num_passengers)
            .init_seeded(42)
            .unwrap()
    }

    fn request(pickup: (usize, usize), dropoff: (usize, usize)) -> PassengerRequest {
        PassengerRequest::new(
            Position::new(pickup.0, pickup.1),
            Position::new(dropoff.0, dropoff.1),
        )
    }

    #[test]
    fn test_reset_places_everything_on_the_grid() {
        let mut env = env(5, 3, 4);
        for seed in 0..50 {
            let (observation, info) = env.reset(Some(seed));
            assert!(info.is_empty());
            assert_eq!(observation.shape(), [5, 5, 3]);
            assert_eq!(env.vehicles().len(), 3);
            assert_eq!(env.requests().len(), 4);
            assert_eq!(env.steps(), 0);
            assert!(env.vehicles().iter().all(|v| v.within(5)));
            assert!(env
                .requests()
                .iter()
                .all(|r| r.pickup.within(5) && r.dropoff.within(5)));
        }
    }

    #[test]
    fn test_spaces_follow_config() {
        let env = env(6, 3, 2);
        assert_eq!(env.action_space(), &Discrete::new(12));
        assert_eq!(
            env.observation_space(),
            &BoxSpace::new(vec![6, 6, 3], 0.0, 1.0)
        );
        let observation = env.observation();
        assert_eq!(observation.shape().to_vec(), env.observation_space().shape);
        assert!(crate::environment::Space::contains(
            env.observation_space(),
            &observation.into()
        ));
    }

    #[test]
    fn test_reset_is_reproducible_with_seed() {
        let mut a = env(5, 2, 3);
        let mut b = FleetEnvironmentConfig::new().init().unwrap();
        let (obs_a, _) = a.reset(Some(9));
        let (obs_b, _) = b.reset(Some(9));
        assert_eq!(obs_a, obs_b);
        assert_eq!(a.vehicles(), b.vehicles());
        assert_eq!(a.requests(), b.requests());
    }

    #[test]
    fn test_vehicle_on_pickup_finishes_episode() {
        let mut env = env(5, 1, 1);
        env.set_state(vec![Position::new(2, 2)], vec![request((2, 2), (4, 4))])
            .unwrap();
        // Any action: the vehicle is already on the pickup cell.
        let step = env.step(3);
        assert_eq!(step.reward, 9.0);
        assert!(step.done);
        assert!(!step.truncated);
        assert!(step.info.is_empty());
    }

    #[test]
    fn test_move_left_at_edge_is_clamped() {
        let mut env = env(5, 1, 1);
        env.set_state(vec![Position::new(0, 0)], vec![request((4, 4), (3, 3))])
            .unwrap();
        let step = env.step(Direction::Left.index());
        assert_eq!(env.vehicles(), &[Position::new(0, 0)]);
        assert_eq!(step.reward, -1.0);
        assert!(!step.done);
    }

    #[test]
    fn test_move_into_occupied_cell_is_blocked() {
        let mut env = env(5, 2, 1);
        env.set_state(
            vec![Position::new(1, 1), Position::new(2, 1)],
            vec![request((4, 4), (0, 4))],
        )
        .unwrap();
        env.step(Direction::Right.index());
        assert_eq!(env.vehicles(), &[Position::new(1, 1), Position::new(2, 1)]);

        // The second vehicle may still move away.
        env.step(Direction::COUNT + Direction::Down.index());
        assert_eq!(env.vehicles(), &[Position::new(1, 1), Position::new(2, 2)]);
    }

    #[test]
    fn test_unknown_vehicle_is_ignored() {
        let mut env = env(5, 1, 1);
        env.set_state(vec![Position::new(1, 1)], vec![request((4, 4), (0, 0))])
            .unwrap();
        let step = env.step(4 * 7 + 1);
        assert_eq!(env.vehicles(), &[Position::new(1, 1)]);
        assert_eq!(step.reward, -1.0);
        assert_eq!(env.steps(), 1);
    }

    #[test]
    fn test_simultaneous_pickups_all_resolve() {
        let mut env = env(5, 2, 3);
        env.set_state(
            vec![Position::new(0, 0), Position::new(3, 3)],
            vec![
                request((0, 0), (1, 1)),
                request((3, 3), (1, 2)),
                request((4, 0), (2, 2)),
            ],
        )
        .unwrap();
        let step = env.step(Direction::Left.index());
        assert_eq!(step.reward, 19.0);
        assert!(!step.done);
        assert_eq!(env.requests(), &[request((4, 0), (2, 2))]);
    }

    #[test]
    fn test_pickup_after_move() {
        let mut env = env(5, 1, 2);
        env.set_state(
            vec![Position::new(2, 2)],
            vec![request((2, 1), (0, 0)), request((4, 4), (3, 0))],
        )
        .unwrap();
        let step = env.step(Direction::Up.index());
        assert_eq!(env.vehicles(), &[Position::new(2, 1)]);
        assert_eq!(step.reward, 9.0);
        assert!(!step.done);
        let observation = step.observation;
        assert_eq!(observation.get(1, 2, Channel::Vehicle), Some(1.0));
        assert_eq!(observation.get(1, 2, Channel::Pickup), Some(0.0));
        assert_eq!(observation.get(4, 4, Channel::Pickup), Some(1.0));
        // Only waiting passengers keep their dropoff marked.
        assert_eq!(observation.get(0, 0, Channel::Dropoff), Some(0.0));
        assert_eq!(observation.get(0, 3, Channel::Dropoff), Some(1.0));
    }

    #[test]
    fn test_random_walk_respects_invariants() {
        let mut env = env(4, 3, 3);
        let mut rng = StdRng::seed_from_u64(3);
        env.reset(Some(11));
        for _ in 0..500 {
            let before = env.vehicles().to_vec();
            let waiting = env.requests().len();
            let action = crate::environment::Space::sample(env.action_space(), &mut rng);
            let step = env.step(action);

            let moved: Vec<_> = before
                .iter()
                .zip(env.vehicles())
                .filter(|(a, b)| a != b)
                .collect();
            assert!(moved.len() <= 1);
            for (a, b) in moved {
                assert_eq!(a.x.abs_diff(b.x) + a.y.abs_diff(b.y), 1);
                assert!(b.within(4));
                // The destination was free before the move.
                assert!(!before.contains(b));
            }

            let picked = waiting - env.requests().len();
            assert_eq!(step.reward, 10.0 * picked as f64 - 1.0);
            assert_eq!(step.done, env.requests().is_empty());
            assert_eq!(step.observation.shape(), [4, 4, 3]);
            if step.done {
                env.reset(None);
            }
        }
    }

    #[test]
    fn test_truncation_at_horizon() {
        let mut env = FleetEnvironmentConfig::new()
            .with_num_vehicles(1)
            .with_num_passengers(1)
            .with_max_episode_steps(Some(3))
            .init_seeded(0)
            .unwrap();
        env.set_state(vec![Position::new(0, 0)], vec![request((4, 4), (0, 4))])
            .unwrap();
        let steps: Vec<_> = (0..3).map(|_| env.step(Direction::Up.index())).collect();
        assert_eq!(
            steps.iter().map(|s| s.truncated).collect::<Vec<_>>(),
            [false, false, true]
        );
        assert!(steps.iter().all(|s| !s.done));
    }

    #[test]
    fn test_unbounded_by_default() {
        let mut env = env(5, 1, 1);
        env.set_state(vec![Position::new(0, 0)], vec![request((4, 4), (0, 4))])
            .unwrap();
        for _ in 0..1000 {
            assert!(!env.step(Direction::Up.index()).finished());
        }
    }

    #[test]
    fn test_set_state_validation() {
        let mut env = env(3, 1, 1);
        assert_eq!(
            env.set_state(vec![], vec![]).err(),
            Some(FleetError::VehicleCountMismatch {
                expected: 1,
                actual: 0
            })
        );
        assert_eq!(
            env.set_state(vec![Position::new(0, 0)], vec![request((0, 3), (0, 0))])
                .err(),
            Some(FleetError::PositionOutOfBounds {
                position: Position::new(0, 3),
                grid_size: 3
            })
        );
    }

    #[test]
    fn test_render() {
        let mut env = env(4, 2, 2);
        env.set_state(
            vec![Position::new(0, 0), Position::new(2, 3)],
            vec![request((3, 1), (1, 1)), request((2, 3), (0, 2))],
        )
        .unwrap();
        let expected = expect![[r#"
            V . . .
            . . . P
            . . . .
            . . P ."#]];
        expected.assert_eq(&env.render());
        assert_eq!(env.to_string(), env.render());
    }
}
