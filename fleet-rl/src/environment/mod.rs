use std::collections::HashMap;

pub use space::{BoxSpace, Discrete, Space};

pub mod fleet;
pub mod space;

pub type Reward = f64;
pub type Done = bool;

/// Auxiliary diagnostics returned next to observations. Empty for every environment in this crate.
pub type Info = HashMap<String, String>;

/// Everything produced by a single [`Environment::step`].
#[derive(Debug, Clone)]
pub struct Step<O> {
    pub observation: O,
    pub reward: Reward,
    /// The episode reached a terminal state.
    pub done: Done,
    /// The episode was cut short by a step limit.
    pub truncated: bool,
    pub info: Info,
}

impl<O> Step<O> {
    /// Whether the caller must reset before stepping again.
    pub fn finished(&self) -> bool {
        self.done || self.truncated
    }
}

pub trait Environment {
    type A: Clone;
    type O: Clone;
    type ActionSpace: Space<Element = Self::A> + Clone;

    fn action_space(&self) -> &Self::ActionSpace;

    fn observation_space(&self) -> &BoxSpace;

    /// Starts a new episode. A `seed` reseeds the environment's own random source first.
    fn reset(&mut self, seed: Option<u64>) -> (Self::O, Info);

    fn step(&mut self, action: Self::A) -> Step<Self::O>;
}
