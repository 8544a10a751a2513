pub mod artifact;
pub mod dqn;
pub mod model;
pub mod off_policy;
