use rand::Rng;

use crate::environment::Space;

/// Replaces `action` by a uniformly sampled one with probability `exploration_probability`.
pub fn epsilon_greedy<S: Space, R: Rng>(
    exploration_probability: f64,
    action: S::Element,
    space: &S,
    rng: &mut R,
) -> S::Element {
    if rng.gen_bool(exploration_probability) {
        space.sample(rng)
    } else {
        action
    }
}

/// Exploration probability decayed linearly from `start` to `end` over `decay_steps`.
pub fn linear_schedule(start: f64, end: f64, decay_steps: u64, step: u64) -> f64 {
    if decay_steps == 0 || step >= decay_steps {
        return end;
    }
    start + (end - start) * step as f64 / decay_steps as f64
}
