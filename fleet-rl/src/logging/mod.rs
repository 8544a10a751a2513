use tracing::debug;

use crate::environment::Environment;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeStatistics {
    pub total_reward: f64,
    pub steps: usize,
    /// The episode reached a terminal state rather than being truncated or capped.
    pub done: bool,
}

/// Plays one episode from `seed` with `policy`, stopping at termination, truncation or
/// after `max_steps` when given.
pub fn evaluate_episode<E: Environment, P: FnMut(&E::O) -> E::A>(
    env: &mut E,
    policy: &mut P,
    seed: u64,
    max_steps: Option<usize>,
) -> EpisodeStatistics {
    let mut statistics = EpisodeStatistics {
        total_reward: 0.0,
        steps: 0,
        done: false,
    };
    let (mut before, _) = env.reset(Some(seed));
    while max_steps.map_or(true, |limit| statistics.steps < limit) {
        let action = policy(&before);
        let step = env.step(action);
        statistics.total_reward += step.reward;
        statistics.steps += 1;
        if step.finished() {
            statistics.done = step.done;
            break;
        }
        before = step.observation;
    }
    debug!(?statistics, "evaluation episode finished");
    statistics
}
