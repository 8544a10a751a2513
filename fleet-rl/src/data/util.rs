use crate::environment::Environment;

pub struct Transition<E: Environment> {
    pub before: E::O,
    pub action: E::A,
    pub after: E::O,
    pub reward: f64,
    /// Terminal state reached; truncation alone does not set this.
    pub done: bool,
}

impl<E: Environment> Clone for Transition<E> {
    fn clone(&self) -> Self {
        Self {
            before: self.before.clone(),
            action: self.action.clone(),
            after: self.after.clone(),
            reward: self.reward,
            done: self.done,
        }
    }
}

impl<E: Environment> Transition<E> {
    pub fn to_nested_tuple(self) -> (E::O, (E::A, (E::O, (f64, bool)))) {
        (
            self.before,
            (self.action, (self.after, (self.reward, self.done))),
        )
    }
}

/// Runs `policy` for `n_steps`, resetting whenever an episode finishes or is truncated.
///
/// Returns the transitions together with the observation to continue from.
pub fn collect_multiple<E: Environment, P: FnMut(&E::O) -> E::A>(
    env: &mut E,
    observation: Option<E::O>,
    policy: &mut P,
    n_steps: usize,
) -> (Vec<Transition<E>>, E::O) {
    let mut before = match observation {
        Some(observation) => observation,
        None => env.reset(None).0,
    };
    let mut result = Vec::with_capacity(n_steps);
    for _ in 0..n_steps {
        let action = policy(&before);
        let step = env.step(action.clone());
        let finished = step.finished();
        result.push(Transition {
            before,
            action,
            after: step.observation.clone(),
            reward: step.reward,
            done: step.done,
        });
        before = match finished {
            true => env.reset(None).0,
            false => step.observation,
        };
    }
    (result, before)
}

pub fn collect_single<E: Environment, P: FnMut(&E::O) -> E::A>(
    env: &mut E,
    observation: Option<E::O>,
    policy: &mut P,
) -> (Transition<E>, E::O) {
    let (mut transitions, next) = collect_multiple(env, observation, policy, 1);
    match transitions.pop() {
        Some(transition) => (transition, next),
        None => unreachable!("collecting one step yields one transition"),
    }
}
