use std::marker::PhantomData;

use burn::config::Config;
use burn::tensor::backend::AutodiffBackend;
use fleet_rl::data::util::{collect_multiple, collect_single};
use fleet_rl::environment::Space;
use fleet_rl::logging::{evaluate_episode, EpisodeStatistics};
use fleet_rl::module::component::Actor;
use fleet_rl::module::exploration::{epsilon_greedy, linear_schedule};
use fleet_rl::{
    data::{memory::Memory, util::Transition},
    environment::Environment,
};
use rand::Rng;
use tqdm::tqdm;
use tracing::info;

pub trait OffPolicyAgent<B: AutodiffBackend, TBatch>: Actor {
    fn update(self, batch: TBatch) -> Self;
}

#[derive(Config, Debug)]
pub struct OffPolicyAlgorithmConfig {
    /// Uniformly random steps stored before learning starts.
    #[config(default = 1_000)]
    pub early_start_steps: usize,
    pub training_steps: u64,
    #[config(default = 32)]
    pub batch_size: usize,
    #[config(default = 500)]
    pub evaluation_interval: u64,
    /// Seeds of the evaluation episodes, one episode each.
    #[config(default = "vec![0, 1, 2]")]
    pub evaluation_seeds: Vec<u64>,
    /// Step cap for evaluation episodes, a greedy policy may never finish.
    #[config(default = 100)]
    pub evaluation_max_steps: usize,
    #[config(default = 1.0)]
    pub exploration_start: f64,
    #[config(default = 0.1)]
    pub exploration_end: f64,
    /// Training steps over which exploration decays from start to end.
    #[config(default = 5_000)]
    pub exploration_decay_steps: u64,
}

pub struct OffPolicyAlgorithm<B, E, A, M, R>
where
    E: Environment,
    B: AutodiffBackend,
    A: OffPolicyAgent<B, Vec<Transition<E>>, A = E::A, O = E::O>,
    M: Memory<T = Transition<E>>,
    R: Rng,
{
    cfg: OffPolicyAlgorithmConfig,
    env: E,
    eval_env: E,
    agent: A,
    memory: M,
    rng: R,
    _phantom: PhantomData<B>,
}

pub struct TrainingSummary<A> {
    pub agent: A,
    /// Mean reward of each evaluation round, in training order.
    pub evaluation_rewards: Vec<f64>,
}

impl OffPolicyAlgorithmConfig {
    pub fn init<A, B, E, M, R>(
        &self,
        env: E,
        eval_env: E,
        agent: A,
        memory: M,
        rng: R,
    ) -> OffPolicyAlgorithm<B, E, A, M, R>
    where
        E: Environment,
        B: AutodiffBackend,
        A: OffPolicyAgent<B, Vec<Transition<E>>, A = E::A, O = E::O>,
        M: Memory<T = Transition<E>>,
        R: Rng,
    {
        self.assertions();
        OffPolicyAlgorithm {
            cfg: self.clone(),
            env,
            eval_env,
            agent,
            memory,
            rng,
            _phantom: PhantomData,
        }
    }

    fn assertions(&self) {
        for (name, probability) in [
            ("start", self.exploration_start),
            ("end", self.exploration_end),
        ] {
            assert!(
                (0.0..=1.0).contains(&probability),
                "The exploration {name} should be in the interval [0,1]. got {probability}"
            );
        }
    }
}

impl<B, E, A, M, R> OffPolicyAlgorithm<B, E, A, M, R>
where
    E: Environment,
    B: AutodiffBackend,
    A: OffPolicyAgent<B, Vec<Transition<E>>, A = E::A, O = E::O>,
    M: Memory<T = Transition<E>>,
    R: Rng,
{
    pub fn train(mut self) -> TrainingSummary<A> {
        let action_space = self.env.action_space().clone();

        // Environment seeding
        let (observation, _) = self.env.reset(Some(self.rng.next_u64()));

        // Early Start
        let rng = &mut self.rng;
        let mut policy = |_: &E::O| action_space.sample(rng);
        let (transitions, observation) = collect_multiple(
            &mut self.env,
            Some(observation),
            &mut policy,
            self.cfg.early_start_steps,
        );
        self.memory.append(transitions);
        info!(stored = self.memory.len(), "early start finished");

        // Main Training Loop
        let mut evaluation_rewards = Vec::new();
        let mut observation = Some(observation);
        for step in tqdm(0..self.cfg.training_steps) {
            // Step Environment
            let exploration = linear_schedule(
                self.cfg.exploration_start,
                self.cfg.exploration_end,
                self.cfg.exploration_decay_steps,
                step,
            );
            let agent = &self.agent;
            let rng = &mut self.rng;
            let (transition, next) = collect_single(&mut self.env, observation, &mut |o| {
                epsilon_greedy(exploration, agent.a(o), &action_space, rng)
            });
            observation = Some(next);
            self.memory.push(transition);

            // Update Agent
            self.agent = self
                .agent
                .update(self.memory.sample_random_batch(self.cfg.batch_size));

            // Evaluate
            if self.cfg.evaluation_interval > 0 && step % self.cfg.evaluation_interval == 0 {
                let mean_reward = self.evaluate();
                info!(step, exploration, mean_reward, "evaluation");
                evaluation_rewards.push(mean_reward);
            }
        }

        info!(?evaluation_rewards, "training finished");
        TrainingSummary {
            agent: self.agent,
            evaluation_rewards,
        }
    }

    /// Mean greedy reward over the configured evaluation seeds.
    fn evaluate(&mut self) -> f64 {
        let agent = &self.agent;
        let statistics: Vec<EpisodeStatistics> = self
            .cfg
            .evaluation_seeds
            .iter()
            .map(|seed| {
                evaluate_episode(
                    &mut self.eval_env,
                    &mut |o| agent.a(o),
                    *seed,
                    Some(self.cfg.evaluation_max_steps),
                )
            })
            .collect();
        if statistics.is_empty() {
            return 0.0;
        }
        statistics.iter().map(|s| s.total_reward).sum::<f64>() / statistics.len() as f64
    }
}
