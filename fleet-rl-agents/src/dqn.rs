use std::marker::PhantomData;

use burn::{
    module::AutodiffModule,
    nn::loss::Reduction,
    optim::{GradientsParams, Optimizer},
    prelude::*,
    tensor::{backend::AutodiffBackend, ElementConversion},
};
use fleet_rl::{
    data::util::Transition,
    environment::Environment,
    module::{
        component::{Actor, Critic, Value},
        nn::target_model::WithTarget,
    },
    objective::dqn::{DeepQNetworkLoss, DeepQNetworkLossConfig},
};

use crate::off_policy::OffPolicyAgent;

#[derive(Config, Debug)]
pub struct DeepQNetworkAgentConfig {
    #[config(default = 0.99)]
    pub discount_factor: f64,
    #[config(default = 1e-3)]
    pub learning_rate: f64,
    /// Updates between two target network refreshes.
    #[config(default = 100)]
    pub target_update_interval: usize,
    /// Weight of the online network in a refresh; `1.0` copies it outright.
    #[config(default = 1.0)]
    pub target_update_rate: f64,
}

pub struct DeepQNetworkAgent<B, M, O>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + Actor + Value<B> + Critic<B>,
    O: Optimizer<M, B>,
{
    dqn_model: WithTarget<B, M>,
    config: DeepQNetworkAgentConfig,
    update_counter: usize,
    loss: DeepQNetworkLoss,
    last_loss: Option<f64>,
    optim: O,
    _phantom: PhantomData<B>,
}

impl DeepQNetworkAgentConfig {
    pub fn init<B, M, O>(&self, dqn_model: M, optim: O) -> DeepQNetworkAgent<B, M, O>
    where
        B: AutodiffBackend,
        M: AutodiffModule<B> + Actor + Value<B> + Critic<B>,
        O: Optimizer<M, B>,
    {
        let loss = DeepQNetworkLossConfig::new()
            .with_discount_factor(self.discount_factor)
            .init();
        DeepQNetworkAgent {
            dqn_model: WithTarget::new(dqn_model),
            config: self.clone(),
            update_counter: 0,
            loss,
            last_loss: None,
            optim,
            _phantom: PhantomData,
        }
    }
}

impl<B, M, O> DeepQNetworkAgent<B, M, O>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + Actor + Value<B> + Critic<B>,
    O: Optimizer<M, B>,
{
    pub fn model(&self) -> &M {
        &self.dqn_model.model
    }

    pub fn into_model(self) -> M {
        self.dqn_model.model
    }

    /// Loss of the most recent update.
    pub fn last_loss(&self) -> Option<f64> {
        self.last_loss
    }
}

impl<B, M, O> Actor for DeepQNetworkAgent<B, M, O>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + Actor + Value<B> + Critic<B>,
    O: Optimizer<M, B>,
{
    type O = <M as Actor>::O;

    type A = <M as Actor>::A;

    fn a(&self, observation: &Self::O) -> Self::A {
        self.dqn_model.model.a(observation)
    }
}

impl<B, M, E, O> OffPolicyAgent<B, Vec<Transition<E>>> for DeepQNetworkAgent<B, M, O>
where
    E: Environment,
    B: AutodiffBackend,
    M: AutodiffModule<B>
        + Actor
        + Value<B, OBatch = Vec<E::O>>
        + Critic<B, OBatch = Vec<E::O>, ABatch = Vec<E::A>>,
    O: Optimizer<M, B>,
{
    fn update(mut self, batch: Vec<Transition<E>>) -> Self {
        if batch.is_empty() {
            return self;
        }
        self.update_counter += 1;

        // Transform data from batch
        let (before, (action, (after, (reward, done)))): (
            Vec<E::O>,
            (Vec<E::A>, (Vec<E::O>, (Vec<f64>, Vec<bool>))),
        ) = batch.into_iter().map(|x| x.to_nested_tuple()).unzip();

        let device = &self.dqn_model.model.devices()[0].clone();
        let reward = Tensor::from_floats(reward.as_slice(), device);
        let done = Tensor::<B, 1>::from_floats(
            done.into_iter()
                .map(|x| if x { 1.0 } else { 0.0 })
                .collect::<Vec<f32>>()
                .as_slice(),
            device,
        )
        .greater_elem(0.5);

        // Update model
        let loss = self.loss.forward(
            &self.dqn_model,
            &before,
            &action,
            &after,
            reward,
            done,
            Reduction::Mean,
        );
        self.last_loss = Some(loss.clone().into_scalar().elem::<f64>());

        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &self.dqn_model.model);
        self.dqn_model.model =
            self.optim
                .step(self.config.learning_rate, self.dqn_model.model, grads);

        // Update target network
        if self.update_counter >= self.config.target_update_interval {
            self.update_counter = 0;
            self.dqn_model = self
                .dqn_model
                .update_target_model(self.config.target_update_rate);
        }

        self
    }
}
