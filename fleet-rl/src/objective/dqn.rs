use burn::{nn::loss::Reduction, prelude::*};

use crate::module::{
    component::{Critic, Value},
    nn::target_model::WithTarget,
};

use super::temporal_difference::temporal_difference;

#[derive(Config, Debug)]
pub struct DeepQNetworkLossConfig {
    #[config(default = 0.99)]
    pub discount_factor: f64,
}

impl DeepQNetworkLossConfig {
    pub fn init(&self) -> DeepQNetworkLoss {
        self.assertions();
        DeepQNetworkLoss {
            discount_factor: self.discount_factor,
        }
    }

    fn assertions(&self) {
        assert!(
            0.0 <= self.discount_factor && self.discount_factor <= 1.0,
            "The discount factor should be in the interval [0,1]. got {}",
            self.discount_factor
        )
    }
}

/// Squared one-step TD error, bootstrapping from the target network.
#[derive(Module, Clone, Debug)]
pub struct DeepQNetworkLoss {
    discount_factor: f64,
}

impl DeepQNetworkLoss {
    #[allow(clippy::too_many_arguments)]
    pub fn forward<B, M>(
        &self,
        model: &WithTarget<B, M>,
        before: &<M as Critic<B>>::OBatch,
        action: &<M as Critic<B>>::ABatch,
        after: &<M as Critic<B>>::OBatch,
        reward: Tensor<B, 1>,
        done: Tensor<B, 1, Bool>,
        reduction: Reduction,
    ) -> Tensor<B, 1>
    where
        B: Backend,
        M: Module<B> + Critic<B> + Value<B, OBatch = <M as Critic<B>>::OBatch>,
    {
        let pred_value_given_action_before = model.model.q_batch(before, action);
        let pred_value_after = model.target.v_batch(after).detach();
        let error = temporal_difference(
            reward,
            pred_value_given_action_before,
            pred_value_after,
            done,
            self.discount_factor,
        );
        let squared = error.powf_scalar(2.0);
        match reduction {
            Reduction::Sum => squared.sum(),
            Reduction::Mean | Reduction::Auto => squared.mean(),
        }
    }
}
