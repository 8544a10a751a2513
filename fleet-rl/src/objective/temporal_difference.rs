use burn::{
    prelude::Backend,
    tensor::{Bool, Tensor},
};

/// One-step TD error `Q(s, a) - (r + gamma * (1 - done) * V(s'))`.
pub fn temporal_difference<B: Backend>(
    reward: Tensor<B, 1>,
    pred_value_given_action_before: Tensor<B, 1>,
    pred_value_after: Tensor<B, 1>,
    done: Tensor<B, 1, Bool>,
    discount_factor: f64,
) -> Tensor<B, 1> {
    let not_done = done.bool_not().float();
    let trajectory_value_before = reward + not_done * pred_value_after * discount_factor;
    pred_value_given_action_before - trajectory_value_before
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;

    use super::*;

    #[test]
    fn test_terminal_states_do_not_bootstrap() {
        let device = &Default::default();
        let reward = Tensor::<NdArray, 1>::from_floats([-1.0, 9.0], device);
        let q = Tensor::<NdArray, 1>::from_floats([2.0, 2.0], device);
        let v_after = Tensor::<NdArray, 1>::from_floats([4.0, 4.0], device);
        let done = Tensor::<NdArray, 1>::from_floats([0.0, 1.0], device).greater_elem(0.5);

        let error: Vec<f32> = temporal_difference(reward, q, v_after, done, 0.5)
            .into_data()
            .iter::<f32>()
            .collect();
        assert_eq!(error, vec![1.0, -7.0]);
    }
}
