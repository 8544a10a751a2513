use burn::{prelude::*, tensor::ElementConversion};
use fleet_rl::{
    environment::{fleet::Observation, Discrete, Environment},
    module::{
        component::{Actor, Critic, Value},
        nn::multi_layer_perceptron::{
            MultiLayerPerceptron, MultiLayerPerceptronConfig, MultiLayerPerceptronError,
        },
    },
};

#[derive(Config, Debug)]
pub struct FleetQNetworkConfig {
    /// Flattened observation length.
    pub input_size: usize,
    pub num_actions: usize,
    #[config(default = "vec![64, 64]")]
    pub hidden_sizes: Vec<usize>,
}

impl FleetQNetworkConfig {
    /// Sized from the environment's observation and action spaces.
    pub fn for_environment<E: Environment<ActionSpace = Discrete>>(env: &E) -> Self {
        Self::new(env.observation_space().num_elements(), env.action_space().n)
    }

    pub fn init<B: Backend>(
        &self,
        device: &B::Device,
    ) -> Result<FleetQNetwork<B>, MultiLayerPerceptronError> {
        let model = MultiLayerPerceptronConfig::from_layers(
            self.input_size,
            &self.hidden_sizes,
            self.num_actions,
        )
        .init(device)?;
        Ok(FleetQNetwork { model })
    }
}

/// Maps a flattened fleet observation to one value per `(vehicle, direction)` action.
#[derive(Module, Debug)]
pub struct FleetQNetwork<B: Backend> {
    model: MultiLayerPerceptron<B>,
}

impl<B: Backend> FleetQNetwork<B> {
    fn device(&self) -> B::Device {
        self.devices()[0].clone()
    }

    fn observation_batch(&self, observations: &[Observation]) -> Tensor<B, 2> {
        let device = self.device();
        let rows = observations
            .iter()
            .map(|observation| observation.to_tensor(&device))
            .collect();
        Tensor::stack(rows, 0)
    }

    pub fn q_values(&self, observations: &[Observation]) -> Tensor<B, 2> {
        self.model.forward(self.observation_batch(observations))
    }
}

impl<B: Backend> Critic<B> for FleetQNetwork<B> {
    type OBatch = Vec<Observation>;
    type ABatch = Vec<usize>;

    fn q_batch(&self, observations: &Self::OBatch, actions: &Self::ABatch) -> Tensor<B, 1> {
        let actions: Vec<i64> = actions.iter().map(|a| *a as i64).collect();
        let actions: Tensor<B, 1, Int> = Tensor::from_ints(actions.as_slice(), &self.device());
        self.q_values(observations)
            .gather(1, actions.unsqueeze_dim(1))
            .squeeze(1)
    }
}

impl<B: Backend> Value<B> for FleetQNetwork<B> {
    type OBatch = Vec<Observation>;

    fn v_batch(&self, observations: &Self::OBatch) -> Tensor<B, 1> {
        self.q_values(observations).max_dim(1).squeeze(1)
    }
}

impl<B: Backend> Actor for FleetQNetwork<B> {
    type A = usize;
    type O = Observation;

    /// The greedy action.
    fn a(&self, observation: &Observation) -> usize {
        let values = self.model.forward(observation.to_tensor(&self.device()));
        let best: i64 = values.argmax(0).into_scalar().elem();
        best as usize
    }
}
