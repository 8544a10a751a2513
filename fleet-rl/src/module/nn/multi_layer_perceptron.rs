use burn::module::Module;
use burn::nn::Linear;
use burn::prelude::*;
use nn::{LeakyRelu, LeakyReluConfig, LinearConfig};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MultiLayerPerceptronError {
    #[error("expected layer sizes (input, hidden.., output), got {0:?}")]
    TooFewLayers(Vec<usize>),
    #[error("layer sizes must be positive, got {0:?}")]
    EmptyLayer(Vec<usize>),
}

/// Layer widths from input to output, e.g. `[75, 64, 64, 8]`.
#[derive(Config, Debug)]
pub struct MultiLayerPerceptronConfig {
    pub sizes: Vec<usize>,
}

#[derive(Module, Debug)]
pub struct MultiLayerPerceptron<B: Backend> {
    linear_layers: Vec<Linear<B>>,
    activation: LeakyRelu,
}

impl MultiLayerPerceptronConfig {
    pub fn from_layers(input_size: usize, hidden_sizes: &[usize], output_size: usize) -> Self {
        let mut sizes = Vec::with_capacity(hidden_sizes.len() + 2);
        sizes.push(input_size);
        sizes.extend_from_slice(hidden_sizes);
        sizes.push(output_size);
        Self::new(sizes)
    }

    pub fn validate(&self) -> Result<(), MultiLayerPerceptronError> {
        if self.sizes.len() < 2 {
            return Err(MultiLayerPerceptronError::TooFewLayers(self.sizes.clone()));
        }
        if self.sizes.contains(&0) {
            return Err(MultiLayerPerceptronError::EmptyLayer(self.sizes.clone()));
        }
        Ok(())
    }

    pub fn init<B: Backend>(
        &self,
        device: &B::Device,
    ) -> Result<MultiLayerPerceptron<B>, MultiLayerPerceptronError> {
        self.validate()?;
        let linear_layers = self
            .sizes
            .windows(2)
            .map(|pair| LinearConfig::new(pair[0], pair[1]).init(device))
            .collect();
        let activation = LeakyReluConfig::new().init();
        Ok(MultiLayerPerceptron {
            linear_layers,
            activation,
        })
    }
}

impl<B: Backend> MultiLayerPerceptron<B> {
    pub fn forward<const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D> {
        let mut x = input;

        match self.linear_layers.split_last() {
            Some((last, hidden)) => {
                for layer in hidden {
                    x = layer.forward(x);
                    x = self.activation.forward(x);
                }
                last.forward(x)
            }
            None => x,
        }
    }
}
