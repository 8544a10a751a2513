use burn::prelude::*;

use super::grid::{PassengerRequest, Position};

/// Feature planes of an [`Observation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Vehicle = 0,
    Pickup = 1,
    Dropoff = 2,
}

impl Channel {
    pub const COUNT: usize = 3;
}

/// A `grid_size x grid_size x 3` occupancy grid indexed `[row = y, col = x, channel]`.
///
/// Every value is either `0.0` or `1.0`; several entities sharing a cell still produce `1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    grid_size: usize,
    data: Vec<f32>,
}

impl Observation {
    pub fn zeros(grid_size: usize) -> Self {
        Observation {
            grid_size,
            data: vec![0.0; grid_size * grid_size * Channel::COUNT],
        }
    }

    pub fn encode(grid_size: usize, vehicles: &[Position], requests: &[PassengerRequest]) -> Self {
        let mut observation = Self::zeros(grid_size);
        for vehicle in vehicles {
            observation.mark(*vehicle, Channel::Vehicle);
        }
        for request in requests {
            observation.mark(request.pickup, Channel::Pickup);
            observation.mark(request.dropoff, Channel::Dropoff);
        }
        observation
    }

    pub fn shape(&self) -> [usize; 3] {
        [self.grid_size, self.grid_size, Channel::COUNT]
    }

    /// `None` when the cell lies outside the grid.
    pub fn get(&self, row: usize, col: usize, channel: Channel) -> Option<f32> {
        if row >= self.grid_size || col >= self.grid_size {
            return None;
        }
        Some(self.data[self.offset(row, col, channel)])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Flattened row-major features, the layout the Q-network consumes.
    pub fn to_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 1> {
        Tensor::from_floats(self.data.as_slice(), device)
    }

    fn mark(&mut self, position: Position, channel: Channel) {
        let offset = self.offset(position.y, position.x, channel);
        self.data[offset] = 1.0;
    }

    fn offset(&self, row: usize, col: usize, channel: Channel) -> usize {
        (row * self.grid_size + col) * Channel::COUNT + channel as usize
    }
}

impl From<Observation> for Vec<f32> {
    fn from(observation: Observation) -> Self {
        observation.data
    }
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;

    use super::*;

    #[test]
    fn test_encode_marks_each_channel() {
        let vehicles = [Position::new(1, 0), Position::new(1, 0)];
        let requests = [PassengerRequest::new(Position::new(2, 3), Position::new(1, 0))];
        let observation = Observation::encode(4, &vehicles, &requests);

        assert_eq!(observation.shape(), [4, 4, 3]);
        assert_eq!(observation.get(0, 1, Channel::Vehicle), Some(1.0));
        assert_eq!(observation.get(3, 2, Channel::Pickup), Some(1.0));
        assert_eq!(observation.get(0, 1, Channel::Dropoff), Some(1.0));
        assert_eq!(observation.get(3, 2, Channel::Vehicle), Some(0.0));
        // Two vehicles on one cell saturate rather than count.
        assert_eq!(observation.as_slice().iter().sum::<f32>(), 3.0);
    }

    #[test]
    fn test_get_outside_grid() {
        let observation = Observation::zeros(3);
        assert_eq!(observation.get(2, 2, Channel::Dropoff), Some(0.0));
        assert_eq!(observation.get(3, 0, Channel::Vehicle), None);
        assert_eq!(observation.get(0, 3, Channel::Pickup), None);
    }

    #[test]
    fn test_to_tensor_is_flat() {
        let device = &Default::default();
        let observation = Observation::encode(5, &[Position::new(0, 0)], &[]);
        let tensor = observation.to_tensor::<NdArray>(device);
        assert_eq!(tensor.dims(), [75]);
    }
}
