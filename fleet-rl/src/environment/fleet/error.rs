use thiserror::Error;

use super::grid::Position;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FleetError {
    #[error("grid size must be at least 1")]
    EmptyGrid,
    #[error("fleet must contain at least one vehicle")]
    NoVehicles,
    #[error("episode horizon must be at least one step")]
    EmptyHorizon,
    #[error("position ({}, {}) lies outside a {grid_size}x{grid_size} grid", .position.x, .position.y)]
    PositionOutOfBounds { position: Position, grid_size: usize },
    #[error("expected {expected} vehicles, got {actual}")]
    VehicleCountMismatch { expected: usize, actual: usize },
}
