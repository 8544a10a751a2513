use std::fmt;

use rand::Rng;

/// A cell on the grid. `x` is the column, `y` the row, both counted from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// Uniformly random cell of a `grid_size` square grid.
    pub fn random<R: Rng>(rng: &mut R, grid_size: usize) -> Self {
        Position {
            x: rng.gen_range(0..grid_size),
            y: rng.gen_range(0..grid_size),
        }
    }

    pub fn within(&self, grid_size: usize) -> bool {
        self.x < grid_size && self.y < grid_size
    }

    /// The neighbouring cell in `direction`, or `self` when that would leave the grid.
    pub fn moved(self, direction: Direction, grid_size: usize) -> Self {
        let Position { x, y } = self;
        match direction {
            Direction::Up if y > 0 => Position::new(x, y - 1),
            Direction::Down if y + 1 < grid_size => Position::new(x, y + 1),
            Direction::Left if x > 0 => Position::new(x - 1, y),
            Direction::Right if x + 1 < grid_size => Position::new(x + 1, y),
            _ => self,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const COUNT: usize = 4;

    /// Decodes the low part of an action; any integer maps to some direction.
    pub fn from_index(index: usize) -> Self {
        match index % Self::COUNT {
            0 => Direction::Up,
            1 => Direction::Down,
            2 => Direction::Left,
            _ => Direction::Right,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// A passenger waiting at `pickup` who wants to reach `dropoff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassengerRequest {
    pub pickup: Position,
    pub dropoff: Position,
}

impl PassengerRequest {
    pub fn new(pickup: Position, dropoff: Position) -> Self {
        PassengerRequest { pickup, dropoff }
    }
}
