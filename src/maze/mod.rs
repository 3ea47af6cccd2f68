mod floorplan;
mod grid;
mod wall;

pub use floorplan::{Floorplan, MAX_DIMENSION, Room};
pub use wall::{CardinalDirection, Coord, Slot, Wallboard};

use crate::distance::DistanceField;
use crate::error::MazeError;

/// A finished maze: its floorplan, the distance field towards its exit and the
/// position a robot starts from.
///
/// Once built a maze is read-only, so it is shared behind an `Arc` between the
/// factory, robots and drivers.
#[derive(Debug, Clone, PartialEq)]
pub struct Maze {
    floorplan: Floorplan,
    distances: DistanceField,
    start: Coord,
}

impl Maze {
    /// Builds a maze from a floorplan that already has its exit.
    ///
    /// This is also the entry point for floorplans loaded from elsewhere. The start
    /// position is the cell farthest from the exit.
    pub fn from_floorplan(floorplan: Floorplan) -> Result<Self, MazeError> {
        let distances = DistanceField::compute(&floorplan)?;
        let start = distances.max_distance_cell();
        Ok(Maze {
            floorplan,
            distances,
            start,
        })
    }

    /// Replaces the start position.
    pub fn with_start(mut self, start: Coord) -> Result<Self, MazeError> {
        if !self.floorplan.is_in_bounds(start) {
            return Err(MazeError::OutOfRange {
                x: start.0,
                y: start.1,
                width: self.width(),
                height: self.height(),
            });
        }
        self.start = start;
        Ok(self)
    }

    pub fn floorplan(&self) -> &Floorplan {
        &self.floorplan
    }

    pub fn distance_field(&self) -> &DistanceField {
        &self.distances
    }

    pub fn width(&self) -> u16 {
        self.floorplan.width()
    }

    pub fn height(&self) -> u16 {
        self.floorplan.height()
    }

    pub fn start_position(&self) -> Coord {
        self.start
    }

    /// The exit wallboard. A `Maze` always has one.
    pub fn exit(&self) -> Wallboard {
        let (x, y) = self.distances.exit();
        self.floorplan
            .exit()
            .unwrap_or(Wallboard::new(x, y, CardinalDirection::North))
    }

    pub fn has_wall(&self, x: u16, y: u16, direction: CardinalDirection) -> Result<bool, MazeError> {
        self.floorplan.has_wall(x, y, direction)
    }

    pub fn distance_to_exit(&self, x: u16, y: u16) -> Result<u32, MazeError> {
        self.distances.get(x, y)
    }
}
