use std::sync::Arc;

use crate::error::DriverError;
use crate::maze::{CardinalDirection, Coord, Maze};
use crate::robot::{Robot, Turn};

use super::{RobotDriver, check_energy, check_running};

/// Neighbor preference when several lie equally close to the exit.
const PREFERENCE: [CardinalDirection; 4] = [
    CardinalDirection::North,
    CardinalDirection::South,
    CardinalDirection::East,
    CardinalDirection::West,
];

/// Cheats by reading the maze's distance field, always stepping downhill.
#[derive(Debug)]
pub struct Wizard<R: Robot> {
    robot: R,
    maze: Arc<Maze>,
    initial_battery: f32,
    initial_odometer: u32,
}

impl<R: Robot> Wizard<R> {
    pub fn new(robot: R, maze: Arc<Maze>) -> Self {
        Wizard {
            initial_battery: robot.battery_level(),
            initial_odometer: robot.odometer_reading(),
            robot,
            maze,
        }
    }

    pub fn robot(&self) -> &R {
        &self.robot
    }

    pub fn into_robot(self) -> R {
        self.robot
    }

    /// Open neighbor with the strictly smallest distance, earliest in [`PREFERENCE`] on ties.
    fn closest_neighbor(&self, position: Coord) -> Option<CardinalDirection> {
        let floorplan = self.maze.floorplan();
        let field = self.maze.distance_field();
        let mut best = field.get(position.0, position.1).ok()?;
        let mut choice = None;

        for direction in PREFERENCE {
            if floorplan.blocked(position, direction) {
                continue;
            }
            let Some((x, y)) = direction.step(position, floorplan.width(), floorplan.height())
            else {
                continue;
            };
            match field.get(x, y) {
                Ok(distance) if distance < best => {
                    best = distance;
                    choice = Some(direction);
                }
                _ => {}
            }
        }
        choice
    }

    fn turn_to(&mut self, target: CardinalDirection) -> Result<(), DriverError> {
        if let Some(turn) = Turn::towards(self.robot.current_direction(), target) {
            self.robot.rotate(turn);
            check_running(&self.robot)?;
        }
        Ok(())
    }
}

impl<R: Robot> RobotDriver for Wizard<R> {
    fn drive_to_exit(&mut self) -> Result<bool, DriverError> {
        while self.drive_one_step()? {}
        tracing::info!(
            "[driver] wizard escaped after {} cells using {} energy",
            self.path_length(),
            self.energy_consumption()
        );
        Ok(true)
    }

    fn drive_one_step(&mut self) -> Result<bool, DriverError> {
        if self.robot.is_at_exit() {
            self.turn_to(self.maze.exit().direction)?;
            return Ok(false);
        }
        check_energy(&self.robot)?;

        let position = self.robot.current_position();
        let direction = self
            .closest_neighbor(position)
            .ok_or(DriverError::NoWayForward {
                x: position.0,
                y: position.1,
            })?;
        self.turn_to(direction)?;
        self.robot.move_forward(1);
        check_running(&self.robot)?;
        Ok(true)
    }

    fn energy_consumption(&self) -> f32 {
        self.initial_battery - self.robot.battery_level()
    }

    fn path_length(&self) -> u32 {
        self.robot
            .odometer_reading()
            .saturating_sub(self.initial_odometer)
    }
}
