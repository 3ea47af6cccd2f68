use crate::config::DriverConfig;
use crate::error::DriverError;
use crate::maze::Maze;
use crate::robot::{Direction, INFINITE_DISTANCE, Robot, Turn};

use super::{RobotDriver, check_energy, check_running, sense};

/// Keeps its left hand on the wall using only the left and forward sensors.
///
/// Orbits forever around a free-standing loop of walls, so it gives up once the
/// distance it drove passes a multiple of the cell count.
#[derive(Debug)]
pub struct WallFollower<R: Robot> {
    robot: R,
    initial_battery: f32,
    initial_odometer: u32,
    max_path_length: u64,
}

impl<R: Robot> WallFollower<R> {
    pub fn new(robot: R, maze: &Maze, config: DriverConfig) -> Self {
        let cells = maze.width() as u64 * maze.height() as u64;
        WallFollower {
            initial_battery: robot.battery_level(),
            initial_odometer: robot.odometer_reading(),
            max_path_length: config.loop_cutoff_factor as u64 * cells,
            robot,
        }
    }

    pub fn robot(&self) -> &R {
        &self.robot
    }

    pub fn into_robot(self) -> R {
        self.robot
    }

    /// Turns towards the opening, found by looking for an infinite reading.
    fn face_exit(&mut self) -> Result<(), DriverError> {
        for (direction, turn) in [
            (Direction::Left, Turn::Left),
            (Direction::Right, Turn::Right),
            (Direction::Backward, Turn::Around),
        ] {
            if sense(&mut self.robot, direction)? == INFINITE_DISTANCE {
                self.robot.rotate(turn);
                check_running(&self.robot)?;
                break;
            }
        }
        Ok(())
    }
}

impl<R: Robot> RobotDriver for WallFollower<R> {
    fn drive_to_exit(&mut self) -> Result<bool, DriverError> {
        loop {
            if self.robot.is_at_exit() {
                self.drive_one_step()?;
                tracing::info!(
                    "[driver] wall follower escaped after {} cells",
                    self.path_length()
                );
                return Ok(true);
            }
            if self.path_length() as u64 > self.max_path_length {
                tracing::warn!(
                    "[driver] wall follower gave up after {} cells, likely circling",
                    self.path_length()
                );
                return Ok(false);
            }
            self.drive_one_step()?;
        }
    }

    fn drive_one_step(&mut self) -> Result<bool, DriverError> {
        if self.robot.is_at_exit() {
            self.face_exit()?;
            return Ok(false);
        }
        check_energy(&self.robot)?;

        if sense(&mut self.robot, Direction::Left)? > 0 {
            self.robot.rotate(Turn::Left);
            check_running(&self.robot)?;
        } else if sense(&mut self.robot, Direction::Forward)? == 0 {
            self.robot.rotate(Turn::Right);
            check_running(&self.robot)?;
            return Ok(false);
        }
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
