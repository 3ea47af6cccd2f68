//! Strategies that steer a robot out of a maze.

mod wall_follower;
mod wizard;

pub use wall_follower::WallFollower;
pub use wizard::Wizard;

use crate::error::{DriverError, SensorError};
use crate::robot::{Direction, Robot, StopReason};

pub trait RobotDriver {
    /// Drives until the robot stands on the exit cell facing the opening.
    ///
    /// Returns `Ok(false)` if the driver gives up without reaching the exit.
    fn drive_to_exit(&mut self) -> Result<bool, DriverError>;

    /// Makes a single decision. Returns `Ok(true)` if the robot moved a cell.
    fn drive_one_step(&mut self) -> Result<bool, DriverError>;

    /// Battery spent since the driver took over the robot.
    fn energy_consumption(&self) -> f32;

    /// Cells travelled since the driver took over the robot.
    fn path_length(&self) -> u32;
}

/// Turns a stopped robot into the matching driver error.
fn check_running<R: Robot>(robot: &R) -> Result<(), DriverError> {
    match robot.stop_reason() {
        None => Ok(()),
        Some(StopReason::EnergyDepleted) => Err(DriverError::OutOfEnergy {
            remaining: robot.battery_level(),
        }),
        Some(reason) => Err(DriverError::RobotStopped(reason)),
    }
}

/// Fails early if the battery cannot pay for another step.
fn check_energy<R: Robot>(robot: &R) -> Result<(), DriverError> {
    if robot.battery_level() < robot.energy_for_step_forward() {
        return Err(DriverError::OutOfEnergy {
            remaining: robot.battery_level(),
        });
    }
    Ok(())
}

/// Reads a sensor, reporting a drained battery as running out of energy.
fn sense<R: Robot>(robot: &mut R, direction: Direction) -> Result<u32, DriverError> {
    match robot.distance_to_obstacle(direction) {
        Ok(distance) => Ok(distance),
        Err(SensorError::PowerFailure { available, .. }) => {
            Err(DriverError::OutOfEnergy { remaining: available })
        }
        Err(e) => Err(e.into()),
    }
}
