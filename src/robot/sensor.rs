use crate::error::SensorError;
use crate::maze::{CardinalDirection, Coord, Floorplan, Maze};

use super::Direction;

/// Reading returned when a sensor looks straight out through the exit.
pub const INFINITE_DISTANCE: u32 = u32::MAX;

/// Measures how far a robot can travel in the direction the sensor is mounted.
pub trait DistanceSensor: Send {
    /// Number of steps from `position` to the next wall in the mounted direction,
    /// relative to `heading`.
    ///
    /// The sensing cost is taken from `power_supply` before measuring. Returns
    /// [`INFINITE_DISTANCE`] if nothing but the exit lies ahead. A negative
    /// `power_supply` is not a battery level and gives [`SensorError::Unsupported`].
    fn distance_to_obstacle(
        &self,
        maze: &Maze,
        position: Coord,
        heading: CardinalDirection,
        power_supply: &mut f32,
    ) -> Result<u32, SensorError>;

    fn set_sensor_direction(&mut self, mounted: Direction);

    fn mounted_direction(&self) -> Direction;

    fn energy_consumption_for_sensing(&self) -> f32;

    fn is_operational(&self) -> bool;

    /// Marks the sensor as working or broken.
    fn set_operational(&mut self, operational: bool);

    /// Periodic failure and repair cycles are not modelled.
    fn start_failure_and_repair_process(
        &mut self,
        _mean_time_between_failures: u32,
        _mean_time_to_repair: u32,
    ) -> Result<(), SensorError> {
        Err(SensorError::Unsupported)
    }

    fn stop_failure_and_repair_process(&mut self) -> Result<(), SensorError> {
        Err(SensorError::Unsupported)
    }
}

/// Walks wallboard by wallboard from `start` towards `direction`.
fn steps_to_wall(floorplan: &Floorplan, start: Coord, direction: CardinalDirection) -> u32 {
    let (width, height) = (floorplan.width(), floorplan.height());
    let mut position = start;
    let mut steps = 0;
    loop {
        if floorplan.blocked(position, direction) {
            return steps;
        }
        match direction.step(position, width, height) {
            Some(next) => {
                position = next;
                steps += 1;
            }
            // The only open border wallboard is the exit
            None => return INFINITE_DISTANCE,
        }
    }
}

/// A simple, always reliable distance sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasicSensor {
    mounted: Direction,
    operational: bool,
    energy: f32,
}

impl Default for BasicSensor {
    fn default() -> Self {
        BasicSensor::new(1.0)
    }
}

impl BasicSensor {
    pub fn new(energy_per_reading: f32) -> Self {
        BasicSensor {
            mounted: Direction::Forward,
            operational: true,
            energy: energy_per_reading,
        }
    }
}

impl DistanceSensor for BasicSensor {
    fn distance_to_obstacle(
        &self,
        maze: &Maze,
        position: Coord,
        heading: CardinalDirection,
        power_supply: &mut f32,
    ) -> Result<u32, SensorError> {
        if !self.operational {
            return Err(SensorError::Fault);
        }
        if *power_supply < 0.0 {
            return Err(SensorError::Unsupported);
        }
        if *power_supply < self.energy {
            return Err(SensorError::PowerFailure {
                available: *power_supply,
                required: self.energy,
            });
        }
        *power_supply -= self.energy;

        let direction = self.mounted.to_cardinal(heading);
        Ok(steps_to_wall(maze.floorplan(), position, direction))
    }

    fn set_sensor_direction(&mut self, mounted: Direction) {
        self.mounted = mounted;
    }

    fn mounted_direction(&self) -> Direction {
        self.mounted
    }

    fn energy_consumption_for_sensing(&self) -> f32 {
        self.energy
    }

    fn is_operational(&self) -> bool {
        self.operational
    }

    fn set_operational(&mut self, operational: bool) {
        self.operational = operational;
    }
}
