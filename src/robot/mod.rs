//! Robots moving through a maze on a limited battery.

mod sensor;

pub use sensor::{BasicSensor, DistanceSensor, INFINITE_DISTANCE};

use std::sync::Arc;

use crate::config::RobotConfig;
use crate::error::SensorError;
use crate::maze::{CardinalDirection, Coord, Maze};

/// A rotation in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
    Around,
}

impl Turn {
    fn quarter_turns(self) -> f32 {
        match self {
            Turn::Left | Turn::Right => 1.0,
            Turn::Around => 2.0,
        }
    }

    fn apply(self, heading: CardinalDirection) -> CardinalDirection {
        match self {
            Turn::Left => heading.rotate_counterclockwise(),
            Turn::Right => heading.rotate_clockwise(),
            Turn::Around => heading.opposite(),
        }
    }

    /// Cheapest rotation that takes `heading` to `target`, or `None` if already aligned.
    pub fn towards(heading: CardinalDirection, target: CardinalDirection) -> Option<Turn> {
        if heading == target {
            None
        } else if heading.rotate_counterclockwise() == target {
            Some(Turn::Left)
        } else if heading.rotate_clockwise() == target {
            Some(Turn::Right)
        } else {
            Some(Turn::Around)
        }
    }
}

/// A direction relative to the robot's heading, used to mount sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Backward,
        Direction::Left,
        Direction::Right,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Absolute direction this relative direction points to for a given heading.
    pub fn to_cardinal(self, heading: CardinalDirection) -> CardinalDirection {
        match self {
            Direction::Forward => heading,
            Direction::Backward => heading.opposite(),
            Direction::Left => heading.rotate_counterclockwise(),
            Direction::Right => heading.rotate_clockwise(),
        }
    }
}

/// Why a robot stopped. A stopped robot ignores actuation until it is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Walked into a wallboard
    Collision,
    /// Not enough battery left for the requested action
    EnergyDepleted,
    /// Jumped towards the outside of the maze
    IllegalJump,
    /// Walked out through the exit
    Escaped,
}

/// The actuator and sensor interface drivers program against.
pub trait Robot {
    fn current_position(&self) -> Coord;

    fn current_direction(&self) -> CardinalDirection;

    fn battery_level(&self) -> f32;

    fn set_battery_level(&mut self, level: f32);

    fn energy_for_full_rotation(&self) -> f32;

    fn energy_for_step_forward(&self) -> f32;

    /// Cells traversed since the last odometer reset.
    fn odometer_reading(&self) -> u32;

    fn reset_odometer(&mut self);

    /// Turns in place. Stops the robot with [`StopReason::EnergyDepleted`] if
    /// the battery cannot pay for the turn.
    fn rotate(&mut self, turn: Turn);

    /// Moves up to `distance` cells forward, stopping at the first obstacle or
    /// when the battery runs out. Steps already taken are kept.
    fn move_forward(&mut self, distance: u32);

    /// Moves one cell forward regardless of walls, for free.
    fn jump(&mut self);

    fn is_at_exit(&self) -> bool;

    fn is_inside_room(&self) -> bool;

    fn stop_reason(&self) -> Option<StopReason>;

    fn has_stopped(&self) -> bool {
        self.stop_reason().is_some()
    }

    /// Clears the stopped state.
    fn reset(&mut self);

    /// Reads the sensor mounted in `direction`.
    fn distance_to_obstacle(&mut self, direction: Direction) -> Result<u32, SensorError>;

    fn can_see_through_the_exit_into_eternity(
        &mut self,
        direction: Direction,
    ) -> Result<bool, SensorError> {
        Ok(self.distance_to_obstacle(direction)? == INFINITE_DISTANCE)
    }

    fn start_failure_and_repair_process(
        &mut self,
        direction: Direction,
        mean_time_between_failures: u32,
        mean_time_to_repair: u32,
    ) -> Result<(), SensorError>;

    fn stop_failure_and_repair_process(&mut self, direction: Direction) -> Result<(), SensorError>;
}

/// A robot with up to four distance sensors, one per relative direction.
pub struct BasicRobot {
    maze: Arc<Maze>,
    config: RobotConfig,
    position: Coord,
    heading: CardinalDirection,
    battery: f32,
    odometer: u32,
    stopped: Option<StopReason>,
    sensors: [Option<Box<dyn DistanceSensor>>; 4],
}

impl std::fmt::Debug for BasicRobot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicRobot")
            .field("position", &self.position)
            .field("heading", &self.heading)
            .field("battery", &self.battery)
            .field("odometer", &self.odometer)
            .field("stopped", &self.stopped)
            .finish_non_exhaustive()
    }
}

impl BasicRobot {
    /// A sensorless robot on the maze's start cell, facing east.
    pub fn new(maze: Arc<Maze>, config: RobotConfig) -> Self {
        let position = maze.start_position();
        BasicRobot {
            maze,
            config,
            position,
            heading: CardinalDirection::East,
            battery: config.initial_battery,
            odometer: 0,
            stopped: None,
            sensors: [None, None, None, None],
        }
    }

    /// A robot with a [`BasicSensor`] in every direction.
    pub fn with_all_sensors(maze: Arc<Maze>, config: RobotConfig) -> Self {
        let mut robot = BasicRobot::new(maze, config);
        for direction in Direction::ALL {
            robot.add_distance_sensor(Box::new(BasicSensor::new(config.sensing_energy)), direction);
        }
        robot
    }

    /// Mounts `sensor` facing `direction`, replacing any sensor already there.
    pub fn add_distance_sensor(&mut self, mut sensor: Box<dyn DistanceSensor>, direction: Direction) {
        sensor.set_sensor_direction(direction);
        self.sensors[direction.index()] = Some(sensor);
    }

    pub fn sensor_mut(
        &mut self,
        direction: Direction,
    ) -> Option<&mut (dyn DistanceSensor + 'static)> {
        self.sensors[direction.index()].as_deref_mut()
    }

    pub fn maze(&self) -> &Arc<Maze> {
        &self.maze
    }

    fn halt(&mut self, reason: StopReason) {
        if self.stopped.is_none() {
            tracing::debug!("[robot] stopped at {:?}: {:?}", self.position, reason);
            self.stopped = Some(reason);
        }
    }
}

impl Robot for BasicRobot {
    fn current_position(&self) -> Coord {
        self.position
    }

    fn current_direction(&self) -> CardinalDirection {
        self.heading
    }

    fn battery_level(&self) -> f32 {
        self.battery
    }

    fn set_battery_level(&mut self, level: f32) {
        self.battery = level;
    }

    fn energy_for_full_rotation(&self) -> f32 {
        self.config.full_rotation_energy
    }

    fn energy_for_step_forward(&self) -> f32 {
        self.config.step_energy
    }

    fn odometer_reading(&self) -> u32 {
        self.odometer
    }

    fn reset_odometer(&mut self) {
        self.odometer = 0;
    }

    fn rotate(&mut self, turn: Turn) {
        if self.stopped.is_some() {
            return;
        }
        let cost = self.config.full_rotation_energy / 4.0 * turn.quarter_turns();
        if self.battery < cost {
            self.halt(StopReason::EnergyDepleted);
            return;
        }
        self.battery -= cost;
        self.heading = turn.apply(self.heading);
    }

    fn move_forward(&mut self, distance: u32) {
        for _ in 0..distance {
            if self.stopped.is_some() {
                return;
            }
            if self.battery < self.config.step_energy {
                self.halt(StopReason::EnergyDepleted);
                return;
            }
            let floorplan = self.maze.floorplan();
            let blocked = floorplan.blocked(self.position, self.heading);
            let next = self
                .heading
                .step(self.position, floorplan.width(), floorplan.height());
            if blocked {
                self.halt(StopReason::Collision);
                return;
            }
            self.battery -= self.config.step_energy;
            self.odometer += 1;
            match next {
                Some(next) => self.position = next,
                // Through the exit opening; the robot stays on the exit cell
                None => self.halt(StopReason::Escaped),
            }
        }
    }

    fn jump(&mut self) {
        if self.stopped.is_some() {
            return;
        }
        match self
            .heading
            .step(self.position, self.maze.width(), self.maze.height())
        {
            Some(next) => {
                self.position = next;
                self.odometer += 1;
            }
            None => self.halt(StopReason::IllegalJump),
        }
    }

    fn is_at_exit(&self) -> bool {
        self.maze.floorplan().exit_position() == Some(self.position)
    }

    fn is_inside_room(&self) -> bool {
        self.maze
            .floorplan()
            .is_in_room(self.position.0, self.position.1)
            .unwrap_or(false)
    }

    fn stop_reason(&self) -> Option<StopReason> {
        self.stopped
    }

    fn reset(&mut self) {
        self.stopped = None;
    }

    fn distance_to_obstacle(&mut self, direction: Direction) -> Result<u32, SensorError> {
        let Some(sensor) = self.sensors[direction.index()].as_ref() else {
            return Err(SensorError::Unsupported);
        };
        let reading =
            sensor.distance_to_obstacle(&self.maze, self.position, self.heading, &mut self.battery);
        if let Err(SensorError::PowerFailure { .. }) = reading {
            self.halt(StopReason::EnergyDepleted);
        }
        reading
    }

    fn start_failure_and_repair_process(
        &mut self,
        direction: Direction,
        mean_time_between_failures: u32,
        mean_time_to_repair: u32,
    ) -> Result<(), SensorError> {
        self.sensor_mut(direction)
            .ok_or(SensorError::Unsupported)?
            .start_failure_and_repair_process(mean_time_between_failures, mean_time_to_repair)
    }

    fn stop_failure_and_repair_process(&mut self, direction: Direction) -> Result<(), SensorError> {
        self.sensor_mut(direction)
            .ok_or(SensorError::Unsupported)?
            .stop_failure_and_repair_process()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;

    use super::*;
    use crate::config::FactoryConfig;
    use crate::factory::{StubOrder, build_maze};
    use crate::generators::Generator;
    use crate::maze::{Floorplan, Wallboard};

    /// 12x1 corridor with its exit on the east end.
    fn corridor() -> Arc<Maze> {
        let mut floorplan = Floorplan::new(12, 1).unwrap();
        for x in 0..12 {
            floorplan
                .delete_wallboard(Wallboard::new(x, 0, CardinalDirection::East))
                .unwrap();
        }
        Arc::new(Maze::from_floorplan(floorplan).unwrap())
    }

    /// 3x2 snake: (0,0) (1,0) (2,0) down to (2,1) (1,1) (0,1), exit below (0,1).
    fn snake(start: Coord) -> Arc<Maze> {
        let mut floorplan = Floorplan::new(3, 2).unwrap();
        for wallboard in [
            Wallboard::new(0, 0, CardinalDirection::East),
            Wallboard::new(1, 0, CardinalDirection::East),
            Wallboard::new(2, 0, CardinalDirection::South),
            Wallboard::new(1, 1, CardinalDirection::East),
            Wallboard::new(0, 1, CardinalDirection::East),
        ] {
            floorplan.delete_wallboard(wallboard).unwrap();
        }
        floorplan.set_exit_position(0, 1).unwrap();
        let maze = Maze::from_floorplan(floorplan).unwrap();
        Arc::new(maze.with_start(start).unwrap())
    }

    fn robot(maze: Arc<Maze>) -> BasicRobot {
        BasicRobot::with_all_sensors(maze, RobotConfig::default())
    }

    #[test]
    fn test_initial_state() {
        let robot = robot(corridor());
        assert_eq!(robot.current_position(), (0, 0));
        assert_eq!(robot.current_direction(), CardinalDirection::East);
        assert_eq!(robot.battery_level(), 2000.0);
        assert_eq!(robot.energy_for_full_rotation(), 12.0);
        assert_eq!(robot.energy_for_step_forward(), 4.0);
        assert_eq!(robot.odometer_reading(), 0);
        assert!(!robot.has_stopped());
    }

    #[test]
    fn test_rotation_costs() {
        let mut robot = robot(corridor());
        robot.rotate(Turn::Left);
        assert_eq!(robot.battery_level(), 1997.0);
        assert_eq!(robot.current_direction(), CardinalDirection::North);
        robot.rotate(Turn::Right);
        assert_eq!(robot.battery_level(), 1994.0);
        assert_eq!(robot.current_direction(), CardinalDirection::East);
        robot.rotate(Turn::Around);
        assert_eq!(robot.battery_level(), 1988.0);
        assert_eq!(robot.current_direction(), CardinalDirection::West);
        assert_eq!(robot.odometer_reading(), 0);
    }

    #[test]
    fn test_ten_steps() {
        let mut robot = robot(corridor());
        robot.move_forward(10);
        assert_eq!(robot.current_position(), (10, 0));
        assert_eq!(robot.battery_level(), 1960.0);
        assert_eq!(robot.odometer_reading(), 10);
        assert!(!robot.has_stopped());
        robot.reset_odometer();
        assert_eq!(robot.odometer_reading(), 0);
    }

    #[test]
    fn test_sensing() {
        let mut robot = robot(corridor());
        assert_eq!(robot.distance_to_obstacle(Direction::Forward), Ok(INFINITE_DISTANCE));
        assert_eq!(robot.can_see_through_the_exit_into_eternity(Direction::Forward), Ok(true));
        assert_eq!(robot.distance_to_obstacle(Direction::Backward), Ok(0));
        assert_eq!(robot.can_see_through_the_exit_into_eternity(Direction::Left), Ok(false));
        assert_eq!(robot.battery_level(), 1996.0);

        let mut robot = self::robot(snake((1, 0)));
        assert_eq!(robot.distance_to_obstacle(Direction::Forward), Ok(1));
        assert_eq!(robot.distance_to_obstacle(Direction::Backward), Ok(1));
        robot.move_forward(1);
        assert_eq!(robot.distance_to_obstacle(Direction::Forward), Ok(0));
        assert_eq!(robot.distance_to_obstacle(Direction::Right), Ok(1));
    }

    #[test]
    fn test_sensing_without_power_stops_robot() {
        let mut robot = robot(corridor());
        robot.set_battery_level(0.5);
        assert!(matches!(
            robot.distance_to_obstacle(Direction::Forward),
            Err(SensorError::PowerFailure { .. })
        ));
        assert_eq!(robot.battery_level(), 0.5);
        assert_eq!(robot.stop_reason(), Some(StopReason::EnergyDepleted));
    }

    #[test]
    fn test_sensing_with_negative_battery_unsupported() {
        let mut robot = robot(corridor());
        robot.set_battery_level(-5.0);
        assert_eq!(
            robot.distance_to_obstacle(Direction::Forward),
            Err(SensorError::Unsupported)
        );
        assert_eq!(robot.battery_level(), -5.0);
        assert_eq!(robot.stop_reason(), None);
    }

    #[test]
    fn test_missing_and_broken_sensors() {
        let mut bare = BasicRobot::new(corridor(), RobotConfig::default());
        assert_eq!(bare.distance_to_obstacle(Direction::Forward), Err(SensorError::Unsupported));
        assert_eq!(
            bare.start_failure_and_repair_process(Direction::Left, 100, 10),
            Err(SensorError::Unsupported)
        );

        let mut robot = robot(corridor());
        robot.sensor_mut(Direction::Left).unwrap().set_operational(false);
        assert_eq!(robot.distance_to_obstacle(Direction::Left), Err(SensorError::Fault));
        assert_eq!(robot.battery_level(), 2000.0);
        assert!(!robot.has_stopped());
        assert_eq!(
            robot.stop_failure_and_repair_process(Direction::Left),
            Err(SensorError::Unsupported)
        );
    }

    #[test]
    fn test_collision_keeps_partial_progress() {
        let mut robot = robot(snake((0, 0)));
        robot.move_forward(5);
        assert_eq!(robot.current_position(), (2, 0));
        assert_eq!(robot.odometer_reading(), 2);
        assert_eq!(robot.battery_level(), 1992.0);
        assert_eq!(robot.stop_reason(), Some(StopReason::Collision));

        // Stopped robots ignore actuation
        robot.rotate(Turn::Right);
        robot.jump();
        assert_eq!(robot.current_direction(), CardinalDirection::East);
        assert_eq!(robot.current_position(), (2, 0));
        assert_eq!(robot.battery_level(), 1992.0);

        robot.reset();
        robot.rotate(Turn::Right);
        robot.move_forward(1);
        assert_eq!(robot.current_position(), (2, 1));
        assert!(!robot.has_stopped());
    }

    #[test]
    fn test_running_out_of_energy() {
        let mut robot = robot(corridor());
        robot.set_battery_level(6.0);
        robot.move_forward(3);
        assert_eq!(robot.current_position(), (1, 0));
        assert_eq!(robot.battery_level(), 2.0);
        assert_eq!(robot.stop_reason(), Some(StopReason::EnergyDepleted));

        let mut robot = self::robot(corridor());
        robot.set_battery_level(5.0);
        robot.rotate(Turn::Around);
        assert_eq!(robot.current_direction(), CardinalDirection::East);
        assert_eq!(robot.battery_level(), 5.0);
        assert_eq!(robot.stop_reason(), Some(StopReason::EnergyDepleted));
    }

    #[test]
    fn test_jump() {
        let mut robot = robot(snake((0, 0)));
        robot.rotate(Turn::Right);
        let battery = robot.battery_level();
        robot.jump();
        assert_eq!(robot.current_position(), (0, 1));
        assert_eq!(robot.battery_level(), battery);
        assert_eq!(robot.odometer_reading(), 1);

        robot.rotate(Turn::Around);
        robot.jump();
        robot.jump();
        assert_eq!(robot.current_position(), (0, 0));
        assert_eq!(robot.stop_reason(), Some(StopReason::IllegalJump));
    }

    #[test]
    fn test_escape_through_exit() {
        let mut robot = robot(corridor());
        robot.move_forward(10);
        assert!(!robot.is_at_exit());
        robot.move_forward(5);
        assert!(robot.is_at_exit());
        assert_eq!(robot.current_position(), (11, 0));
        assert_eq!(robot.odometer_reading(), 12);
        assert_eq!(robot.battery_level(), 1952.0);
        assert_eq!(robot.stop_reason(), Some(StopReason::Escaped));
    }

    #[test]
    fn test_inside_room() {
        let order = StubOrder::new(5, Generator::Dfs, false, Some(3));
        let maze = build_maze(&FactoryConfig::default(), &order, &AtomicBool::new(false)).unwrap();
        let room = maze.floorplan().rooms()[0];
        let maze = Arc::new(maze.with_start((room.x, room.y)).unwrap());
        assert!(robot(maze.clone()).is_inside_room());
        let outside = Arc::new(Maze::clone(&maze).with_start((0, 0)).unwrap());
        assert!(!robot(outside).is_inside_room());
    }

    #[test]
    fn test_turn_towards() {
        use CardinalDirection::*;
        assert_eq!(Turn::towards(North, North), None);
        assert_eq!(Turn::towards(North, West), Some(Turn::Left));
        assert_eq!(Turn::towards(North, East), Some(Turn::Right));
        assert_eq!(Turn::towards(East, West), Some(Turn::Around));
        assert_eq!(Direction::Left.to_cardinal(South), East);
    }
}
