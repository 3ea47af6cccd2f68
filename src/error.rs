//! Error types shared across the crate.

use thiserror::Error;

use crate::maze::CardinalDirection;
use crate::robot::StopReason;

/// Structural and configuration errors raised by the floorplan and maze model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("invalid maze dimensions {width}x{height}: both must be between 1 and {max}")]
    InvalidDimensions { width: u16, height: u16, max: u16 },

    #[error("cell ({x}, {y}) is outside the {width}x{height} maze")]
    OutOfRange {
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    },

    #[error("no wallboard to remove at ({x}, {y}) facing {direction:?}")]
    WallAbsent {
        x: u16,
        y: u16,
        direction: CardinalDirection,
    },

    #[error("border wallboard at ({x}, {y}) facing {direction:?} is protected")]
    ProtectedBorder {
        x: u16,
        y: u16,
        direction: CardinalDirection,
    },

    #[error("cell ({x}, {y}) does not touch the outer border")]
    NotOnBorder { x: u16, y: u16 },

    #[error("the maze already has an exit at ({x}, {y})")]
    ExitAlreadySet { x: u16, y: u16 },

    #[error("the maze has no exit")]
    NoExit,

    #[error("room at ({x}, {y}) sized {width}x{height} was rejected: {reason}")]
    RoomRejected {
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        reason: &'static str,
    },

    #[error("{unreachable} cells cannot reach the exit")]
    Disconnected { unreachable: usize },
}

/// Errors coming from configuration lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown skill level {level}, expected 0..={max}")]
    UnknownSkillLevel { level: u8, max: u8 },

    #[error("unknown maze generator '{0}', expected dfs, prim or kruskal")]
    UnknownGenerator(String),
}

/// Failures of a distance sensing operation.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SensorError {
    /// No sensor is mounted in that direction, or the sensor does not support the request.
    #[error("operation not supported by the sensor")]
    Unsupported,

    /// The sensor works but the battery cannot pay for the reading.
    #[error("not enough power to sense: {available} available, {required} required")]
    PowerFailure { available: f32, required: f32 },

    /// The sensor is mounted but currently out of order.
    #[error("sensor is not operational")]
    Fault,
}

/// Reasons a robot driver gives up before reaching the exit.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DriverError {
    #[error("robot ran out of energy with {remaining} left")]
    OutOfEnergy { remaining: f32 },

    #[error("robot stopped: {0:?}")]
    RobotStopped(StopReason),

    #[error("no neighbor is closer to the exit than ({x}, {y})")]
    NoWayForward { x: u16, y: u16 },

    #[error(transparent)]
    Sensor(#[from] SensorError),
}

/// Errors raised while ordering or building a maze.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FactoryError {
    #[error("the factory is already working on an order")]
    Busy,

    #[error("no order has been placed")]
    NothingOrdered,

    #[error("the order was cancelled")]
    Cancelled,

    #[error("the maze building thread panicked")]
    WorkerPanicked,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Maze(#[from] MazeError),
}
