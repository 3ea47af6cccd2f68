//! Tunables for maze building, robots and drivers.

use crate::error::ConfigError;

/// Maps skill levels to maze dimensions and the number of rooms to carve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillTable {
    widths: Vec<u16>,
    heights: Vec<u16>,
    rooms: Vec<usize>,
}

impl Default for SkillTable {
    fn default() -> Self {
        Self {
            widths: vec![
                4, 12, 15, 20, 25, 25, 35, 35, 40, 60, 70, 80, 90, 110, 150, 300,
            ],
            heights: vec![
                4, 12, 15, 15, 20, 25, 25, 35, 40, 60, 70, 75, 75, 90, 120, 250,
            ],
            rooms: vec![0, 2, 2, 3, 4, 5, 10, 10, 20, 25, 25, 30, 30, 30, 40, 50],
        }
    }
}

impl SkillTable {
    /// Builds a table from `(width, height, rooms)` rows indexed by skill level.
    pub fn new(levels: &[(u16, u16, usize)]) -> Self {
        Self {
            widths: levels.iter().map(|level| level.0).collect(),
            heights: levels.iter().map(|level| level.1).collect(),
            rooms: levels.iter().map(|level| level.2).collect(),
        }
    }

    /// Highest skill level in the table.
    pub fn max_level(&self) -> u8 {
        self.widths.len().saturating_sub(1).min(u8::MAX as usize) as u8
    }

    fn check(&self, level: u8) -> Result<usize, ConfigError> {
        let index = level as usize;
        if index < self.widths.len() {
            Ok(index)
        } else {
            Err(ConfigError::UnknownSkillLevel {
                level,
                max: self.max_level(),
            })
        }
    }

    /// Maze `(width, height)` for a skill level.
    pub fn dimensions(&self, level: u8) -> Result<(u16, u16), ConfigError> {
        let index = self.check(level)?;
        Ok((self.widths[index], self.heights[index]))
    }

    /// Number of rooms a non-perfect maze at this skill level asks for.
    pub fn rooms(&self, level: u8) -> Result<usize, ConfigError> {
        let index = self.check(level)?;
        Ok(self.rooms[index])
    }
}

/// Settings for the maze building pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryConfig {
    pub skill_table: SkillTable,
    /// Random placement draws allowed per requested room
    pub room_attempts_per_room: usize,
    /// Largest room side length
    pub max_room_size: u16,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            skill_table: SkillTable::default(),
            room_attempts_per_room: 8,
            max_room_size: 6,
        }
    }
}

/// Energy model of a robot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotConfig {
    pub initial_battery: f32,
    /// Cost of a 360 degree rotation. A quarter turn costs a quarter of it.
    pub full_rotation_energy: f32,
    pub step_energy: f32,
    pub sensing_energy: f32,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            initial_battery: 2000.0,
            full_rotation_energy: 12.0,
            step_energy: 4.0,
            sensing_energy: 1.0,
        }
    }
}

/// Settings shared by robot drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// A wall follower gives up once the cells it drove exceed this many times the cell count
    pub loop_cutoff_factor: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            loop_cutoff_factor: 2,
        }
    }
}
