use crate::error::MazeError;

use super::grid::Grid;
use super::wall::{CardinalDirection, Coord, Slot, Wallboard};

/// Largest width or height a floorplan accepts.
pub const MAX_DIMENSION: u16 = 2048;

/// Axis-aligned block of cells with all interior wallboards removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Room {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Room {
    pub const MIN_SIZE: u16 = 2;

    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Room {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.0 >= self.x
            && coord.0 < self.x + self.width
            && coord.1 >= self.y
            && coord.1 < self.y + self.height
    }

    pub fn overlaps(&self, x: u16, y: u16, width: u16, height: u16) -> bool {
        x < self.x + self.width
            && self.x < x.saturating_add(width)
            && y < self.y + self.height
            && self.y < y.saturating_add(height)
    }
}

/// Wall layout of a `width`x`height` maze.
///
/// Internally this is a `(2w+1)x(2h+1)` lattice: cells sit at odd coordinates and every
/// wallboard, interior or exterior, owns exactly one slot between them. Querying a wall
/// from either adjacent cell reads the same slot, so wall state is always symmetric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Floorplan {
    grid: Grid<Slot>,
    width: u16,
    height: u16,
    exit: Option<Wallboard>,
    rooms: Vec<Room>,
}

impl Floorplan {
    /// Creates a floorplan with every wallboard present and no exit.
    pub fn new(width: u16, height: u16) -> Result<Self, MazeError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(MazeError::InvalidDimensions {
                width,
                height,
                max: MAX_DIMENSION,
            });
        }
        let mut grid = Grid::new(width * 2 + 1, height * 2 + 1, Slot::Wall);
        (0..height).for_each(|y| {
            (0..width).for_each(|x| grid[(x * 2 + 1, y * 2 + 1)] = Slot::Cell);
        });
        Ok(Floorplan {
            grid,
            width,
            height,
            exit: None,
            rooms: Vec::new(),
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.width && coord.1 < self.height
    }

    fn check_bounds(&self, x: u16, y: u16) -> Result<(), MazeError> {
        if self.is_in_bounds((x, y)) {
            Ok(())
        } else {
            Err(MazeError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Lattice coordinate of the wallboard on side `direction` of an in-bounds cell.
    fn slot_of(coord: Coord, direction: CardinalDirection) -> (u16, u16) {
        let (cx, cy) = (coord.0 * 2 + 1, coord.1 * 2 + 1);
        match direction {
            CardinalDirection::North => (cx, cy - 1),
            CardinalDirection::East => (cx + 1, cy),
            CardinalDirection::South => (cx, cy + 1),
            CardinalDirection::West => (cx - 1, cy),
        }
    }

    /// Wall check without bounds validation, for callers iterating known-good cells.
    pub(crate) fn blocked(&self, coord: Coord, direction: CardinalDirection) -> bool {
        self.grid[Self::slot_of(coord, direction)] == Slot::Wall
    }

    /// Whether a wallboard stands on side `direction` of cell `(x, y)`.
    pub fn has_wall(&self, x: u16, y: u16, direction: CardinalDirection) -> Result<bool, MazeError> {
        self.check_bounds(x, y)?;
        Ok(self.blocked((x, y), direction))
    }

    /// Whether side `direction` of `(x, y)` is part of the exterior border.
    pub fn is_border(&self, x: u16, y: u16, direction: CardinalDirection) -> Result<bool, MazeError> {
        self.check_bounds(x, y)?;
        let (sx, sy) = Self::slot_of((x, y), direction);
        Ok(self.grid.is_boundary(sx, sy))
    }

    /// Reports whether removing `wallboard` is structurally legal.
    ///
    /// Out-of-range cells and already-open wallboards are never legal. A border
    /// wallboard is only legal while the maze has no exit yet.
    pub fn can_tear_down(&self, wallboard: &Wallboard) -> bool {
        if !self.is_in_bounds(wallboard.cell()) {
            return false;
        }
        let slot = Self::slot_of(wallboard.cell(), wallboard.direction);
        if self.grid[slot] != Slot::Wall {
            return false;
        }
        !self.grid.is_boundary(slot.0, slot.1) || self.exit.is_none()
    }

    /// Removes a wallboard. Removing a border wallboard makes it the exit.
    pub fn delete_wallboard(&mut self, wallboard: Wallboard) -> Result<(), MazeError> {
        let Wallboard { x, y, direction } = wallboard;
        self.check_bounds(x, y)?;
        let slot = Self::slot_of((x, y), direction);
        if self.grid[slot] != Slot::Wall {
            return Err(MazeError::WallAbsent { x, y, direction });
        }
        if self.grid.is_boundary(slot.0, slot.1) {
            if self.exit.is_some() {
                return Err(MazeError::ProtectedBorder { x, y, direction });
            }
            self.exit = Some(wallboard);
        }
        self.grid[slot] = Slot::Open;
        Ok(())
    }

    /// Opens the border of `(x, y)` as the single exit.
    ///
    /// Corner cells face the first border side in north, east, south, west order.
    pub fn set_exit_position(&mut self, x: u16, y: u16) -> Result<CardinalDirection, MazeError> {
        self.check_bounds(x, y)?;
        if let Some(exit) = self.exit {
            return Err(MazeError::ExitAlreadySet {
                x: exit.x,
                y: exit.y,
            });
        }
        let direction = CardinalDirection::ALL
            .into_iter()
            .find(|dir| dir.step((x, y), self.width, self.height).is_none())
            .ok_or(MazeError::NotOnBorder { x, y })?;
        self.delete_wallboard(Wallboard::new(x, y, direction))?;
        Ok(direction)
    }

    /// The open border wallboard, if an exit has been placed.
    pub fn exit(&self) -> Option<Wallboard> {
        self.exit
    }

    pub fn exit_position(&self) -> Option<Coord> {
        self.exit.map(|exit| exit.cell())
    }

    pub fn is_exit_position(&self, x: u16, y: u16) -> Result<bool, MazeError> {
        self.check_bounds(x, y)?;
        Ok(self.exit_position() == Some((x, y)))
    }

    pub fn is_in_room(&self, x: u16, y: u16) -> Result<bool, MazeError> {
        self.check_bounds(x, y)?;
        Ok(self.rooms.iter().any(|room| room.contains((x, y))))
    }

    /// Whether the rectangle at `(x, y)` sized `width`x`height` intersects any room.
    ///
    /// Both its first and its last cell must lie inside the maze.
    pub fn area_overlaps_with_room(
        &self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<bool, MazeError> {
        self.check_bounds(x, y)?;
        if width > 0 && height > 0 {
            self.check_bounds(x.saturating_add(width - 1), y.saturating_add(height - 1))?;
        }
        Ok(self
            .rooms
            .iter()
            .any(|room| room.overlaps(x, y, width, height)))
    }

    /// Clears every wallboard inside `room` and records its cells as room members.
    ///
    /// Rooms must be at least 2x2, keep one cell of distance from the outer border and
    /// must not overlap an existing room.
    pub fn add_room(&mut self, room: Room) -> Result<(), MazeError> {
        let reject = |reason| MazeError::RoomRejected {
            x: room.x,
            y: room.y,
            width: room.width,
            height: room.height,
            reason,
        };
        if room.width < Room::MIN_SIZE || room.height < Room::MIN_SIZE {
            return Err(reject("smaller than 2x2"));
        }
        let fits_inside = room.x >= 1
            && room.y >= 1
            && (room.x as u32 + room.width as u32) < (self.width as u32)
            && (room.y as u32 + room.height as u32) < (self.height as u32);
        if !fits_inside {
            return Err(reject("touches the outer border"));
        }
        if self.area_overlaps_with_room(room.x, room.y, room.width, room.height)? {
            return Err(reject("overlaps another room"));
        }

        for y in room.y..room.y + room.height {
            for x in room.x..room.x + room.width {
                if room.contains((x + 1, y)) {
                    self.grid[Self::slot_of((x, y), CardinalDirection::East)] = Slot::Open;
                }
                if room.contains((x, y + 1)) {
                    self.grid[Self::slot_of((x, y), CardinalDirection::South)] = Slot::Open;
                }
            }
        }
        self.rooms.push(room);
        Ok(())
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Number of removed wallboards between two cells (the exit is not counted).
    pub fn open_internal_wallboards(&self) -> usize {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .map(|cell| {
                [CardinalDirection::East, CardinalDirection::South]
                    .into_iter()
                    .filter(|&dir| {
                        dir.step(cell, self.width, self.height).is_some()
                            && !self.blocked(cell, dir)
                    })
                    .count()
            })
            .sum()
    }

    /// In-bounds neighbors of `coord` reachable without crossing a wallboard.
    pub fn open_neighbors(&self, coord: Coord) -> impl Iterator<Item = (CardinalDirection, Coord)> + '_ {
        CardinalDirection::ALL.into_iter().filter_map(move |dir| {
            let next = dir.step(coord, self.width, self.height)?;
            (!self.blocked(coord, dir)).then_some((dir, next))
        })
    }
}
