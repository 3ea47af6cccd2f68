/// A cell coordinate `(x, y)` with `x` growing east and `y` growing south.
pub type Coord = (u16, u16);

/// Absolute compass heading. North points towards `y - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardinalDirection {
    North,
    East,
    South,
    West,
}

impl CardinalDirection {
    /// Every direction, in the order used whenever a fixed preference is needed.
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::North,
        CardinalDirection::East,
        CardinalDirection::South,
        CardinalDirection::West,
    ];

    /// Unit step `(dx, dy)` for this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            CardinalDirection::North => (0, -1),
            CardinalDirection::East => (1, 0),
            CardinalDirection::South => (0, 1),
            CardinalDirection::West => (-1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            CardinalDirection::North => CardinalDirection::South,
            CardinalDirection::East => CardinalDirection::West,
            CardinalDirection::South => CardinalDirection::North,
            CardinalDirection::West => CardinalDirection::East,
        }
    }

    pub fn rotate_clockwise(self) -> Self {
        match self {
            CardinalDirection::North => CardinalDirection::East,
            CardinalDirection::East => CardinalDirection::South,
            CardinalDirection::South => CardinalDirection::West,
            CardinalDirection::West => CardinalDirection::North,
        }
    }

    pub fn rotate_counterclockwise(self) -> Self {
        self.rotate_clockwise().opposite()
    }

    /// The neighbor of `coord` in this direction, if it lies inside a `width`x`height` grid.
    pub fn step(self, coord: Coord, width: u16, height: u16) -> Option<Coord> {
        let (x, y) = coord;
        // Wrapping keeps underflow out of range, saturating keeps overflow out of range,
        // since valid indices never reach u16::MAX.
        let next = match self {
            CardinalDirection::North => (x, y.wrapping_sub(1)),
            CardinalDirection::East => (x.saturating_add(1), y),
            CardinalDirection::South => (x, y.saturating_add(1)),
            CardinalDirection::West => (x.wrapping_sub(1), y),
        };
        (next.0 < width && next.1 < height).then_some(next)
    }

    /// Direction that leads from `from` to the adjacent cell `to`, if they are adjacent.
    pub fn between(from: Coord, to: Coord) -> Option<Self> {
        CardinalDirection::ALL.into_iter().find(|dir| {
            let (dx, dy) = dir.delta();
            from.0 as i32 + dx == to.0 as i32 && from.1 as i32 + dy == to.1 as i32
        })
    }
}

/// The structural edge on one side of a cell.
///
/// The same physical wall can be named from either of the two cells it separates;
/// [`Wallboard::normalized`] picks a canonical name for comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wallboard {
    pub x: u16,
    pub y: u16,
    pub direction: CardinalDirection,
}

impl Wallboard {
    pub fn new(x: u16, y: u16, direction: CardinalDirection) -> Self {
        Wallboard { x, y, direction }
    }

    pub fn cell(&self) -> Coord {
        (self.x, self.y)
    }

    /// The cell on the other side, or `None` for an exterior border wallboard.
    pub fn neighbor(&self, width: u16, height: u16) -> Option<Coord> {
        self.direction.step(self.cell(), width, height)
    }

    /// Names internal wallboards from the west or north side so both spellings compare equal.
    pub fn normalized(&self) -> Self {
        match self.direction {
            CardinalDirection::West if self.x > 0 => {
                Wallboard::new(self.x - 1, self.y, CardinalDirection::East)
            }
            CardinalDirection::North if self.y > 0 => {
                Wallboard::new(self.x, self.y - 1, CardinalDirection::South)
            }
            _ => *self,
        }
    }
}

/// State of one position in the slot lattice.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// A maze cell (odd lattice coordinates).
    Cell,
    /// A standing wallboard, interior or on the border.
    #[default]
    Wall,
    /// A removed wallboard. On the border this is the exit.
    Open,
}
