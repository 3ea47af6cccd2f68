//! Terminal drawing of a maze, one two-column glyph per lattice slot.

use std::fmt;
use std::io::Write;

use crossterm::{
    queue,
    style::{self, Color, Stylize},
};

use crate::maze::{CardinalDirection, Coord, Floorplan, Maze};

/// What is drawn at one position of the `(2w+1)x(2h+1)` lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Wall,
    /// A cell, or a removed wallboard between two cells
    Floor,
    Room,
    Exit,
    Start,
    Robot,
}

impl Glyph {
    /// The width of each glyph when rendered, in character widths.
    pub const WIDTH: u16 = 2;
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Glyph::Wall => "⬜".with(Color::White),
            Glyph::Floor => "  ".with(Color::Reset),
            Glyph::Room => "░░".with(Color::DarkGrey),
            Glyph::Exit => "🟥".with(Color::Red),
            Glyph::Start => "🟩".with(Color::Green),
            Glyph::Robot => "🟡".with(Color::Yellow),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Glyph::WIDTH as usize,
                "Each glyph must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// Cell glyph, with the robot drawn over the start marker.
fn cell_glyph(floorplan: &Floorplan, cell: Coord, start: Coord, robot: Option<Coord>) -> Glyph {
    if robot == Some(cell) {
        Glyph::Robot
    } else if cell == start {
        Glyph::Start
    } else if floorplan.is_in_room(cell.0, cell.1).unwrap_or(false) {
        Glyph::Room
    } else {
        Glyph::Floor
    }
}

/// Glyph for the wallboard on side `direction` of `cell`.
fn wall_glyph(floorplan: &Floorplan, cell: Coord, direction: CardinalDirection) -> Glyph {
    let is_exit = floorplan
        .exit()
        .is_some_and(|exit| exit.cell() == cell && exit.direction == direction);
    if floorplan.blocked(cell, direction) {
        Glyph::Wall
    } else if is_exit {
        Glyph::Exit
    } else {
        Glyph::Floor
    }
}

/// Lays the maze out row by row on the wallboard lattice.
pub fn glyphs(maze: &Maze, robot: Option<Coord>) -> Vec<Vec<Glyph>> {
    let floorplan = maze.floorplan();
    let (width, height) = (floorplan.width(), floorplan.height());
    let start = maze.start_position();
    // Lattice index to the cell on its low side, clamped for the outer ring
    let cell_index = |lattice: u16, size: u16| (lattice / 2).min(size - 1);

    (0..=height * 2)
        .map(|ly| {
            (0..=width * 2)
                .map(|lx| {
                    let (x, y) = (cell_index(lx, width), cell_index(ly, height));
                    match (lx % 2 == 1, ly % 2 == 1) {
                        (true, true) => cell_glyph(floorplan, (x, y), start, robot),
                        // Vertical wallboard: west side of a cell, or east side of the last column
                        (false, true) if lx == width * 2 => {
                            wall_glyph(floorplan, (x, y), CardinalDirection::East)
                        }
                        (false, true) => wall_glyph(floorplan, (x, y), CardinalDirection::West),
                        (true, false) if ly == height * 2 => {
                            wall_glyph(floorplan, (x, y), CardinalDirection::South)
                        }
                        (true, false) => wall_glyph(floorplan, (x, y), CardinalDirection::North),
                        (false, false) => Glyph::Wall,
                    }
                })
                .collect()
        })
        .collect()
}

/// Writes the maze to `out`, marking the start, rooms, exit and optionally the robot.
pub fn draw<W: Write>(out: &mut W, maze: &Maze, robot: Option<Coord>) -> std::io::Result<()> {
    for row in glyphs(maze, robot) {
        for glyph in row {
            queue!(out, style::Print(glyph))?;
        }
        queue!(out, style::Print("\n"))?;
    }
    out.flush()
}
