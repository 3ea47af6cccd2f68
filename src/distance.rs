//! Breadth-first distance field measured from the exit.

use std::collections::VecDeque;

use crate::error::MazeError;
use crate::maze::{Coord, Floorplan, Wallboard};

/// Marker for cells the flood fill never reached.
pub const UNREACHABLE: u32 = u32::MAX;

/// Breadth-first hop counts from `origin` through open wallboards, in row-major order.
///
/// Cells that cannot be reached keep [`UNREACHABLE`].
pub fn flood_from(floorplan: &Floorplan, origin: Coord) -> Vec<u32> {
    let width = floorplan.width() as usize;
    let mut distances = vec![UNREACHABLE; floorplan.cell_count()];
    if !floorplan.is_in_bounds(origin) {
        return distances;
    }

    let index = |(x, y): Coord| y as usize * width + x as usize;
    distances[index(origin)] = 0;
    let mut queue = VecDeque::from([origin]);

    while let Some(current) = queue.pop_front() {
        let next_distance = distances[index(current)] + 1;
        for (_, neighbor) in floorplan.open_neighbors(current) {
            let slot = &mut distances[index(neighbor)];
            if *slot == UNREACHABLE {
                *slot = next_distance;
                queue.push_back(neighbor);
            }
        }
    }
    distances
}

/// Minimum number of passages between every cell and the exit cell.
///
/// The exit cell itself has distance 0, so a cell at distance `d` is exactly `d`
/// forward steps away from standing on the exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceField {
    width: u16,
    height: u16,
    exit: Coord,
    distances: Box<[u32]>,
}

impl DistanceField {
    /// Flood-fills the floorplan from its exit cell.
    ///
    /// Fails when the floorplan has no exit or when any cell cannot reach it.
    pub fn compute(floorplan: &Floorplan) -> Result<Self, MazeError> {
        let exit = floorplan
            .exit()
            .map(|exit: Wallboard| exit.cell())
            .ok_or(MazeError::NoExit)?;
        let distances = flood_from(floorplan, exit);
        let unreachable = distances.iter().filter(|&&d| d == UNREACHABLE).count();
        if unreachable > 0 {
            return Err(MazeError::Disconnected { unreachable });
        }
        tracing::trace!(
            "[distance] computed field for {}x{} maze, exit at {:?}",
            floorplan.width(),
            floorplan.height(),
            exit
        );
        Ok(DistanceField {
            width: floorplan.width(),
            height: floorplan.height(),
            exit,
            distances: distances.into_boxed_slice(),
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn exit(&self) -> Coord {
        self.exit
    }

    pub fn get(&self, x: u16, y: u16) -> Result<u32, MazeError> {
        if x >= self.width || y >= self.height {
            return Err(MazeError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.distances[y as usize * self.width as usize + x as usize])
    }

    /// The cell farthest from the exit. Ties go to the first cell in row-major order.
    pub fn max_distance_cell(&self) -> Coord {
        let (index, _) = self
            .distances
            .iter()
            .enumerate()
            .fold((0, 0), |best, (i, &d)| if d > best.1 { (i, d) } else { best });
        let width = self.width as usize;
        ((index % width) as u16, (index / width) as u16)
    }

    /// All distances in row-major order.
    pub fn all_distance_values(&self) -> &[u32] {
        &self.distances
    }
}
