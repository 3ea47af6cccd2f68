use rand::Rng;

use crate::generators::tear_down;
use crate::maze::{CardinalDirection, Coord, Floorplan, Wallboard};

/// Carves a spanning tree with an iterative randomized depth-first search.
///
/// Long corridors with few branch points.
pub fn randomized_dfs<R: Rng>(floorplan: &mut Floorplan, rng: &mut R) {
    let (width, height) = (floorplan.width(), floorplan.height());
    let index = |(x, y): Coord| y as usize * width as usize + x as usize;
    let mut visited = vec![false; floorplan.cell_count()];

    // Initialize the starting point
    let start: Coord = (rng.random_range(0..width), rng.random_range(0..height));
    visited[index(start)] = true;

    // The stack only ever holds visited cells
    let mut stack = vec![start];

    while let Some(cell) = stack.pop() {
        let neighbors = CardinalDirection::ALL
            .into_iter()
            .filter_map(|dir| dir.step(cell, width, height).map(|next| (dir, next)))
            .filter(|&(_, next)| !visited[index(next)])
            .collect::<Vec<_>>();

        if !neighbors.is_empty() {
            let (direction, neighbor) = neighbors[rng.random_range(0..neighbors.len())];
            tear_down(floorplan, Wallboard::new(cell.0, cell.1, direction));
            visited[index(neighbor)] = true;
            // Put the cell back first so we can look at another neighbor of this cell later
            stack.push(cell);
            // Put the neighbor to carve the maze in that neighbor's direction
            stack.push(neighbor);
        }
    }
}
