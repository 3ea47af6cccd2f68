use rand::Rng;

use crate::generators::tear_down;
use crate::maze::{CardinalDirection, Coord, Floorplan, Wallboard};

/// A candidate passage from an already visited cell towards `to`.
#[derive(Debug, Clone, Copy)]
struct FrontierEdge {
    from: Coord,
    direction: CardinalDirection,
    to: Coord,
}

/// Carves a spanning tree with randomized Prim's algorithm.
///
/// Frontier entries are drawn with `rng` and removed by swapping, which keeps each
/// draw O(1) and the whole run reproducible per seed. Produces many short branches.
pub fn randomized_prim<R: Rng>(floorplan: &mut Floorplan, rng: &mut R) {
    let (width, height) = (floorplan.width(), floorplan.height());
    let index = |(x, y): Coord| y as usize * width as usize + x as usize;
    let mut visited = vec![false; floorplan.cell_count()];

    let frontier_of = |cell: Coord, visited: &[bool]| {
        CardinalDirection::ALL
            .into_iter()
            .filter_map(move |direction| {
                direction
                    .step(cell, width, height)
                    .map(|to| FrontierEdge {
                        from: cell,
                        direction,
                        to,
                    })
            })
            .filter(|edge| !visited[index(edge.to)])
            .collect::<Vec<_>>()
    };

    // Initialize the starting point
    let start: Coord = (rng.random_range(0..width), rng.random_range(0..height));
    visited[index(start)] = true;
    let mut frontiers = frontier_of(start, &visited);

    while !frontiers.is_empty() {
        // Randomly select an edge from the frontier
        let idx = rng.random_range(0..frontiers.len());
        let edge = frontiers.swap_remove(idx);
        if visited[index(edge.to)] {
            // Both ends are in the tree already, opening it would close a cycle
            continue;
        }

        tear_down(
            floorplan,
            Wallboard::new(edge.from.0, edge.from.1, edge.direction),
        );
        visited[index(edge.to)] = true;
        frontiers.extend(frontier_of(edge.to, &visited));
    }
}
