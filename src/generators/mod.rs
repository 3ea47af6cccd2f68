use rand::{Rng, SeedableRng, rngs::StdRng};

mod dfs;
mod kruskal;
mod prim;
mod rooms;

pub use dfs::randomized_dfs;
pub use kruskal::{UnionFind, randomized_kruskal};
pub use prim::randomized_prim;
pub use rooms::carve_rooms;

use crate::distance::{UNREACHABLE, flood_from};
use crate::error::{ConfigError, MazeError};
use crate::maze::{Floorplan, Wallboard};

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Spanning tree construction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generator {
    Dfs,
    Prim,
    Kruskal,
}

impl Generator {
    pub const ALL: [Generator; 3] = [Generator::Dfs, Generator::Prim, Generator::Kruskal];
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::Dfs => write!(f, "Randomized Depth-First Search (DFS)"),
            Generator::Prim => write!(f, "Prim's Algorithm"),
            Generator::Kruskal => write!(f, "Kruskal's Algorithm"),
        }
    }
}

impl std::str::FromStr for Generator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dfs" => Ok(Generator::Dfs),
            "prim" => Ok(Generator::Prim),
            "kruskal" => Ok(Generator::Kruskal),
            _ => Err(ConfigError::UnknownGenerator(s.to_string())),
        }
    }
}

/// Builds a `width`x`height` floorplan whose open wallboards form a spanning tree.
///
/// The same generator and the same seeded `rng` state always yield the same floorplan.
pub fn generate_floorplan<R: Rng>(
    width: u16,
    height: u16,
    generator: Generator,
    rng: &mut R,
) -> Result<Floorplan, MazeError> {
    let mut floorplan = Floorplan::new(width, height)?;
    match generator {
        Generator::Dfs => randomized_dfs(&mut floorplan, rng),
        Generator::Prim => randomized_prim(&mut floorplan, rng),
        Generator::Kruskal => {
            randomized_kruskal(&mut floorplan, rng);
        }
    }
    tracing::debug!(
        "[generator] {} opened {} wallboards in a {}x{} floorplan",
        generator,
        floorplan.open_internal_wallboards(),
        width,
        height
    );
    Ok(floorplan)
}

/// Opens the exit on the border cell farthest from a random cell.
///
/// Ties go to the first border cell in row-major order.
pub fn place_exit<R: Rng>(floorplan: &mut Floorplan, rng: &mut R) -> Result<Wallboard, MazeError> {
    let (width, height) = (floorplan.width(), floorplan.height());
    let origin = (rng.random_range(0..width), rng.random_range(0..height));
    let distances = flood_from(floorplan, origin);

    let mut best: Option<((u16, u16), u32)> = None;
    for y in 0..height {
        for x in 0..width {
            let on_border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
            let distance = distances[y as usize * width as usize + x as usize];
            if !on_border || distance == UNREACHABLE {
                continue;
            }
            if best.is_none_or(|(_, d)| distance > d) {
                best = Some(((x, y), distance));
            }
        }
    }

    let ((x, y), _) = best.ok_or(MazeError::Disconnected {
        unreachable: floorplan.cell_count(),
    })?;
    let direction = floorplan.set_exit_position(x, y)?;
    Ok(Wallboard::new(x, y, direction))
}

/// Removes `wallboard` if that is legal, silently skipping it otherwise.
fn tear_down(floorplan: &mut Floorplan, wallboard: Wallboard) -> bool {
    floorplan.can_tear_down(&wallboard) && floorplan.delete_wallboard(wallboard).is_ok()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::distance::DistanceField;
    use crate::maze::CardinalDirection;

    /// Asserts the open internal wallboards of `floorplan` form a spanning tree.
    pub(crate) fn assert_spanning_tree(floorplan: &Floorplan) {
        assert_eq!(
            floorplan.open_internal_wallboards(),
            floorplan.cell_count() - 1,
            "a spanning tree opens exactly one wallboard less than there are cells"
        );
        let distances = flood_from(floorplan, (0, 0));
        assert!(
            distances.iter().all(|&d| d != UNREACHABLE),
            "every cell must be reachable"
        );
    }

    fn border_openings(floorplan: &Floorplan) -> usize {
        let (width, height) = (floorplan.width(), floorplan.height());
        (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| {
                CardinalDirection::ALL
                    .into_iter()
                    .filter(|&dir| {
                        floorplan.is_border(x, y, dir).unwrap()
                            && !floorplan.has_wall(x, y, dir).unwrap()
                    })
                    .count()
            })
            .sum()
    }

    #[test]
    fn test_every_generator_builds_spanning_trees() {
        for generator in Generator::ALL {
            for (width, height) in [(1, 1), (1, 7), (6, 1), (4, 4), (12, 12), (15, 20)] {
                for seed in [0, 13, 56] {
                    let floorplan =
                        generate_floorplan(width, height, generator, &mut get_rng(Some(seed)))
                            .unwrap();
                    assert_spanning_tree(&floorplan);
                    assert_eq!(floorplan.exit(), None);
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_floorplan() {
        for generator in Generator::ALL {
            let first = generate_floorplan(12, 12, generator, &mut get_rng(Some(7))).unwrap();
            let second = generate_floorplan(12, 12, generator, &mut get_rng(Some(7))).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        for generator in Generator::ALL {
            let first = generate_floorplan(12, 12, generator, &mut get_rng(Some(10))).unwrap();
            let second = generate_floorplan(12, 12, generator, &mut get_rng(Some(20))).unwrap();
            assert_ne!(first, second, "{generator} ignored the seed");
        }
    }

    #[test]
    fn test_invalid_dimensions_are_rejected() {
        assert!(matches!(
            generate_floorplan(0, 3, Generator::Prim, &mut get_rng(Some(1))),
            Err(MazeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_place_exit_opens_one_border_wallboard() {
        for generator in Generator::ALL {
            let mut rng = get_rng(Some(3));
            let mut floorplan = generate_floorplan(9, 6, generator, &mut rng).unwrap();
            let exit = place_exit(&mut floorplan, &mut rng).unwrap();
            assert_eq!(floorplan.exit(), Some(exit));
            assert_eq!(border_openings(&floorplan), 1);
            assert!(exit.neighbor(9, 6).is_none());
            let field = DistanceField::compute(&floorplan).unwrap();
            assert_eq!(field.get(exit.x, exit.y), Ok(0));
        }
    }

    #[test]
    fn test_generator_parsing() {
        assert_eq!("Kruskal".parse::<Generator>(), Ok(Generator::Kruskal));
        assert_eq!("dfs".parse::<Generator>(), Ok(Generator::Dfs));
        assert!("eller".parse::<Generator>().is_err());
    }
}
