use rand::{Rng, seq::SliceRandom};

use crate::generators::tear_down;
use crate::maze::{CardinalDirection, Floorplan, Wallboard};

/// Disjoint sets over cell indices, stored as a flat parent array.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
    sets: usize,
}

impl UnionFind {
    /// Every element starts as its own singleton set.
    pub fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
            sets: size,
        }
    }

    /// Representative of the set containing `x`, compressing the path behind it.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merges the sets of `x` and `y`. Returns `false` if they were already joined.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return false; // Already in same set
        }

        match self.rank[root_x].cmp(&self.rank[root_y]) {
            std::cmp::Ordering::Greater => {
                self.parent[root_y] = root_x;
            }
            std::cmp::Ordering::Less => {
                self.parent[root_x] = root_y;
            }
            std::cmp::Ordering::Equal => {
                self.parent[root_y] = root_x;
                self.rank[root_x] += 1;
            }
        }
        self.sets -= 1;
        true
    }

    /// Number of disjoint sets left.
    pub fn set_count(&self) -> usize {
        self.sets
    }
}

/// Carves a spanning tree with randomized Kruskal's algorithm and returns the
/// final disjoint sets, which hold a single set once every edge is consumed.
pub fn randomized_kruskal<R: Rng>(floorplan: &mut Floorplan, rng: &mut R) -> UnionFind {
    let (width, height) = (floorplan.width(), floorplan.height());
    let mut uf = UnionFind::new(floorplan.cell_count());

    // Each internal wallboard once: east of every cell but the last column,
    // south of every cell but the last row
    let mut edges: Vec<Wallboard> = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .flat_map(|(x, y)| {
            [
                (x + 1 < width).then(|| Wallboard::new(x, y, CardinalDirection::East)),
                (y + 1 < height).then(|| Wallboard::new(x, y, CardinalDirection::South)),
            ]
        })
        .flatten()
        .collect();

    // Shuffle edges randomly
    edges.shuffle(rng);

    for edge in edges {
        let Some((nx, ny)) = edge.neighbor(width, height) else {
            continue;
        };
        let idx1 = edge.y as usize * width as usize + edge.x as usize;
        let idx2 = ny as usize * width as usize + nx as usize;

        // Edges inside one set would close a cycle
        if uf.find(idx1) != uf.find(idx2) && tear_down(floorplan, edge) {
            uf.union(idx1, idx2);
        }
    }
    uf
}
