//! Immutable board graph with direction-consistent adjacency
//!
//! The Macanan board is a 5x5 grid with alternating diagonals plus a
//! six-node triangle hanging off the middle of the left and right edges.
//! Node coordinates are only used to infer straight-line directions, so a
//! ray that walks `direction_to` repeatedly always follows a true line.
//!
//! # Example
//!
//! ```
//! use macanan::board::{graph, Direction};
//!
//! let g = graph();
//! // Walking west from the left edge of the grid enters the triangle
//! assert_eq!(g.direction_to(10, Direction::West), Some(26));
//! assert_eq!(g.direction_to(26, Direction::West), Some(29));
//! assert_eq!(g.direction_to(29, Direction::West), None);
//! ```

use std::sync::OnceLock;

use super::{Node, NODE_COUNT};

/// Screen-space coordinates of every node (x grows right, y grows down)
pub const NODE_POSITIONS: [(i32, i32); NODE_COUNT] = [
    (150, 50), (250, 50), (350, 50), (450, 50), (550, 50),
    (150, 150), (250, 150), (350, 150), (450, 150), (550, 150),
    (150, 250), (250, 250), (350, 250), (450, 250), (550, 250),
    (150, 350), (250, 350), (350, 350), (450, 350), (550, 350),
    (150, 450), (250, 450), (350, 450), (450, 450), (550, 450),
    // Left triangle
    (75, 200), (75, 250), (75, 300), (0, 150), (0, 250), (0, 350),
    // Right triangle
    (625, 200), (625, 250), (625, 300), (700, 150), (700, 250), (700, 350),
];

/// Undirected edges of the board
pub const EDGES: [(Node, Node); 76] = [
    // Grid rows
    (0, 1), (1, 2), (2, 3), (3, 4),
    (5, 6), (6, 7), (7, 8), (8, 9),
    (10, 11), (11, 12), (12, 13), (13, 14),
    (15, 16), (16, 17), (17, 18), (18, 19),
    (20, 21), (21, 22), (22, 23), (23, 24),
    // Grid columns
    (0, 5), (5, 10), (10, 15), (15, 20),
    (1, 6), (6, 11), (11, 16), (16, 21),
    (2, 7), (7, 12), (12, 17), (17, 22),
    (3, 8), (8, 13), (13, 18), (18, 23),
    (4, 9), (9, 14), (14, 19), (19, 24),
    // Diagonals
    (0, 6), (6, 12), (12, 18), (18, 24),
    (16, 20), (12, 16), (8, 12), (4, 8),
    (2, 6), (2, 8), (6, 10), (8, 14),
    (10, 16), (14, 18), (16, 22), (18, 22),
    // Left triangle
    (10, 25), (10, 26), (10, 27), (25, 28), (26, 29),
    (27, 30), (25, 26), (26, 27), (28, 29), (29, 30),
    // Right triangle
    (14, 31), (14, 32), (14, 33), (31, 34), (32, 35),
    (33, 36), (31, 32), (32, 33), (34, 35), (35, 36),
];

/// Hand-coded neighbours for corners where geometry finds nothing.
/// Only consulted after both geometric deltas fail.
const DIRECTION_OVERRIDES: [(Node, Direction, Node); 3] = [
    (1, Direction::West, 0),
    (5, Direction::North, 0),
    (6, Direction::NorthWest, 0),
];

/// Grid spacing between neighbouring nodes
const PRIMARY_STEP: i32 = 100;
/// Horizontal spacing inside the triangles
const FALLBACK_STEP_X: i32 = 75;
/// Vertical spacing inside the triangles
const FALLBACK_STEP_Y: i32 = 50;

/// The 8 straight-line directions, in fixed scan order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    West,
    South,
    North,
    SouthEast,
    NorthWest,
    SouthWest,
    NorthEast,
}

impl Direction {
    /// All directions in scan order
    pub const ALL: [Direction; 8] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
        Direction::SouthEast,
        Direction::NorthWest,
        Direction::SouthWest,
        Direction::NorthEast,
    ];

    /// Unit step (dx, dy) in screen space
    #[inline]
    pub fn unit(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::South => (0, 1),
            Direction::North => (0, -1),
            Direction::SouthEast => (1, 1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthWest => (-1, 1),
            Direction::NorthEast => (1, -1),
        }
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::South => Direction::North,
            Direction::North => Direction::South,
            Direction::SouthEast => Direction::NorthWest,
            Direction::NorthWest => Direction::SouthEast,
            Direction::SouthWest => Direction::NorthEast,
            Direction::NorthEast => Direction::SouthWest,
        }
    }

    /// Position in `Direction::ALL`
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Adjacency plus precomputed directional neighbours.
///
/// Built once and never mutated. Use [`graph`] for the shared instance.
#[derive(Debug)]
pub struct BoardGraph {
    adjacency: Vec<Vec<Node>>,
    rays: [[Option<Node>; 8]; NODE_COUNT],
}

impl BoardGraph {
    /// Build the graph from `NODE_POSITIONS` and `EDGES`
    pub fn new() -> Self {
        let mut adjacency = vec![Vec::new(); NODE_COUNT];
        for &(a, b) in EDGES.iter() {
            if !adjacency[a].contains(&b) {
                adjacency[a].push(b);
            }
            if !adjacency[b].contains(&a) {
                adjacency[b].push(a);
            }
        }

        let mut rays = [[None; 8]; NODE_COUNT];
        for (node, slots) in rays.iter_mut().enumerate() {
            for dir in Direction::ALL {
                slots[dir.index()] = resolve_direction(&adjacency[node], node, dir);
            }
        }

        Self { adjacency, rays }
    }

    /// Neighbours of a node (empty for out-of-range ids)
    #[inline]
    pub fn neighbors(&self, node: Node) -> &[Node] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn are_adjacent(&self, a: Node, b: Node) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Neighbour of `node` lying in direction `dir`, or `None` when the ray ends
    #[inline]
    pub fn direction_to(&self, node: Node, dir: Direction) -> Option<Node> {
        self.rays.get(node).and_then(|slots| slots[dir.index()])
    }

    /// Nodes visited when walking from `from` (exclusive) in a straight line
    pub fn ray(&self, from: Node, dir: Direction) -> impl Iterator<Item = Node> + '_ {
        std::iter::successors(self.direction_to(from, dir), move |&n| {
            self.direction_to(n, dir)
        })
    }

    /// Coordinates of a node
    #[inline]
    pub fn position(&self, node: Node) -> (i32, i32) {
        NODE_POSITIONS[node]
    }

    /// Every edge once, as (a, b) with a < b
    pub fn edges(&self) -> impl Iterator<Item = (Node, Node)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(a, ns)| ns.iter().filter(move |&&b| a < b).map(move |&b| (a, b)))
    }
}

impl Default for BoardGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Match a neighbour by the primary delta, then the triangle delta,
/// then the override table.
fn resolve_direction(neighbors: &[Node], node: Node, dir: Direction) -> Option<Node> {
    let (ux, uy) = dir.unit();
    let (x, y) = NODE_POSITIONS[node];

    let find = |dx: i32, dy: i32| {
        neighbors
            .iter()
            .copied()
            .find(|&n| NODE_POSITIONS[n] == (x + dx, y + dy))
    };

    find(ux * PRIMARY_STEP, uy * PRIMARY_STEP)
        .or_else(|| find(ux * FALLBACK_STEP_X, uy * FALLBACK_STEP_Y))
        .or_else(|| {
            DIRECTION_OVERRIDES
                .iter()
                .find(|&&(from, d, _)| from == node && d == dir)
                .map(|&(_, _, to)| to)
        })
}

static GRAPH: OnceLock<BoardGraph> = OnceLock::new();

/// Process-wide board graph, built on first use
pub fn graph() -> &'static BoardGraph {
    GRAPH.get_or_init(BoardGraph::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_is_symmetric() {
        let g = graph();
        for a in 0..NODE_COUNT {
            for &b in g.neighbors(a) {
                assert!(g.are_adjacent(b, a), "{a}-{b} not symmetric");
            }
        }
    }

    #[test]
    fn test_edge_count() {
        assert_eq!(graph().edges().count(), EDGES.len());
    }

    #[test]
    fn test_grid_directions() {
        let g = graph();
        // Center node 12 has all 8 neighbours
        assert_eq!(g.direction_to(12, Direction::East), Some(13));
        assert_eq!(g.direction_to(12, Direction::West), Some(11));
        assert_eq!(g.direction_to(12, Direction::North), Some(7));
        assert_eq!(g.direction_to(12, Direction::South), Some(17));
        assert_eq!(g.direction_to(12, Direction::SouthEast), Some(18));
        assert_eq!(g.direction_to(12, Direction::NorthWest), Some(6));
        assert_eq!(g.direction_to(12, Direction::SouthWest), Some(16));
        assert_eq!(g.direction_to(12, Direction::NorthEast), Some(8));
        // Node 7 has no diagonals
        assert_eq!(g.direction_to(7, Direction::SouthEast), None);
        assert_eq!(g.direction_to(7, Direction::NorthWest), None);
    }

    #[test]
    fn test_triangle_directions() {
        let g = graph();
        // Diagonal line 28 -> 25 -> 10 -> 16 -> 22
        let line: Vec<Node> = g.ray(28, Direction::SouthEast).collect();
        assert_eq!(line, vec![25, 10, 16, 22]);

        // Right triangle mirrors the left one
        let line: Vec<Node> = g.ray(12, Direction::East).collect();
        assert_eq!(line, vec![13, 14, 32, 35]);

        // Triangle side walks vertically with the short step
        assert_eq!(g.direction_to(25, Direction::South), Some(26));
        assert_eq!(g.direction_to(28, Direction::South), Some(29));
        assert_eq!(g.direction_to(25, Direction::North), None);
    }

    #[test]
    fn test_override_corner() {
        let g = graph();
        assert_eq!(g.direction_to(1, Direction::West), Some(0));
        assert_eq!(g.direction_to(5, Direction::North), Some(0));
        assert_eq!(g.direction_to(6, Direction::NorthWest), Some(0));
        assert_eq!(g.direction_to(0, Direction::NorthWest), None);
    }

    #[test]
    fn test_directions_are_reversible() {
        let g = graph();
        for node in 0..NODE_COUNT {
            for dir in Direction::ALL {
                if let Some(next) = g.direction_to(node, dir) {
                    assert!(g.are_adjacent(node, next));
                    assert_eq!(g.direction_to(next, dir.opposite()), Some(node));
                }
            }
        }
    }

    #[test]
    fn test_every_edge_has_a_direction() {
        let g = graph();
        for (a, b) in g.edges() {
            let found = Direction::ALL
                .iter()
                .any(|&d| g.direction_to(a, d) == Some(b));
            assert!(found, "edge {a}-{b} unreachable by any direction");
        }
    }

    #[test]
    fn test_out_of_range_node() {
        let g = graph();
        assert!(g.neighbors(NODE_COUNT).is_empty());
        assert_eq!(g.direction_to(NODE_COUNT, Direction::East), None);
    }
}
