//! Board representation for Macanan

pub mod board;
pub mod graph;


// Re-exports
pub use board::Board;
pub use graph::{graph, BoardGraph, Direction};

use serde::{Deserialize, Serialize};

/// Node identifier on the board graph (0..NODE_COUNT)
pub type Node = usize;

/// Number of nodes: a 5x5 grid plus two six-node triangles
pub const NODE_COUNT: usize = 37;
/// Side length of the square grid region (nodes 0..25)
pub const GRID_SIZE: usize = 5;
/// Men owned by the placing side for the whole game
pub const TOTAL_MEN: u8 = 21;
/// Men needed in the first block placement
pub const BLOCK_SIZE: usize = 9;

/// Content of a single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Men,
    Tiger,
}

impl Cell {
    /// Side owning the piece in this cell, if any
    #[inline]
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::Men => Some(Side::Men),
            Cell::Tiger => Some(Side::Tiger),
        }
    }
}

/// The two asymmetric roles.
///
/// Serialized with the traditional names used by saved games
/// (`"uwong"` for the men, `"macan"` for the tiger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Placing side: 21 men that try to trap the tiger
    #[serde(rename = "uwong")]
    Men,
    /// Mobile side: a single tiger that captures by jumping
    #[serde(rename = "macan")]
    Tiger,
}

impl Side {
    /// Get opponent side
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Men => Side::Tiger,
            Side::Tiger => Side::Men,
        }
    }

    /// Cell value for this side's pieces
    #[inline]
    pub fn piece(self) -> Cell {
        match self {
            Side::Men => Cell::Men,
            Side::Tiger => Cell::Tiger,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Men => "Men",
            Side::Tiger => "Tiger",
        }
    }
}

/// Check whether a raw index names a node on the board
#[inline]
pub fn is_valid_node(node: usize) -> bool {
    node < NODE_COUNT
}

/// Grid (row, col) of a node in the 5x5 region, `None` for triangle nodes
#[inline]
pub fn grid_coords(node: Node) -> Option<(usize, usize)> {
    if node < GRID_SIZE * GRID_SIZE {
        Some((node / GRID_SIZE, node % GRID_SIZE))
    } else {
        None
    }
}
