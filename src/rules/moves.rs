//! Move representation and application

use std::fmt;

use crate::board::{Board, Node, Side, BLOCK_SIZE};

use super::capture::Jump;

/// A move for either side. Each variant carries exactly the cells it changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Move {
    /// Opening 3x3 block of men; only the cells that were empty
    PlaceBlock { cells: Vec<Node> },
    /// One man from reserve, or the tiger's first drop
    PlaceSingle { target: Node },
    /// Step to an adjacent empty node
    Relocate { from: Node, to: Node },
    /// Tiger jump over an odd chain of men
    Jump {
        from: Node,
        landing: Node,
        captured: Vec<Node>,
    },
}

impl Move {
    /// Node the moving piece ends on (`None` for a block)
    pub fn target(&self) -> Option<Node> {
        match self {
            Move::PlaceBlock { .. } => None,
            Move::PlaceSingle { target } => Some(*target),
            Move::Relocate { to, .. } => Some(*to),
            Move::Jump { landing, .. } => Some(*landing),
        }
    }

    /// Node the moving piece leaves, for relocations and jumps
    pub fn origin(&self) -> Option<Node> {
        match self {
            Move::Relocate { from, .. } | Move::Jump { from, .. } => Some(*from),
            _ => None,
        }
    }

    /// Pieces taken from reserve onto the board
    pub fn placed_count(&self) -> usize {
        match self {
            Move::PlaceBlock { cells } => cells.len(),
            Move::PlaceSingle { .. } => 1,
            _ => 0,
        }
    }

    /// Men removed by this move
    pub fn captured_count(&self) -> usize {
        match self {
            Move::Jump { captured, .. } => captured.len(),
            _ => 0,
        }
    }

    #[inline]
    pub fn is_placement(&self) -> bool {
        matches!(self, Move::PlaceBlock { .. } | Move::PlaceSingle { .. })
    }

    /// Cells to highlight when showing this move
    pub fn touched_nodes(&self) -> Vec<Node> {
        match self {
            Move::PlaceBlock { cells } => cells.clone(),
            Move::PlaceSingle { target } => vec![*target],
            Move::Relocate { from, to } => vec![*from, *to],
            Move::Jump {
                from,
                landing,
                captured,
            } => {
                let mut nodes = vec![*from];
                nodes.extend(captured);
                nodes.push(*landing);
                nodes
            }
        }
    }
}

impl From<Jump> for Move {
    fn from(jump: Jump) -> Self {
        Move::Jump {
            from: jump.from,
            landing: jump.landing,
            captured: jump.captured,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::PlaceBlock { cells } => write!(f, "block {cells:?}"),
            Move::PlaceSingle { target } => write!(f, "place {target}"),
            Move::Relocate { from, to } => write!(f, "{from} -> {to}"),
            Move::Jump {
                from,
                landing,
                captured,
            } => write!(f, "{from} x{} -> {landing}", captured.len()),
        }
    }
}

/// Apply a legal move and return the resulting board.
///
/// The input is never mutated. The move must come from
/// [`legal_moves`](super::legal_moves) for `side`; anything else is a logic
/// error caught by debug assertions.
///
/// # Example
///
/// ```
/// use macanan::board::{Board, Side};
/// use macanan::rules::{apply_move, legal_moves};
///
/// let board = Board::new();
/// let opening = &legal_moves(&board, Side::Men)[0];
/// let after = apply_move(&board, opening, Side::Men);
///
/// assert_eq!(after.men_on_board(), 9);
/// assert_eq!(after.men_reserve(), 12);
/// assert_eq!(board.men_on_board(), 0);
/// ```
#[must_use]
pub fn apply_move(board: &Board, mv: &Move, side: Side) -> Board {
    let mut next = *board;

    match mv {
        Move::PlaceBlock { cells } => {
            debug_assert_eq!(side, Side::Men);
            for &cell in cells {
                next.place_piece(cell, Side::Men);
            }
            next.take_from_reserve(cells.len() as u8);
            if cells.len() >= BLOCK_SIZE || next.men_reserve() == 0 {
                next.set_first_placement_done(true);
            }
        }
        Move::PlaceSingle { target } => {
            next.place_piece(*target, side);
            if side == Side::Men {
                next.take_from_reserve(1);
            }
        }
        Move::Relocate { from, to } => {
            next.move_piece(*from, *to);
        }
        Move::Jump {
            from,
            landing,
            captured,
        } => {
            debug_assert_eq!(side, Side::Tiger);
            for &man in captured {
                next.remove_piece(man);
            }
            next.move_piece(*from, *landing);
        }
    }

    next
}
