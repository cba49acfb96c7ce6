//! Legal move generation for both sides across all phases
//!
//! Generation order is deterministic: blocks by anchor, singles by node id,
//! relocations by origin then neighbour order, and tiger jumps in
//! `Direction::ALL` scan order after the plain steps.

use crate::board::{graph, grid_coords, Board, Node, Side, BLOCK_SIZE, GRID_SIZE};

use super::capture::{find_jumps, pick_best_jump};
use super::moves::Move;

/// Interior grid nodes that can anchor (center) a 3x3 opening block
pub const BLOCK_ANCHORS: [Node; 9] = [6, 7, 8, 11, 12, 13, 16, 17, 18];

/// Check whether `node` is the center of a 3x3 block fully inside the grid
#[inline]
pub fn is_block_anchor(node: Node) -> bool {
    let interior = 1..GRID_SIZE - 1;
    matches!(grid_coords(node), Some((row, col)) if interior.contains(&row) && interior.contains(&col))
}

/// The 9 grid nodes of the block centered on `anchor`
pub fn block_cells(anchor: Node) -> Option<[Node; BLOCK_SIZE]> {
    if !is_block_anchor(anchor) {
        return None;
    }
    let mut cells = [0; BLOCK_SIZE];
    let mut i = 0;
    for dr in [-1i32, 0, 1] {
        for dc in [-1i32, 0, 1] {
            cells[i] = (anchor as i32 + dr * GRID_SIZE as i32 + dc) as Node;
            i += 1;
        }
    }
    Some(cells)
}

/// Block move for `anchor` filling only its empty cells.
///
/// Returns `None` for a non-anchor or a fully occupied block.
pub fn block_move(board: &Board, anchor: Node) -> Option<Move> {
    let cells: Vec<Node> = block_cells(anchor)?
        .into_iter()
        .filter(|&n| board.is_empty(n))
        .collect();
    if cells.is_empty() {
        None
    } else {
        Some(Move::PlaceBlock { cells })
    }
}

/// Check whether the men still owe their opening block
#[inline]
pub fn is_block_turn(board: &Board) -> bool {
    !board.first_placement_done() && board.men_reserve() as usize >= BLOCK_SIZE
}

/// All legal moves for `side`.
///
/// # Arguments
/// * `board` - Current board state
/// * `side` - Side to generate moves for
///
/// # Returns
/// Moves in deterministic order. An empty list for the tiger on its own
/// turn means the men have won.
pub fn legal_moves(board: &Board, side: Side) -> Vec<Move> {
    match side {
        Side::Men => men_moves(board),
        Side::Tiger => tiger_moves(board),
    }
}

/// Legal moves for the men.
pub fn men_moves(board: &Board) -> Vec<Move> {
    if is_block_turn(board) {
        return BLOCK_ANCHORS
            .iter()
            .filter_map(|&anchor| block_move(board, anchor))
            .collect();
    }

    if board.men_reserve() > 0 {
        return board
            .empty_nodes()
            .map(|target| Move::PlaceSingle { target })
            .collect();
    }

    let g = graph();
    board
        .men_positions()
        .flat_map(|from| {
            g.neighbors(from)
                .iter()
                .filter(|&&to| board.is_empty(to))
                .map(move |&to| Move::Relocate { from, to })
        })
        .collect()
}

/// Legal moves for the tiger.
pub fn tiger_moves(board: &Board) -> Vec<Move> {
    let Some(from) = board.tiger_pos() else {
        return board
            .empty_nodes()
            .map(|target| Move::PlaceSingle { target })
            .collect();
    };

    let mut moves: Vec<Move> = graph()
        .neighbors(from)
        .iter()
        .filter(|&&to| board.is_empty(to))
        .map(|&to| Move::Relocate { from, to })
        .collect();

    // One jump per landing cell
    let jumps = find_jumps(board, from);
    let mut seen: Vec<Node> = Vec::with_capacity(jumps.len());
    for jump in &jumps {
        if seen.contains(&jump.landing) {
            continue;
        }
        seen.push(jump.landing);
        let same = jumps.iter().filter(|j| j.landing == jump.landing).cloned();
        if let Some(best) = pick_best_jump(same) {
            moves.push(best.into());
        }
    }

    moves
}

/// Number of legal tiger moves (0 if the tiger is boxed in).
pub fn tiger_mobility(board: &Board) -> usize {
    match board.tiger_pos() {
        Some(_) => tiger_moves(board).len(),
        None => board.empty_nodes().count(),
    }
}
