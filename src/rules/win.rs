//! Win condition checking
//!
//! Win conditions:
//! 1. Tiger wins as soon as the men in play (board + reserve) drop below 14
//! 2. Men win when the tiger has no legal move on its own turn

use crate::board::{Board, Side};

use super::movegen::tiger_moves;

/// Men needed to stay in the game
pub const SURVIVAL_THRESHOLD: u8 = 14;

/// Check whether the men have been reduced below the survival threshold
#[inline]
pub fn men_eliminated(men_total: u8) -> bool {
    men_total < SURVIVAL_THRESHOLD
}

/// Check whether the tiger is on the board and cannot move
pub fn tiger_trapped(board: &Board) -> bool {
    board.tiger_pos().is_some() && tiger_moves(board).is_empty()
}

/// Determine the winner of a position.
///
/// # Arguments
/// * `board` - Current board state
/// * `to_move` - Side whose turn it is
///
/// # Returns
/// * `Some(Side::Tiger)` - Men total (board + reserve) is below 14
/// * `Some(Side::Men)` - It is the tiger's turn and it has no legal move
/// * `None` - Game continues
pub fn check_winner(board: &Board, to_move: Side) -> Option<Side> {
    if men_eliminated(board.men_total()) {
        return Some(Side::Tiger);
    }

    if to_move == Side::Tiger && tiger_trapped(board) {
        return Some(Side::Men);
    }

    None
}
