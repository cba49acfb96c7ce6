//! Turn and phase state machine

use std::fmt;

use crate::board::{Board, Side, BLOCK_SIZE};

use super::movegen::is_block_turn;
use super::moves::Move;
use super::win::check_winner;

/// Phase of the game, derived from the board and the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Men still owe their opening 3x3 block
    PlacingPhaseOne,
    /// Men place one at a time and/or the tiger has not been dropped
    PlacingPhaseTwo,
    /// All men placed and the tiger is on the board
    MovementPhase,
    /// Terminal: no further moves are legal
    GameOver(Side),
}

impl Phase {
    /// Derive the current phase.
    pub fn of(board: &Board, to_move: Side) -> Phase {
        if let Some(winner) = check_winner(board, to_move) {
            return Phase::GameOver(winner);
        }
        if is_block_turn(board) {
            Phase::PlacingPhaseOne
        } else if board.men_reserve() > 0 || board.tiger_pos().is_none() {
            Phase::PlacingPhaseTwo
        } else {
            Phase::MovementPhase
        }
    }

    #[inline]
    pub fn is_over(self) -> bool {
        matches!(self, Phase::GameOver(_))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::PlacingPhaseOne => write!(f, "Opening block"),
            Phase::PlacingPhaseTwo => write!(f, "Placement"),
            Phase::MovementPhase => write!(f, "Movement"),
            Phase::GameOver(winner) => write!(f, "{} won", winner.name()),
        }
    }
}

/// Pieces the men must place before a placement turn ends
#[inline]
pub fn pieces_required(mv: &Move) -> usize {
    match mv {
        Move::PlaceBlock { .. } => BLOCK_SIZE,
        _ => 1,
    }
}

/// Side to move after `side` played `mv`, given the resulting board.
///
/// A men placement that filled fewer cells than required keeps the turn
/// while reserve remains. Everything else passes the turn.
pub fn turn_after(side: Side, mv: &Move, after: &Board) -> Side {
    if side == Side::Men
        && mv.is_placement()
        && mv.placed_count() < pieces_required(mv)
        && after.men_reserve() > 0
    {
        Side::Men
    } else {
        side.opponent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{apply_move, legal_moves};

    #[test]
    fn test_phase_progression() {
        let board = Board::new();
        assert_eq!(Phase::of(&board, Side::Men), Phase::PlacingPhaseOne);

        let block = legal_moves(&board, Side::Men).remove(4);
        let board = apply_move(&board, &block, Side::Men);
        assert_eq!(turn_after(Side::Men, &block, &board), Side::Tiger);
        assert_eq!(Phase::of(&board, Side::Tiger), Phase::PlacingPhaseTwo);

        // Remaining 12 men fill both triangles
        let mut board = board;
        for n in 25..=36 {
            board.place_piece(n, Side::Men);
        }
        board.set_men_reserve(0);
        board.place_piece(0, Side::Tiger);
        // Tiger in the corner can still step to 1 or 5
        assert_eq!(Phase::of(&board, Side::Tiger), Phase::MovementPhase);
    }

    #[test]
    fn test_partial_block_keeps_turn() {
        let mut board = Board::new();
        board.place_piece(12, Side::Tiger);
        let block = crate::rules::block_move(&board, 12).unwrap();
        let after = apply_move(&board, &block, Side::Men);
        assert_eq!(after.men_reserve(), 13);
        assert_eq!(turn_after(Side::Men, &block, &after), Side::Men);
        assert_eq!(Phase::of(&after, Side::Men), Phase::PlacingPhaseOne);
    }

    #[test]
    fn test_single_move_passes_turn() {
        let board = Board::new();
        let mv = Move::PlaceSingle { target: 3 };
        assert_eq!(turn_after(Side::Tiger, &mv, &board), Side::Men);
        assert_eq!(turn_after(Side::Men, &mv, &board), Side::Tiger);
    }

    #[test]
    fn test_game_over_phase() {
        let mut board = Board::new();
        board.set_men_reserve(13);
        let phase = Phase::of(&board, Side::Men);
        assert_eq!(phase, Phase::GameOver(Side::Tiger));
        assert!(phase.is_over());
        assert_eq!(phase.to_string(), "Tiger won");
    }
}
