//! Game rules for Macanan (men versus tiger)
//!
//! This module implements the rule set including:
//! - Jump captures over odd-length lines of men
//! - Legal move generation for each side and phase
//! - Turn advancement and win conditions

pub mod capture;
pub mod movegen;
pub mod moves;
pub mod phase;
#[cfg(test)]
pub(crate) mod playout;
pub mod win;

// Re-exports for convenient access
pub use capture::{best_jump_to, find_jumps, has_jump, jump_in_direction, pick_best_jump, Jump};
pub use movegen::{
    block_cells, block_move, is_block_anchor, is_block_turn, legal_moves, men_moves,
    tiger_mobility, tiger_moves, BLOCK_ANCHORS,
};
pub use moves::{apply_move, Move};
pub use phase::{pieces_required, turn_after, Phase};
pub use win::{check_winner, men_eliminated, tiger_trapped, SURVIVAL_THRESHOLD};
