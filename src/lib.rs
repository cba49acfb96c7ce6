//! Macanan (men versus tiger) rules engine and AI
//!
//! An engine for the Javanese hunt game Macanan, played on a 37-node graph:
//! a 5x5 grid with alternating diagonals plus a triangle on each side.
//! - Men: 21 pieces, open with a 3x3 block, then place one at a time,
//!   then move; they win by leaving the tiger without a move
//! - Tiger: one piece that captures by jumping an odd-length line of men;
//!   it wins once fewer than 14 men remain in play
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board graph, directions and board state
//! - [`rules`]: Jumps, move generation, turn order and win checks
//! - [`eval`]: Asymmetric position evaluation with configurable weights
//! - [`search`]: Minimax with alpha-beta pruning and transposition table
//! - [`engine`]: AI engine integrating all components
//! - [`game`] and [`save`]: Game session, undo history and saved games
//! - [`ui`]: Native egui front end
//!
//! # Quick Start
//!
//! ```
//! use macanan::{apply_move, best_move, legal_moves, turn_after, Board, Side};
//!
//! let board = Board::new();
//!
//! // The men's first turn is always a 3x3 block
//! let moves = legal_moves(&board, Side::Men);
//! assert_eq!(moves.len(), 9);
//!
//! // AI plays the men
//! let mv = best_move(&board, Side::Men, 2).expect("men have moves");
//! let after = apply_move(&board, &mv, Side::Men);
//! assert_eq!(after.men_on_board(), 9);
//! assert_eq!(turn_after(Side::Men, &mv, &after), Side::Tiger);
//! ```

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod rules;
pub mod save;
pub mod search;
pub mod ui;

// Re-export commonly used types for convenience
pub use board::{Board, Cell, Direction, Node, Side, NODE_COUNT, TOTAL_MEN};
pub use config::{AiConfig, Config};
pub use engine::{best_move, AIEngine, MoveResult, SearchType};
pub use error::{GameError, Result};
pub use eval::{evaluate, EvalWeights};
pub use game::{ClickOutcome, GameRecord, GameSession, HistoryEntry};
pub use rules::{apply_move, check_winner, find_jumps, legal_moves, turn_after, Move, Phase};
pub use save::{PlayerSettings, SavedGame};
pub use search::Searcher;
