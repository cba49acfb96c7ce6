//! Main AI Engine integrating all search components
//!
//! This module provides the AI engine that picks a move for either side.
//! The search follows a priority system:
//!
//! 1. **Forced**: only one legal move, play it without searching
//! 2. **Immediate win**: a move that wins on the spot
//! 3. **Alpha-Beta**: fixed-depth minimax with transposition table
//!
//! Every step agrees with plain alpha-beta: a winning move always scores
//! highest, and both scans walk moves in generation order.
//!
//! # Example
//!
//! ```
//! use macanan::{AIEngine, AiConfig, Board, Side};
//!
//! let config = AiConfig { depth: 2, tt_size_mb: 4, threads: 1, ..AiConfig::default() };
//! let engine = AIEngine::with_config(config);
//! let board = Board::new();
//!
//! let result = engine.get_move_with_stats(&board, Side::Men);
//! println!("Best move: {:?}", result.best_move);
//! println!("Search type: {:?}", result.search_type);
//! println!("Time: {}ms", result.time_ms);
//! ```

use std::time::Instant;

use tracing::debug;

use crate::board::{Board, Side};
use crate::config::AiConfig;
use crate::eval::evaluate;
use crate::rules::{apply_move, check_winner, legal_moves, turn_after, Move};
use crate::search::{SearchResult, Searcher, TTStats};

/// Type of search that produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Only one legal move existed
    Forced,
    /// Found a move that wins immediately
    ImmediateWin,
    /// Regular alpha-beta search result
    AlphaBeta,
}

/// Result of a move search with detailed statistics.
#[derive(Debug, Clone)]
pub struct MoveResult {
    /// Best move found, `None` if the game is over or no move exists
    pub best_move: Option<Move>,
    /// Score from the moving side's perspective
    pub score: i32,
    /// Type of search that found this move
    pub search_type: SearchType,
    /// Time taken in milliseconds
    pub time_ms: u64,
    /// Number of nodes searched
    pub nodes: u64,
}

impl MoveResult {
    #[inline]
    fn forced(mv: Move, score: i32, time_ms: u64) -> Self {
        Self {
            best_move: Some(mv),
            score,
            search_type: SearchType::Forced,
            time_ms,
            nodes: 1,
        }
    }

    #[inline]
    fn immediate_win(mv: Move, score: i32, time_ms: u64, nodes: u64) -> Self {
        Self {
            best_move: Some(mv),
            score,
            search_type: SearchType::ImmediateWin,
            time_ms,
            nodes,
        }
    }

    #[inline]
    fn from_alphabeta(result: SearchResult, time_ms: u64) -> Self {
        Self {
            best_move: result.best_move,
            score: result.score,
            search_type: SearchType::AlphaBeta,
            time_ms,
            nodes: result.nodes,
        }
    }

    #[inline]
    fn no_move(time_ms: u64) -> Self {
        Self {
            best_move: None,
            score: 0,
            search_type: SearchType::AlphaBeta,
            time_ms,
            nodes: 0,
        }
    }
}

/// Main AI Engine for Macanan.
///
/// Holds an immutable [`AiConfig`] and a searcher whose transposition
/// table persists between moves. The engine is `Send`, so the UI can move
/// it onto a worker thread for each AI turn.
///
/// # Example
///
/// ```
/// use macanan::{AIEngine, AiConfig, Board, Side};
///
/// let engine = AIEngine::with_config(AiConfig { depth: 1, threads: 1, ..AiConfig::default() });
/// let board = Board::new();
/// if let Some(mv) = engine.get_move(&board, Side::Men) {
///     println!("Play {mv}");
/// }
/// ```
pub struct AIEngine {
    searcher: Searcher,
    config: AiConfig,
}

impl AIEngine {
    /// Create a new AI engine with default settings (depth 3, 16 MB table).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(AiConfig::default())
    }

    /// Create an AI engine with custom configuration.
    #[must_use]
    pub fn with_config(config: AiConfig) -> Self {
        let searcher = match config.threads {
            0 => Searcher::new(config.tt_size_mb, config.weights.clone()),
            n => Searcher::with_threads(config.tt_size_mb, n, config.weights.clone()),
        };
        Self { searcher, config }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Search depth in plies
    pub fn depth(&self) -> u8 {
        self.config.depth
    }

    /// Change the search depth (clamped to at least 1).
    pub fn set_depth(&mut self, depth: u8) {
        self.config.depth = depth.max(1);
    }

    /// Get the best move for the given position.
    ///
    /// Returns `None` if the game is already decided or `side` has no move.
    #[must_use]
    pub fn get_move(&self, board: &Board, side: Side) -> Option<Move> {
        self.get_move_with_stats(board, side).best_move
    }

    /// Get the best move with detailed search statistics.
    #[must_use]
    pub fn get_move_with_stats(&self, board: &Board, side: Side) -> MoveResult {
        let start = Instant::now();
        let elapsed = || start.elapsed().as_millis() as u64;

        if check_winner(board, side).is_some() {
            return MoveResult::no_move(elapsed());
        }

        let mut moves = legal_moves(board, side);
        if moves.is_empty() {
            return MoveResult::no_move(elapsed());
        }

        // 1. Nothing to think about; score is the static value after the move
        if moves.len() == 1 {
            let mv = moves.remove(0);
            let after = apply_move(board, &mv, side);
            let score = evaluate(&after, side, &self.config.weights);
            debug!(side = side.name(), %mv, score, "forced move");
            return MoveResult::forced(mv, score, elapsed());
        }

        // 2. Immediate win
        if let Some((mv, nodes)) = find_immediate_win(board, side, &moves) {
            let depth_left = i32::from(self.config.depth.saturating_sub(1));
            let score = self.config.weights.win_score + depth_left;
            debug!(side = side.name(), %mv, "immediate win");
            return MoveResult::immediate_win(mv, score, elapsed(), nodes);
        }

        // 3. Regular alpha-beta search
        let result = self.searcher.best_move(board, side, self.config.depth);
        MoveResult::from_alphabeta(result, elapsed())
    }

    /// Clear the transposition table (new game).
    pub fn clear_cache(&self) {
        self.searcher.clear_tt();
    }

    /// Get transposition table statistics.
    pub fn tt_stats(&self) -> TTStats {
        self.searcher.tt_stats()
    }
}

impl Default for AIEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// First move in generation order after which `side` has won.
fn find_immediate_win(board: &Board, side: Side, moves: &[Move]) -> Option<(Move, u64)> {
    let mut nodes = 0;
    for mv in moves {
        nodes += 1;
        let after = apply_move(board, mv, side);
        if check_winner(&after, turn_after(side, mv, &after)) == Some(side) {
            return Some((mv.clone(), nodes));
        }
    }
    None
}

/// Best move for `side` searched `depth` plies deep with default weights.
///
/// Single-threaded and deterministic. Returns `None` when the game is
/// already decided or `side` has no legal move.
///
/// # Example
///
/// ```
/// use macanan::{best_move, Board, Move, Side};
///
/// let mv = best_move(&Board::new(), Side::Men, 1);
/// assert!(matches!(mv, Some(Move::PlaceBlock { .. })));
/// ```
#[must_use]
pub fn best_move(board: &Board, side: Side, depth: u8) -> Option<Move> {
    let config = AiConfig {
        depth: depth.max(1),
        tt_size_mb: 4,
        threads: 1,
        ..AiConfig::default()
    };
    AIEngine::with_config(config).get_move(board, side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Node;
    use crate::eval::EvalWeights;
    use crate::search::INF;

    fn engine(depth: u8) -> AIEngine {
        AIEngine::with_config(AiConfig {
            depth,
            tt_size_mb: 1,
            threads: 1,
            ..AiConfig::default()
        })
    }

    fn board_with(tiger: Option<Node>, men: &[Node], reserve: u8) -> Board {
        let mut board = Board::new();
        for &m in men {
            board.place_piece(m, Side::Men);
        }
        board.set_men_reserve(reserve);
        board.set_first_placement_done(true);
        if let Some(t) = tiger {
            board.place_piece(t, Side::Tiger);
        }
        board
    }

    #[test]
    fn test_engine_creation() {
        let engine = AIEngine::new();
        assert_eq!(engine.depth(), 3);
        assert_eq!(engine.config().thinking_delay_ms, 1000);
    }

    #[test]
    fn test_engine_set_depth() {
        let mut engine = engine(3);
        engine.set_depth(5);
        assert_eq!(engine.depth(), 5);
        engine.set_depth(0);
        assert_eq!(engine.depth(), 1);
    }

    #[test]
    fn test_engine_opening_is_block() {
        let result = engine(2).get_move_with_stats(&Board::new(), Side::Men);
        assert_eq!(result.search_type, SearchType::AlphaBeta);
        assert!(matches!(result.best_move, Some(Move::PlaceBlock { .. })));
        assert!(result.nodes > 1);
    }

    #[test]
    fn test_engine_finds_immediate_win() {
        // Men total 14, one more capture ends it
        let board = board_with(Some(12), &[13], 13);
        let result = engine(3).get_move_with_stats(&board, Side::Tiger);
        assert_eq!(result.search_type, SearchType::ImmediateWin);
        assert_eq!(
            result.best_move,
            Some(Move::Jump { from: 12, landing: 14, captured: vec![13] })
        );
        assert_eq!(result.score, 100_002);
    }

    #[test]
    fn test_engine_forced_move() {
        // Tiger at corner 0: 1 and 5 blocked as pairs, only 6 is open
        let board = board_with(Some(0), &[1, 2, 5, 10], 17);
        let result = engine(3).get_move_with_stats(&board, Side::Tiger);
        assert_eq!(result.search_type, SearchType::Forced);
        assert_eq!(result.best_move, Some(Move::Relocate { from: 0, to: 6 }));

        let after = apply_move(&board, &Move::Relocate { from: 0, to: 6 }, Side::Tiger);
        assert_eq!(result.score, evaluate(&after, Side::Tiger, &EvalWeights::default()));
        assert_ne!(result.score, 0);
    }

    #[test]
    fn test_engine_no_move_when_game_over() {
        let board = board_with(Some(12), &[], 13);
        assert!(engine(2).get_move(&board, Side::Men).is_none());

        let trapped = board_with(Some(0), &[1, 2, 5, 10, 6, 12], 15);
        assert!(engine(2).get_move(&trapped, Side::Tiger).is_none());
    }

    #[test]
    fn test_engine_agrees_with_search() {
        let board = board_with(Some(12), &[7, 11, 17], 18);
        let engine = engine(3);
        let result = engine.get_move_with_stats(&board, Side::Tiger);

        let searcher = Searcher::with_threads(1, 1, engine.config().weights.clone());
        let searched = searcher.best_move(&board, Side::Tiger, 3);
        assert_eq!(result.best_move, searched.best_move);
        assert_eq!(result.score, searched.score);
        assert!(result.score > -INF);
    }

    #[test]
    fn test_engine_clear_cache() {
        let engine = engine(3);
        let board = board_with(Some(12), &[7, 11, 17], 18);
        let _ = engine.get_move(&board, Side::Tiger);
        assert!(engine.tt_stats().used > 0);
        engine.clear_cache();
        assert_eq!(engine.tt_stats().used, 0);
    }

    #[test]
    fn test_best_move_free_fn() {
        let board = board_with(Some(0), &[1, 2, 5, 10, 6], 16);
        assert_eq!(best_move(&board, Side::Men, 1), Some(Move::PlaceSingle { target: 12 }));
        assert_eq!(best_move(&board_with(Some(12), &[], 13), Side::Tiger, 2), None);
    }

    #[test]
    fn test_engine_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<AIEngine>();
    }
}
