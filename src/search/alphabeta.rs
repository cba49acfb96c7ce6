//! Minimax search with alpha-beta pruning and transposition table
//!
//! This module implements the core search algorithm for the Macanan AI.
//! The two sides are scored by different formulas, so the search is a
//! plain minimax over a fixed *perspective* (not negamax): nodes where the
//! perspective side moves maximize, the others minimize.
//!
//! # Features
//!
//! - Terminal positions score `±(win_score + depth)` so faster wins rank first
//! - Fail-soft alpha-beta with a lock-free shared transposition table
//! - Move ordering: cached best move, then larger captures
//! - Root splitting: legal root moves are dealt round-robin to worker
//!   threads that share nothing but the transposition table
//!
//! # Example
//!
//! ```
//! use macanan::board::{Board, Side};
//! use macanan::eval::EvalWeights;
//! use macanan::search::Searcher;
//!
//! let searcher = Searcher::with_threads(4, 1, EvalWeights::default());
//! let board = Board::new();
//!
//! let result = searcher.best_move(&board, Side::Men, 2);
//! assert!(matches!(result.best_move, Some(macanan::rules::Move::PlaceBlock { .. })));
//! ```

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::board::{Board, Side};
use crate::eval::{evaluate, EvalWeights};
use crate::rules::{apply_move, check_winner, legal_moves, turn_after, Move};

use super::{EntryType, TTStats, TranspositionTable, ZobristTable};

/// Infinity score for alpha-beta bounds
pub const INF: i32 = 1_000_000_000;

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Total alpha-beta cutoffs
    pub beta_cutoffs: u64,
    /// Cutoffs on the first move tried (measures move ordering quality)
    pub first_move_cutoffs: u64,
    /// Total TT probes
    pub tt_probes: u64,
    /// TT probes that returned a usable score (exact/bound hit)
    pub tt_score_hits: u64,
    /// TT probes that provided a best move for ordering
    pub tt_move_hits: u64,
}

impl SearchStats {
    /// First-move cutoff rate in percent
    pub fn first_move_rate(&self) -> f64 {
        if self.beta_cutoffs == 0 {
            0.0
        } else {
            self.first_move_cutoffs as f64 / self.beta_cutoffs as f64 * 100.0
        }
    }

    /// TT score hit rate in percent
    pub fn tt_score_rate(&self) -> f64 {
        if self.tt_probes == 0 {
            0.0
        } else {
            self.tt_score_hits as f64 / self.tt_probes as f64 * 100.0
        }
    }

    /// Merge another stats into this one (for combining worker stats)
    fn merge(&mut self, other: &SearchStats) {
        self.beta_cutoffs += other.beta_cutoffs;
        self.first_move_cutoffs += other.first_move_cutoffs;
        self.tt_probes += other.tt_probes;
        self.tt_score_hits += other.tt_score_hits;
        self.tt_move_hits += other.tt_move_hits;
    }
}

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move found, `None` when the position is terminal or has no moves
    pub best_move: Option<Move>,
    /// Score of the best move from the searching side's perspective
    pub score: i32,
    /// Depth searched
    pub depth: u8,
    /// Total nodes searched
    pub nodes: u64,
    /// Search diagnostics
    pub stats: SearchStats,
}

// =============================================================================
// SharedState: thread-safe state shared across all workers
// =============================================================================

/// State shared between all search worker threads. Only the TT is written.
struct SharedState {
    zobrist: ZobristTable,
    tt: TranspositionTable,
    weights: EvalWeights,
}

// =============================================================================
// Worker: per-thread search state
// =============================================================================

/// Per-thread search worker. Alpha-beta bounds live on its own call stack.
struct Worker {
    shared: Arc<SharedState>,
    perspective: Side,
    nodes: u64,
    stats: SearchStats,
}

impl Worker {
    fn new(shared: Arc<SharedState>, perspective: Side) -> Self {
        Self {
            shared,
            perspective,
            nodes: 0,
            stats: SearchStats::default(),
        }
    }

    fn terminal_score(&self, winner: Side, depth: u8) -> i32 {
        let score = self.shared.weights.win_score + i32::from(depth);
        if winner == self.perspective {
            score
        } else {
            -score
        }
    }

    /// Fail-soft minimax with alpha-beta pruning.
    ///
    /// `to_move` maximizes when it is the worker's perspective side.
    fn minimax(&mut self, board: &Board, to_move: Side, depth: u8, mut alpha: i32, mut beta: i32) -> i32 {
        self.nodes += 1;

        if let Some(winner) = check_winner(board, to_move) {
            return self.terminal_score(winner, depth);
        }

        if depth == 0 {
            return evaluate(board, self.perspective, &self.shared.weights);
        }

        let hash = self.shared.zobrist.hash(board, to_move)
            ^ self.shared.zobrist.perspective_key(self.perspective);

        self.stats.tt_probes += 1;
        if let Some(score) = self.shared.tt.probe(hash, depth, alpha, beta) {
            self.stats.tt_score_hits += 1;
            return score;
        }

        let moves = legal_moves(board, to_move);
        if moves.is_empty() {
            return evaluate(board, self.perspective, &self.shared.weights);
        }

        let tt_index = self
            .shared
            .tt
            .best_index(hash)
            .filter(|&i| i < moves.len());
        if tt_index.is_some() {
            self.stats.tt_move_hits += 1;
        }

        let maximizing = to_move == self.perspective;
        let (alpha_orig, beta_orig) = (alpha, beta);
        let mut best = if maximizing { -INF } else { INF };
        let mut best_index = 0;

        for (tried, i) in order_moves(&moves, tt_index).into_iter().enumerate() {
            let mv = &moves[i];
            let child = apply_move(board, mv, to_move);
            let next = turn_after(to_move, mv, &child);
            let score = self.minimax(&child, next, depth - 1, alpha, beta);

            if maximizing {
                if score > best {
                    best = score;
                    best_index = i;
                }
                alpha = alpha.max(best);
            } else {
                if score < best {
                    best = score;
                    best_index = i;
                }
                beta = beta.min(best);
            }

            if beta <= alpha {
                self.stats.beta_cutoffs += 1;
                if tried == 0 {
                    self.stats.first_move_cutoffs += 1;
                }
                break;
            }
        }

        let entry_type = if best <= alpha_orig {
            EntryType::UpperBound
        } else if best >= beta_orig {
            EntryType::LowerBound
        } else {
            EntryType::Exact
        };
        self.shared
            .tt
            .store(hash, depth, best, entry_type, Some(best_index));

        best
    }

    /// Search the root moves at `indices` in order.
    ///
    /// Returns the index and exact score of the first move reaching the
    /// maximum among them.
    fn search_root(
        &mut self,
        board: &Board,
        side: Side,
        depth: u8,
        moves: &[Move],
        indices: impl IntoIterator<Item = usize>,
    ) -> Option<(usize, i32)> {
        self.nodes += 1;
        let mut alpha = -INF;
        let mut best: Option<(usize, i32)> = None;

        for i in indices {
            let mv = &moves[i];
            let child = apply_move(board, mv, side);
            let next = turn_after(side, mv, &child);
            let score = self.minimax(&child, next, depth - 1, alpha, INF);

            if best.map_or(true, |(_, s)| score > s) {
                best = Some((i, score));
                alpha = alpha.max(score);
            }
        }

        best
    }
}

/// Cached best move first, then by captured count (stable otherwise).
fn order_moves(moves: &[Move], tt_index: Option<usize>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..moves.len()).collect();
    order.sort_by_key(|&i| {
        let cached = tt_index == Some(i);
        (!cached, std::cmp::Reverse(moves[i].captured_count()))
    });
    order
}

// =============================================================================
// Searcher: public API wrapper
// =============================================================================

/// Alpha-beta search engine with a transposition table.
///
/// The table persists across searches; entries are pure functions of
/// their key, so reusing them never changes a result. For a new game,
/// `clear_tt()` frees the slots for fresh positions.
pub struct Searcher {
    shared: Arc<SharedState>,
    num_threads: usize,
}

impl Searcher {
    /// Create a new searcher using the available CPU cores (up to 8).
    ///
    /// # Arguments
    ///
    /// * `tt_size_mb` - Size of transposition table in megabytes
    /// * `weights` - Evaluation weights for both sides
    #[must_use]
    pub fn new(tt_size_mb: usize, weights: EvalWeights) -> Self {
        let num_threads = std::thread::available_parallelism()
            .map(|n| n.get().min(8))
            .unwrap_or(4);
        Self::with_threads(tt_size_mb, num_threads, weights)
    }

    /// Create a new searcher with explicit thread count.
    #[must_use]
    pub fn with_threads(tt_size_mb: usize, num_threads: usize, weights: EvalWeights) -> Self {
        Self {
            shared: Arc::new(SharedState {
                zobrist: ZobristTable::new(),
                tt: TranspositionTable::new(tt_size_mb),
                weights,
            }),
            num_threads: num_threads.max(1),
        }
    }

    /// Evaluation weights in use
    pub fn weights(&self) -> &EvalWeights {
        &self.shared.weights
    }

    /// Worker threads used by [`Searcher::best_move`]
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Score `board` with `to_move` to play, searched `depth` plies deep.
    ///
    /// The scoring perspective is `to_move` when `maximizing`, otherwise
    /// its opponent. Depth 0 returns the static evaluation unless the
    /// position is already decided.
    #[must_use]
    pub fn search(
        &self,
        board: &Board,
        to_move: Side,
        depth: u8,
        alpha: i32,
        beta: i32,
        maximizing: bool,
    ) -> i32 {
        let perspective = if maximizing { to_move } else { to_move.opponent() };
        let mut worker = Worker::new(Arc::clone(&self.shared), perspective);
        worker.minimax(board, to_move, depth, alpha, beta)
    }

    /// Find the best move for `side` searched `depth` plies deep.
    ///
    /// Depth is at least 1. Ties between root moves go to the earliest
    /// generated move, so the result does not depend on the thread count.
    #[must_use]
    pub fn best_move(&self, board: &Board, side: Side, depth: u8) -> SearchResult {
        let depth = depth.max(1);
        let start = Instant::now();
        let moves = legal_moves(board, side);

        let mut worker = Worker::new(Arc::clone(&self.shared), side);

        if let Some(winner) = check_winner(board, side) {
            return SearchResult {
                best_move: None,
                score: worker.terminal_score(winner, depth),
                depth,
                nodes: 1,
                stats: SearchStats::default(),
            };
        }
        if moves.is_empty() {
            return SearchResult {
                best_move: None,
                score: evaluate(board, side, &self.shared.weights),
                depth,
                nodes: 1,
                stats: SearchStats::default(),
            };
        }

        let threads = self.num_threads.min(moves.len());
        let (best, nodes, stats) = if threads > 1 {
            self.search_parallel(board, side, depth, &moves, threads)
        } else {
            let best = worker.search_root(board, side, depth, &moves, 0..moves.len());
            (best, worker.nodes, worker.stats)
        };

        let (index, score) = best.unwrap_or((0, -INF));
        debug!(
            side = side.name(),
            depth,
            score,
            nodes,
            threads,
            tt_hit_rate = stats.tt_score_rate(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "search finished"
        );

        SearchResult {
            best_move: moves.get(index).cloned(),
            score,
            depth,
            nodes,
            stats,
        }
    }

    /// Deal root moves round-robin to `threads` workers.
    ///
    /// Each worker keeps its own bounds; only the TT is shared.
    fn search_parallel(
        &self,
        board: &Board,
        side: Side,
        depth: u8,
        moves: &[Move],
        threads: usize,
    ) -> (Option<(usize, i32)>, u64, SearchStats) {
        let handles: Vec<_> = (1..threads)
            .map(|thread_id| {
                let shared = Arc::clone(&self.shared);
                let board = *board;
                let moves = moves.to_vec();

                std::thread::spawn(move || {
                    let mut worker = Worker::new(shared, side);
                    let indices = (thread_id..moves.len()).step_by(threads);
                    let best = worker.search_root(&board, side, depth, &moves, indices);
                    (best, worker.nodes, worker.stats)
                })
            })
            .collect();

        // Main thread = worker 0
        let mut main_worker = Worker::new(Arc::clone(&self.shared), side);
        let indices = (0..moves.len()).step_by(threads);
        let mut best = main_worker.search_root(board, side, depth, moves, indices);
        let mut total_nodes = main_worker.nodes;
        let mut merged_stats = main_worker.stats;

        for handle in handles {
            match handle.join() {
                Ok((result, nodes, stats)) => {
                    total_nodes += nodes;
                    merged_stats.merge(&stats);
                    best = match (best, result) {
                        (Some(a), Some(b)) => Some(prefer_root(a, b)),
                        (a, b) => a.or(b),
                    };
                }
                Err(_) => warn!("search worker panicked, its root moves are skipped"),
            }
        }

        (best, total_nodes, merged_stats)
    }

    /// Get statistics about the transposition table.
    #[must_use]
    pub fn tt_stats(&self) -> TTStats {
        self.shared.tt.stats()
    }

    /// Clear the transposition table.
    pub fn clear_tt(&self) {
        self.shared.tt.clear();
    }
}

/// Higher score wins, equal scores go to the lower move index
fn prefer_root(a: (usize, i32), b: (usize, i32)) -> (usize, i32) {
    if b.1 > a.1 || (b.1 == a.1 && b.0 < a.0) {
        b
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Node;
    use crate::rules::playout::{random_game, Lcg};

    fn searcher() -> Searcher {
        Searcher::with_threads(1, 1, EvalWeights::default())
    }

    fn board_with(tiger: Option<Node>, men: &[Node], reserve: u8, block_done: bool) -> Board {
        let mut board = Board::new();
        for &m in men {
            board.place_piece(m, Side::Men);
        }
        board.set_men_reserve(reserve);
        board.set_first_placement_done(block_done);
        if let Some(t) = tiger {
            board.place_piece(t, Side::Tiger);
        }
        board
    }

    /// Plain minimax without pruning or caching
    fn full_width(
        board: &Board,
        to_move: Side,
        depth: u8,
        perspective: Side,
        weights: &EvalWeights,
    ) -> i32 {
        if let Some(winner) = check_winner(board, to_move) {
            let score = weights.win_score + i32::from(depth);
            return if winner == perspective { score } else { -score };
        }
        if depth == 0 {
            return evaluate(board, perspective, weights);
        }
        let moves = legal_moves(board, to_move);
        if moves.is_empty() {
            return evaluate(board, perspective, weights);
        }
        let scores = moves.iter().map(|mv| {
            let child = apply_move(board, mv, to_move);
            full_width(&child, turn_after(to_move, mv, &child), depth - 1, perspective, weights)
        });
        if to_move == perspective {
            scores.max().unwrap()
        } else {
            scores.min().unwrap()
        }
    }

    /// Tiger one jump away from taking the men below the survival line
    fn tiger_wins_by_jump() -> Board {
        board_with(Some(12), &[13], 13, true)
    }

    /// Men one placement away from trapping the tiger in the corner
    fn men_trap_in_one() -> Board {
        board_with(Some(0), &[1, 2, 5, 10, 6], 16, true)
    }

    #[test]
    fn test_depth_zero_is_static_eval() {
        let weights = EvalWeights::default();
        let board = board_with(Some(12), &[7, 13], 19, true);

        for side in [Side::Men, Side::Tiger] {
            let shared = Arc::new(SharedState {
                zobrist: ZobristTable::new(),
                tt: TranspositionTable::new(1),
                weights: weights.clone(),
            });
            let mut worker = Worker::new(shared, side);
            let score = worker.minimax(&board, Side::Tiger, 0, -INF, INF);
            assert_eq!(score, evaluate(&board, side, &weights));
            assert_eq!(worker.nodes, 1);
            assert_eq!(worker.stats.tt_probes, 0);
        }
    }

    #[test]
    fn test_search_maximizing_flag_sets_perspective() {
        let s = searcher();
        let board = board_with(Some(12), &[7, 13], 19, true);
        let weights = EvalWeights::default();

        assert_eq!(
            s.search(&board, Side::Tiger, 0, -INF, INF, true),
            evaluate(&board, Side::Tiger, &weights)
        );
        assert_eq!(
            s.search(&board, Side::Tiger, 0, -INF, INF, false),
            evaluate(&board, Side::Men, &weights)
        );
    }

    #[test]
    fn test_terminal_beats_depth_zero() {
        let s = searcher();
        let board = board_with(Some(12), &[], 13, true);
        assert_eq!(s.search(&board, Side::Men, 0, -INF, INF, true), -100_000);
        assert_eq!(s.search(&board, Side::Tiger, 2, -INF, INF, true), 100_002);
    }

    #[test]
    fn test_pruning_matches_full_width() {
        let weights = EvalWeights::default();
        let positions = [
            (Board::new(), Side::Men, 2),
            (board_with(Some(12), &[7, 13, 17], 18, true), Side::Tiger, 3),
            (board_with(Some(12), &[7, 13, 17], 18, true), Side::Men, 3),
            (men_trap_in_one(), Side::Men, 2),
            (board_with(None, &[6, 7, 8, 11, 12, 13, 16, 17, 18], 12, true), Side::Tiger, 2),
        ];

        for (board, to_move, depth) in positions {
            for perspective in [Side::Men, Side::Tiger] {
                let s = searcher();
                let maximizing = to_move == perspective;
                let pruned = s.search(&board, to_move, depth, -INF, INF, maximizing);
                let expected = full_width(&board, to_move, depth, perspective, &weights);
                assert_eq!(pruned, expected, "{to_move:?} depth {depth} for {perspective:?}");

                // Warm table gives the same answer
                let again = s.search(&board, to_move, depth, -INF, INF, maximizing);
                assert_eq!(again, expected);
            }
        }
    }

    #[test]
    fn test_pruning_matches_full_width_on_playouts() {
        let weights = EvalWeights::default();
        let mut rng = Lcg::new(0xA1FA_BE7A);
        let mut checked = 0;

        for _ in 0..12 {
            let game = random_game(&mut rng, 120);
            if game.is_empty() {
                continue;
            }
            for _ in 0..2 {
                let ply = &game[rng.below(game.len())];
                let (board, to_move) = (ply.before, ply.side);

                for perspective in [Side::Men, Side::Tiger] {
                    let maximizing = to_move == perspective;
                    let pruned = searcher().search(&board, to_move, 3, -INF, INF, maximizing);
                    let expected = full_width(&board, to_move, 3, perspective, &weights);
                    assert_eq!(pruned, expected, "{to_move:?} to move, {perspective:?} view, after {}", ply.mv);
                }

                let single = searcher().best_move(&board, to_move, 3);
                let parallel = Searcher::with_threads(1, 4, EvalWeights::default()).best_move(&board, to_move, 3);
                assert_eq!(single.best_move, parallel.best_move);
                assert_eq!(single.score, parallel.score);
                checked += 1;
            }
        }

        assert!(checked >= 20, "only {checked} positions checked");
    }

    #[test]
    fn test_best_move_deterministic() {
        let board = board_with(Some(12), &[7, 13, 17, 11], 17, true);
        let first = searcher().best_move(&board, Side::Tiger, 3);
        let s = searcher();
        let second = s.best_move(&board, Side::Tiger, 3);
        let third = s.best_move(&board, Side::Tiger, 3);

        assert_eq!(first.best_move, second.best_move);
        assert_eq!(first.score, second.score);
        assert_eq!(second.best_move, third.best_move);
        assert_eq!(second.score, third.score);
    }

    #[test]
    fn test_tiger_finds_winning_jump() {
        let result = searcher().best_move(&tiger_wins_by_jump(), Side::Tiger, 2);
        assert_eq!(
            result.best_move,
            Some(Move::Jump { from: 12, landing: 14, captured: vec![13] })
        );
        // Win one ply in, one ply of depth left
        assert_eq!(result.score, 100_001);
    }

    #[test]
    fn test_men_find_trapping_placement() {
        let result = searcher().best_move(&men_trap_in_one(), Side::Men, 1);
        assert_eq!(result.best_move, Some(Move::PlaceSingle { target: 12 }));
        assert_eq!(result.score, 100_000);
    }

    #[test]
    fn test_best_move_on_finished_game() {
        let board = board_with(Some(12), &[], 13, true);
        let result = searcher().best_move(&board, Side::Men, 3);
        assert!(result.best_move.is_none());
        assert_eq!(result.score, -100_003);

        let result = searcher().best_move(&board, Side::Tiger, 3);
        assert_eq!(result.score, 100_003);
    }

    #[test]
    fn test_parallel_matches_single_thread() {
        let board = board_with(Some(12), &[7, 13, 17, 11, 3], 16, true);
        let single = searcher().best_move(&board, Side::Tiger, 3);
        let parallel = Searcher::with_threads(1, 4, EvalWeights::default())
            .best_move(&board, Side::Tiger, 3);

        assert_eq!(single.best_move, parallel.best_move);
        assert_eq!(single.score, parallel.score);
    }

    #[test]
    fn test_order_moves() {
        let moves = vec![
            Move::Relocate { from: 12, to: 11 },
            Move::Jump { from: 12, landing: 14, captured: vec![13] },
            Move::Jump { from: 12, landing: 2, captured: vec![7] },
            Move::Relocate { from: 12, to: 16 },
        ];
        assert_eq!(order_moves(&moves, None), vec![1, 2, 0, 3]);
        assert_eq!(order_moves(&moves, Some(3)), vec![3, 1, 2, 0]);
    }

    #[test]
    fn test_prefer_root_tie_break() {
        assert_eq!(prefer_root((3, 10), (1, 10)), (1, 10));
        assert_eq!(prefer_root((1, 10), (3, 10)), (1, 10));
        assert_eq!(prefer_root((1, 10), (3, 11)), (3, 11));
    }

    #[test]
    fn test_tt_used_and_cleared() {
        let s = searcher();
        let board = board_with(Some(12), &[7, 13, 17], 18, true);
        let _ = s.best_move(&board, Side::Tiger, 3);
        assert!(s.tt_stats().used > 0);

        s.clear_tt();
        assert_eq!(s.tt_stats().used, 0);
    }
}
