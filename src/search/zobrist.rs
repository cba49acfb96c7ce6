//! Zobrist hashing for position identification
//!
//! The hash covers everything that changes legal moves or evaluation: the
//! cell contents, the men's reserve, the opening-block flag and the side to
//! move. The search perspective is mixed in separately with
//! [`ZobristTable::perspective_key`] because the same position scores
//! differently for the men and for the tiger.
//!
//! # Example
//!
//! ```
//! use macanan::board::{Board, Side};
//! use macanan::search::ZobristTable;
//!
//! let zt = ZobristTable::new();
//! let mut board = Board::new();
//! let empty = zt.hash(&board, Side::Men);
//!
//! board.place_piece(12, Side::Tiger);
//! assert_ne!(zt.hash(&board, Side::Men), empty);
//!
//! board.remove_piece(12);
//! assert_eq!(zt.hash(&board, Side::Men), empty);
//! ```

use crate::board::{Board, Cell, Side, NODE_COUNT, TOTAL_MEN};

const RESERVE_SLOTS: usize = TOTAL_MEN as usize + 1;

/// Zobrist hash table for position hashing.
///
/// Uses XOR-based hashing with precomputed random values for each
/// (node, piece) combination plus the scalar state fields.
pub struct ZobristTable {
    /// Random values for a man on each node
    men: [u64; NODE_COUNT],
    /// Random values for the tiger on each node
    tiger: [u64; NODE_COUNT],
    /// Random values for each reserve count 0..=21
    reserve: [u64; RESERVE_SLOTS],
    /// XORed once the opening block has been placed
    first_placement_done: u64,
    /// XORed when the men are to move
    men_to_move: u64,
    /// XORed when the search scores from the men's side
    men_perspective: u64,
}

impl ZobristTable {
    /// Create a new Zobrist table with deterministic random values.
    ///
    /// Uses a linear congruential generator (LCG) with a fixed seed
    /// so hashes are reproducible across runs.
    #[must_use]
    pub fn new() -> Self {
        // Constants from Knuth's MMIX LCG
        let mut seed: u64 = 0x1234_5678_9ABC_DEF0;
        let mut next_rand = || {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1);
            seed
        };

        let mut men = [0u64; NODE_COUNT];
        let mut tiger = [0u64; NODE_COUNT];
        for i in 0..NODE_COUNT {
            men[i] = next_rand();
            tiger[i] = next_rand();
        }

        let mut reserve = [0u64; RESERVE_SLOTS];
        for slot in reserve.iter_mut() {
            *slot = next_rand();
        }

        Self {
            men,
            tiger,
            reserve,
            first_placement_done: next_rand(),
            men_to_move: next_rand(),
            men_perspective: next_rand(),
        }
    }

    /// Compute the full hash for a board position.
    #[must_use]
    pub fn hash(&self, board: &Board, side_to_move: Side) -> u64 {
        let mut h = 0u64;

        for (node, cell) in board.cells().iter().enumerate() {
            match cell {
                Cell::Men => h ^= self.men[node],
                Cell::Tiger => h ^= self.tiger[node],
                Cell::Empty => {}
            }
        }

        h ^= self.reserve[(board.men_reserve() as usize).min(RESERVE_SLOTS - 1)];

        if board.first_placement_done() {
            h ^= self.first_placement_done;
        }

        if side_to_move == Side::Men {
            h ^= self.men_to_move;
        }

        h
    }

    /// Key to XOR into a position hash for the scoring side.
    #[inline]
    #[must_use]
    pub fn perspective_key(&self, perspective: Side) -> u64 {
        match perspective {
            Side::Men => self.men_perspective,
            Side::Tiger => 0,
        }
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}
