//! Transposition table for caching search results
//!
//! A fixed-size, direct-mapped, lock-free table: each hash maps to one slot
//! and collisions are resolved by a depth-preferred replacement policy, so
//! memory stays bounded no matter how long a session runs. All methods
//! take `&self`, so one table can be shared by root-splitting workers.
//!
//! Entries only answer probes at the *same* remaining depth. A cached
//! score therefore always equals what a fresh fixed-depth search from that
//! node would return within the stored bound.
//!
//! # Example
//!
//! ```
//! use macanan::search::{EntryType, TranspositionTable};
//!
//! let tt = TranspositionTable::new(1); // 1 MB
//! let hash = 0x1234_5678_9ABC_DEF0;
//!
//! tt.store(hash, 3, 120, EntryType::Exact, Some(4));
//!
//! assert_eq!(tt.probe(hash, 3, -1000, 1000), Some(120));
//! assert_eq!(tt.probe(hash, 2, -1000, 1000), None);
//! assert_eq!(tt.best_index(hash), Some(4));
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Entry type for score interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// Exact score - the search completed inside the window
    Exact,
    /// Lower bound - score >= stored value (beta cutoff)
    LowerBound,
    /// Upper bound - score <= stored value (alpha fail-low)
    UpperBound,
}

/// Unpacked transposition table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    /// Remaining depth the score was searched to
    pub depth: u8,
    /// Score from the stored perspective
    pub score: i32,
    /// Type of score (exact, lower bound, upper bound)
    pub entry_type: EntryType,
    /// Index of the best move in generation order
    pub best_index: Option<u8>,
}

/// Largest score magnitude that survives packing
const SCORE_LIMIT: i32 = 1_048_575;
const SCORE_OFFSET: i64 = 1_048_576;

/// Pack an entry into a u64 for atomic storage.
///
/// Layout (41 bits used):
/// ```text
/// bits [0..7]   depth (u8)                      8 bits
/// bits [8..28]  score (i32 + 1_048_576)         21 bits
/// bits [29..30] entry_type (0=Exact,1=LB,2=UB)  2 bits
/// bits [31]     has_move                        1 bit
/// bits [32..39] best move index (u8)            8 bits
/// bits [40]     occupied marker                 1 bit
/// ```
fn pack_entry(entry: TTEntry) -> u64 {
    let d = u64::from(entry.depth);
    let clamped = entry.score.clamp(-SCORE_LIMIT, SCORE_LIMIT);
    let s = (i64::from(clamped) + SCORE_OFFSET) as u64 & 0x1F_FFFF;
    let t = match entry.entry_type {
        EntryType::Exact => 0u64,
        EntryType::LowerBound => 1u64,
        EntryType::UpperBound => 2u64,
    };
    let (has_move, idx) = match entry.best_index {
        Some(i) => (1u64, u64::from(i)),
        None => (0u64, 0u64),
    };
    d | (s << 8) | (t << 29) | (has_move << 31) | (idx << 32) | (1 << 40)
}

/// Unpack a u64 back into entry fields.
fn unpack_entry(data: u64) -> TTEntry {
    let depth = (data & 0xFF) as u8;
    let score = (((data >> 8) & 0x1F_FFFF) as i64 - SCORE_OFFSET) as i32;
    let entry_type = match (data >> 29) & 0x3 {
        0 => EntryType::Exact,
        1 => EntryType::LowerBound,
        _ => EntryType::UpperBound,
    };
    let best_index = if (data >> 31) & 1 != 0 {
        Some(((data >> 32) & 0xFF) as u8)
    } else {
        None
    };
    TTEntry {
        depth,
        score,
        entry_type,
        best_index,
    }
}

/// Lock-free bounded transposition table.
///
/// Uses the XOR trick (Hyatt 1994): each slot stores `(key, data)` where
/// `key = hash ^ data`. On probe, validity is checked via
/// `key ^ data == hash`. Torn reads from concurrent writers fail the check
/// and are treated as misses.
pub struct TranspositionTable {
    keys: Vec<AtomicU64>,
    data: Vec<AtomicU64>,
    size: usize,
}

impl TranspositionTable {
    /// Create a table of roughly `size_mb` megabytes (at least 1024 slots).
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        // Each slot = 2 x AtomicU64 = 16 bytes
        let slot_size = 16usize;
        let size = ((size_mb * 1024 * 1024) / slot_size).max(1024);

        let keys = (0..size).map(|_| AtomicU64::new(0)).collect();
        let data = (0..size).map(|_| AtomicU64::new(0)).collect();

        Self { keys, data, size }
    }

    /// Number of slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.size
    }

    /// Read the entry stored for `hash`, if the slot holds it.
    #[must_use]
    pub fn entry(&self, hash: u64) -> Option<TTEntry> {
        let idx = (hash as usize) % self.size;
        let key = self.keys[idx].load(Ordering::Relaxed);
        let raw_data = self.data[idx].load(Ordering::Relaxed);

        if raw_data == 0 || key ^ raw_data != hash {
            return None;
        }
        Some(unpack_entry(raw_data))
    }

    /// Probe the table for a usable score.
    ///
    /// Returns `Some(score)` only when an entry for `hash` was searched to
    /// exactly `depth` and its bound decides the `(alpha, beta)` window.
    #[must_use]
    pub fn probe(&self, hash: u64, depth: u8, alpha: i32, beta: i32) -> Option<i32> {
        let entry = self.entry(hash)?;
        if entry.depth != depth {
            return None;
        }
        match entry.entry_type {
            EntryType::Exact => Some(entry.score),
            EntryType::LowerBound if entry.score >= beta => Some(entry.score),
            EntryType::UpperBound if entry.score <= alpha => Some(entry.score),
            _ => None,
        }
    }

    /// Best move index from a previous search, for move ordering.
    #[must_use]
    pub fn best_index(&self, hash: u64) -> Option<usize> {
        self.entry(hash)
            .and_then(|e| e.best_index)
            .map(usize::from)
    }

    /// Store a search result.
    ///
    /// Depth-preferred replacement: a slot holding a different position is
    /// only overwritten by an equal or deeper search. Move indices that do
    /// not fit in a byte are dropped.
    pub fn store(
        &self,
        hash: u64,
        depth: u8,
        score: i32,
        entry_type: EntryType,
        best_index: Option<usize>,
    ) {
        let idx = (hash as usize) % self.size;

        let existing_data = self.data[idx].load(Ordering::Relaxed);
        let existing_key = self.keys[idx].load(Ordering::Relaxed);
        if existing_data != 0 && existing_key ^ existing_data != hash {
            let existing = unpack_entry(existing_data);
            if depth < existing.depth {
                return;
            }
        }

        let packed = pack_entry(TTEntry {
            depth,
            score,
            entry_type,
            best_index: best_index.and_then(|i| u8::try_from(i).ok()),
        });
        // Data first, then key: a concurrent reader sees either the old pair
        // or a hash mismatch.
        self.data[idx].store(packed, Ordering::Relaxed);
        self.keys[idx].store(hash ^ packed, Ordering::Relaxed);
    }

    /// Clear all entries.
    pub fn clear(&self) {
        for i in 0..self.size {
            self.keys[i].store(0, Ordering::Relaxed);
            self.data[i].store(0, Ordering::Relaxed);
        }
    }

    /// Get statistics about table usage.
    ///
    /// Approximate under concurrent access.
    #[must_use]
    pub fn stats(&self) -> TTStats {
        let used = self
            .data
            .iter()
            .filter(|d| d.load(Ordering::Relaxed) != 0)
            .count();
        TTStats {
            size: self.size,
            used,
            usage_percent: (used as f64 / self.size as f64 * 100.0) as u8,
        }
    }
}

/// Statistics about transposition table usage.
#[derive(Debug, Clone, Copy)]
pub struct TTStats {
    /// Total number of slots in the table
    pub size: usize,
    /// Number of slots currently occupied
    pub used: usize,
    /// Percentage of table in use (0-100)
    pub usage_percent: u8,
}
