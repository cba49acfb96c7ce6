//! Search module for the Macanan AI
//!
//! Contains:
//! - Zobrist hashing for position identification
//! - Bounded transposition table for caching search results
//! - Minimax with alpha-beta pruning and root splitting

pub mod alphabeta;
pub mod tt;
pub mod zobrist;

pub use alphabeta::{SearchResult, SearchStats, Searcher, INF};
pub use tt::{EntryType, TTEntry, TTStats, TranspositionTable};
pub use zobrist::ZobristTable;
