//! Evaluation module for Macanan positions
//!
//! One heuristic formula per side, each scoring from its own perspective.
//! All weights come from an explicit [`EvalWeights`] value; there is no
//! global tuning table.

pub mod heuristic;
pub mod weights;

pub use heuristic::{evaluate, evaluate_men, evaluate_tiger};
pub use weights::{EvalWeights, MenWeights, TigerWeights, BOARD_CENTER, MAX_WIN_SCORE};
