//! Tunable evaluation weights
//!
//! Defaults reproduce the classic Macanan strategy tables. Every field is
//! optional when deserializing, so a config file only needs to list the
//! weights it overrides.

use serde::{Deserialize, Serialize};

use crate::board::{is_valid_node, Node};
use crate::error::{GameError, Result};

/// Largest win score the transposition table can store with depth bonus
pub const MAX_WIN_SCORE: i32 = 1_000_000;

/// Screen coordinate of the board center (node 12)
pub const BOARD_CENTER: (i32, i32) = (350, 250);

/// Weights for the tiger's evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TigerWeights {
    /// Per man captured
    pub capture: i32,
    /// Per legal tiger move
    pub mobility: i32,
    /// Per unit of distance from the board center (subtracted)
    pub centrality: i32,
    /// Bonus for standing on specific nodes
    pub strategic_nodes: Vec<(Node, i32)>,
    /// Applied when the tiger has no legal move
    pub danger: i32,
}

impl Default for TigerWeights {
    fn default() -> Self {
        Self {
            capture: 500,
            mobility: 10,
            centrality: 5,
            strategic_nodes: vec![(12, 50), (10, 30), (14, 30), (2, 20), (22, 20)],
            danger: -100,
        }
    }
}

/// Weights for the men's evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenWeights {
    /// Per man on a defensive cluster node
    pub defense_cluster: i32,
    pub cluster_nodes: Vec<Node>,
    /// Per legal tiger move (escape route)
    pub tiger_mobility: i32,
    /// Per man adjacent to the tiger
    pub surrounding: i32,
    /// Flat bonus while the men stay at or above the survival threshold
    pub conservation: i32,
    /// Per man on a central node
    pub central_control: i32,
    pub central_nodes: Vec<Node>,
    /// Per line next to the tiger that starts with a man and offers no jump
    pub blocking: i32,
    /// Per jump currently open to the tiger
    pub danger: i32,
}

impl Default for MenWeights {
    fn default() -> Self {
        Self {
            defense_cluster: 200,
            cluster_nodes: vec![12, 7, 11, 16, 17],
            tiger_mobility: -50,
            surrounding: 100,
            conservation: 300,
            central_control: 20,
            central_nodes: vec![6, 7, 8, 11, 12, 13, 16, 17, 18],
            blocking: 150,
            danger: -500,
        }
    }
}

/// Complete weight set passed to the evaluation and the search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    pub tiger: TigerWeights,
    pub men: MenWeights,
    /// Score of a decided game; dominates every heuristic term
    pub win_score: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            tiger: TigerWeights::default(),
            men: MenWeights::default(),
            win_score: 100_000,
        }
    }
}

impl EvalWeights {
    /// Reject node ids outside the board and a win score too small to
    /// dominate the heuristics.
    pub fn validate(&self) -> Result<()> {
        let nodes = self
            .tiger
            .strategic_nodes
            .iter()
            .map(|&(n, _)| n)
            .chain(self.men.cluster_nodes.iter().copied())
            .chain(self.men.central_nodes.iter().copied());
        for node in nodes {
            if !is_valid_node(node) {
                return Err(GameError::Config(format!("weight table names unknown node {node}")));
            }
        }
        if self.win_score < 10_000 {
            return Err(GameError::Config(format!(
                "win_score {} is too small to dominate heuristic scores",
                self.win_score
            )));
        }
        if self.win_score > MAX_WIN_SCORE {
            return Err(GameError::Config(format!(
                "win_score {} exceeds the cacheable maximum {MAX_WIN_SCORE}",
                self.win_score
            )));
        }
        Ok(())
    }
}
