//! Heuristic evaluation function for Macanan board positions
//!
//! This module provides the leaf evaluation for the minimax search. The two
//! sides have different goals, so each gets its own formula:
//! - Tiger: captures, mobility, central and strategic squares
//! - Men: survival, hemming the tiger in, cluster and center control,
//!   and not leaving jumpable lines next to the tiger

use crate::board::{graph, Board, Cell, Direction, Node, Side};
use crate::rules::{jump_in_direction, men_eliminated, tiger_mobility};

use super::weights::{MenWeights, TigerWeights, BOARD_CENTER};
use super::EvalWeights;

/// Evaluate the board from the perspective of `side`.
///
/// Higher is better for `side`. The formulas are not symmetric, so
/// `evaluate(board, Men)` is not the negation of `evaluate(board, Tiger)`.
///
/// # Arguments
/// * `board` - The current board state
/// * `side` - The side to evaluate for
/// * `weights` - Weight tables for both sides
#[must_use]
pub fn evaluate(board: &Board, side: Side, weights: &EvalWeights) -> i32 {
    match side {
        Side::Tiger => evaluate_tiger(board, &weights.tiger),
        Side::Men => evaluate_men(board, &weights.men),
    }
}

/// Tiger score: captures and mobility, plus where it stands.
#[must_use]
pub fn evaluate_tiger(board: &Board, w: &TigerWeights) -> i32 {
    let captured = board.men_captured() as i32;
    let mobility = tiger_mobility(board) as i32;

    let mut score = captured * w.capture + mobility * w.mobility;

    match board.tiger_pos() {
        Some(pos) => {
            score += node_value(pos, w);
            if mobility == 0 {
                score += w.danger;
            }
        }
        // Not dropped yet: credit the best square still available
        None => score += best_drop_value(board, w),
    }

    score
}

/// Men score: stay alive, box the tiger in, hold the middle.
#[must_use]
pub fn evaluate_men(board: &Board, w: &MenWeights) -> i32 {
    let mut score = 0;

    if !men_eliminated(board.men_total()) {
        score += w.conservation;
    }

    score += count_men_on(board, &w.cluster_nodes) * w.defense_cluster;
    score += count_men_on(board, &w.central_nodes) * w.central_control;

    // Mobility only counts once the tiger is on the board
    if let Some(tiger) = board.tiger_pos() {
        score += tiger_mobility(board) as i32 * w.tiger_mobility;
        let neighbours = graph()
            .neighbors(tiger)
            .iter()
            .filter(|&&n| board.get(n) == Cell::Men)
            .count() as i32;
        score += neighbours * w.surrounding;
        score += line_safety(board, tiger, w);
    }

    score
}

/// Strategic bonus minus weighted distance from the center
fn node_value(node: Node, w: &TigerWeights) -> i32 {
    let strategic = w
        .strategic_nodes
        .iter()
        .find(|&&(n, _)| n == node)
        .map_or(0, |&(_, bonus)| bonus);
    strategic - centrality_penalty(node, w.centrality)
}

fn centrality_penalty(node: Node, weight: i32) -> i32 {
    let (x, y) = graph().position(node);
    let dx = f64::from(x - BOARD_CENTER.0);
    let dy = f64::from(y - BOARD_CENTER.1);
    (dx.hypot(dy) * f64::from(weight)).round() as i32
}

fn best_drop_value(board: &Board, w: &TigerWeights) -> i32 {
    board
        .empty_nodes()
        .map(|n| node_value(n, w))
        .max()
        .unwrap_or(0)
}

fn count_men_on(board: &Board, nodes: &[Node]) -> i32 {
    nodes.iter().filter(|&&n| board.get(n) == Cell::Men).count() as i32
}

/// Penalize every open jump next to the tiger and reward guarded lines.
fn line_safety(board: &Board, tiger: Node, w: &MenWeights) -> i32 {
    let g = graph();
    let mut score = 0;

    for dir in Direction::ALL {
        let Some(next) = g.direction_to(tiger, dir) else {
            continue;
        };
        if board.get(next) != Cell::Men {
            continue;
        }
        if jump_in_direction(board, tiger, dir).is_some() {
            score += w.danger;
        } else {
            score += w.blocking;
        }
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(tiger: Option<Node>, men: &[Node], reserve: u8) -> Board {
        let mut board = Board::new();
        for &m in men {
            board.place_piece(m, Side::Men);
        }
        board.set_men_reserve(reserve);
        if let Some(t) = tiger {
            board.place_piece(t, Side::Tiger);
        }
        board
    }

    #[test]
    fn test_centrality() {
        assert_eq!(centrality_penalty(12, 5), 0);
        // Node 13 is 100 units from center
        assert_eq!(centrality_penalty(13, 5), 500);
        // Node 6 is sqrt(2) * 100 away
        assert_eq!(centrality_penalty(6, 1), 141);
    }

    #[test]
    fn test_tiger_prefers_center() {
        let w = TigerWeights::default();
        let center = board_with(Some(12), &[], 21);
        let corner = board_with(Some(0), &[], 21);
        assert!(evaluate_tiger(&center, &w) > evaluate_tiger(&corner, &w));
    }

    #[test]
    fn test_tiger_rewards_captures() {
        let w = TigerWeights::default();
        let before = board_with(Some(12), &[0], 20);
        let after = board_with(Some(12), &[], 20);
        assert_eq!(
            evaluate_tiger(&after, &w) - evaluate_tiger(&before, &w),
            w.capture
        );
    }

    #[test]
    fn test_trapped_tiger_penalized() {
        let w = TigerWeights::default();
        let board = board_with(Some(0), &[1, 2, 5, 10, 6, 12], 15);
        let score = evaluate_tiger(&board, &w);
        let expected = node_value(0, &w) + w.danger;
        assert_eq!(score, expected);
    }

    #[test]
    fn test_unplaced_tiger_uses_best_drop() {
        let w = TigerWeights::default();
        let board = Board::new();
        // All 37 nodes free to drop on, best is the center with bonus 50
        assert_eq!(evaluate_tiger(&board, &w), 37 * w.mobility + 50);
    }

    #[test]
    fn test_men_penalized_for_open_jump() {
        let w = MenWeights::default();
        // Man on 13 can be jumped from 12 into 14
        let open = board_with(Some(12), &[13], 20);
        // Pair 13-14 cannot be jumped
        let guarded = board_with(Some(12), &[13, 14], 19);
        assert!(evaluate_men(&guarded, &w) > evaluate_men(&open, &w));
        assert_eq!(line_safety(&open, 12, &w), w.danger);
        assert_eq!(line_safety(&guarded, 12, &w), w.blocking);
    }

    #[test]
    fn test_men_lose_conservation_below_threshold() {
        let w = MenWeights::default();
        let alive = board_with(None, &[], 14);
        let dead = board_with(None, &[], 13);
        assert_eq!(evaluate_men(&alive, &w) - evaluate_men(&dead, &w), w.conservation);
    }

    #[test]
    fn test_men_placement_ignores_free_cells() {
        let w = MenWeights::default();
        // Without a tiger, free cells off the cluster and center change nothing
        let early = board_with(None, &[0], 20);
        let later = board_with(None, &[0, 1, 3, 4, 20], 16);
        assert_eq!(evaluate_men(&early, &w), evaluate_men(&later, &w));
        assert_eq!(evaluate_men(&early, &w), w.conservation);
    }

    #[test]
    fn test_evaluate_dispatch() {
        let weights = EvalWeights::default();
        let board = board_with(Some(12), &[7], 20);
        assert_eq!(evaluate(&board, Side::Tiger, &weights), evaluate_tiger(&board, &weights.tiger));
        assert_eq!(evaluate(&board, Side::Men, &weights), evaluate_men(&board, &weights.men));
    }
}
