//! Capture rules: the tiger jumps over odd-length lines of men
//!
//! Pattern along any of the 8 directions: T-M-...-M-_ where the run of men
//! is unbroken and odd in length and the cell right after it is empty. The
//! whole run is captured and the tiger lands on the empty cell.

use crate::board::{graph, Board, Cell, Direction, Node};

/// A single capturing jump.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Jump {
    /// Node the tiger jumps from
    pub from: Node,
    /// Direction of the line
    pub direction: Direction,
    /// Empty node the tiger lands on
    pub landing: Node,
    /// Men removed, nearest first
    pub captured: Vec<Node>,
}

/// Find every valid jump from `from`, scanning directions in
/// `Direction::ALL` order.
///
/// # Arguments
/// * `board` - Current board state
/// * `from` - Node the tiger stands on
///
/// # Returns
/// One `Jump` per direction whose ray yields an odd, nonzero chain of men
/// followed by an empty cell.
pub fn find_jumps(board: &Board, from: Node) -> Vec<Jump> {
    Direction::ALL
        .iter()
        .filter_map(|&dir| jump_in_direction(board, from, dir))
        .collect()
}

/// Walk one ray and report the jump it allows, if any.
///
/// The walk ends at the first empty cell, at any non-man piece, or where
/// the ray leaves the board.
pub fn jump_in_direction(board: &Board, from: Node, direction: Direction) -> Option<Jump> {
    let mut captured = Vec::new();

    for node in graph().ray(from, direction) {
        match board.get(node) {
            Cell::Men => captured.push(node),
            Cell::Empty => {
                if captured.len() % 2 == 1 {
                    return Some(Jump {
                        from,
                        direction,
                        landing: node,
                        captured,
                    });
                }
                return None;
            }
            Cell::Tiger => return None,
        }
    }

    None
}

/// Check if the tiger at `from` has at least one jump.
#[inline]
pub fn has_jump(board: &Board, from: Node) -> bool {
    Direction::ALL
        .iter()
        .any(|&dir| jump_in_direction(board, from, dir).is_some())
}

/// Best jump from `from` that lands on `target`.
///
/// Used when a player only names the landing cell.
pub fn best_jump_to(board: &Board, from: Node, target: Node) -> Option<Jump> {
    pick_best_jump(find_jumps(board, from).into_iter().filter(|j| j.landing == target))
}

/// Choose among jumps that share a landing cell.
///
/// The longest chain wins. Equal lengths compare the captured node ids in
/// ascending order and keep the lexicographically smallest set, so the
/// result never depends on scan order.
pub fn pick_best_jump(candidates: impl IntoIterator<Item = Jump>) -> Option<Jump> {
    candidates.into_iter().reduce(|best, next| {
        if prefer_jump(&next, &best) {
            next
        } else {
            best
        }
    })
}

fn prefer_jump(candidate: &Jump, current: &Jump) -> bool {
    match candidate.captured.len().cmp(&current.captured.len()) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => sorted(&candidate.captured) < sorted(&current.captured),
    }
}

fn sorted(nodes: &[Node]) -> Vec<Node> {
    let mut v = nodes.to_vec();
    v.sort_unstable();
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Side;

    fn board_with(tiger: Node, men: &[Node]) -> Board {
        let mut board = Board::new();
        for &m in men {
            board.place_piece(m, Side::Men);
        }
        board.set_men_reserve(21 - men.len() as u8);
        board.place_piece(tiger, Side::Tiger);
        board
    }

    #[test]
    fn test_single_man_jump() {
        // T(10) M(11) _(12)
        let board = board_with(10, &[11]);
        let jumps = find_jumps(&board, 10);
        assert_eq!(jumps.len(), 1);
        assert_eq!(jumps[0].landing, 12);
        assert_eq!(jumps[0].captured, vec![11]);
        assert_eq!(jumps[0].direction, Direction::East);
    }

    #[test]
    fn test_chain_of_three() {
        // T(10) M(11) M(12) M(13) _(14)
        let board = board_with(10, &[11, 12, 13]);
        let jumps = find_jumps(&board, 10);
        assert_eq!(jumps.len(), 1);
        assert_eq!(jumps[0].landing, 14);
        assert_eq!(jumps[0].captured.len(), 3);
    }

    #[test]
    fn test_even_chain_blocked() {
        // T(10) M(11) M(12) _(13): two men cannot be jumped
        let board = board_with(10, &[11, 12]);
        assert!(find_jumps(&board, 10).is_empty());
        assert!(!has_jump(&board, 10));
    }

    #[test]
    fn test_chain_into_triangle() {
        // 12 -> 13 -> 14 -> 32 -> 35, five men then nothing beyond
        let board = board_with(11, &[12, 13, 14, 32, 35]);
        assert!(jump_in_direction(&board, 11, Direction::East).is_none());

        // Three men, then the empty triangle node
        let board = board_with(11, &[12, 13, 14]);
        let jump = jump_in_direction(&board, 11, Direction::East).unwrap();
        assert_eq!(jump.landing, 32);
        assert_eq!(jump.captured, vec![12, 13, 14]);
    }

    #[test]
    fn test_chain_reaching_board_edge() {
        // Chain runs off the end of the line: no landing
        let board = board_with(12, &[13, 14, 32, 35]);
        assert!(jump_in_direction(&board, 12, Direction::East).is_none());

        let board = board_with(12, &[13]);
        let jump = jump_in_direction(&board, 12, Direction::East).unwrap();
        assert_eq!(jump.landing, 14);
    }

    #[test]
    fn test_jump_from_triangle_tip() {
        // 28 -> 25 -> 10 along the diagonal
        let board = board_with(28, &[25]);
        let jump = jump_in_direction(&board, 28, Direction::SouthEast).unwrap();
        assert_eq!(jump.landing, 10);
    }

    #[test]
    fn test_multiple_directions() {
        // Tiger in the center, single men on three sides
        let board = board_with(12, &[13, 7, 16]);
        let jumps = find_jumps(&board, 12);
        let landings: Vec<Node> = jumps.iter().map(|j| j.landing).collect();
        // Scan order: E, W, S, N, SE, NW, SW, NE
        assert_eq!(landings, vec![14, 2, 20]);
    }

    #[test]
    fn test_adjacent_empty_is_not_jump() {
        let board = board_with(12, &[]);
        assert!(find_jumps(&board, 12).is_empty());
    }

    #[test]
    fn test_best_jump_to() {
        let board = board_with(10, &[11, 12, 13]);
        assert_eq!(best_jump_to(&board, 10, 14).map(|j| j.captured.len()), Some(3));
        assert!(best_jump_to(&board, 10, 12).is_none());
    }

    #[test]
    fn test_pick_best_jump_prefers_longer_chain() {
        let short = Jump { from: 0, direction: Direction::East, landing: 9, captured: vec![1] };
        let long = Jump { from: 0, direction: Direction::South, landing: 9, captured: vec![5, 6, 7] };
        let best = pick_best_jump(vec![short, long.clone()]).unwrap();
        assert_eq!(best, long);
    }

    #[test]
    fn test_pick_best_jump_tie_is_order_independent() {
        let a = Jump { from: 0, direction: Direction::East, landing: 9, captured: vec![4] };
        let b = Jump { from: 0, direction: Direction::South, landing: 9, captured: vec![2] };
        let first = pick_best_jump(vec![a.clone(), b.clone()]).unwrap();
        let second = pick_best_jump(vec![b.clone(), a]).unwrap();
        assert_eq!(first, b);
        assert_eq!(second, b);
    }
}
