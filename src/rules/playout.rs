//! Seeded random playouts for tests over reachable positions

use crate::board::{Board, Side};

use super::{apply_move, check_winner, legal_moves, turn_after, Move};

/// Linear congruential generator with Knuth's MMIX constants
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Uniform-enough index in `0..n`
    pub fn below(&mut self, n: usize) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        ((self.0 >> 33) as usize) % n
    }
}

/// One played move with the positions around it
pub struct Ply {
    pub before: Board,
    pub side: Side,
    pub mv: Move,
    pub after: Board,
}

/// Random legal moves from the opening until someone wins or `max_plies` is hit.
pub fn random_game(rng: &mut Lcg, max_plies: usize) -> Vec<Ply> {
    let mut board = Board::new();
    let mut side = Side::Men;
    let mut plies = Vec::new();

    while plies.len() < max_plies && check_winner(&board, side).is_none() {
        let moves = legal_moves(&board, side);
        if moves.is_empty() {
            break;
        }
        let mv = moves[rng.below(moves.len())].clone();
        let after = apply_move(&board, &mv, side);
        let next = turn_after(side, &mv, &after);
        plies.push(Ply {
            before: board,
            side,
            mv,
            after,
        });
        board = after;
        side = next;
    }

    plies
}
