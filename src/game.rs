//! Game session: live board, turn order, winner and undo history
//!
//! The session is the only mutable game state. Every accepted move pushes
//! a snapshot first, so `undo` is a pop and never replays moves.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::{graph, is_valid_node, Board, Cell, Node, Side};
use crate::error::{GameError, Result};
use crate::rules::{
    apply_move, best_jump_to, block_move, check_winner, is_block_turn, legal_moves, turn_after,
    Move, Phase,
};

/// Snapshot taken before a move was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub board: Board,
    /// Side that was about to move
    pub turn: Side,
    /// When the move was played (absent in some older saves)
    pub timestamp: Option<DateTime<Local>>,
}

/// What a click on the board did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Played(Move),
    /// A man was picked up for relocation
    Selected(Node),
    Deselected,
    /// Nothing legal happens on that node
    Ignored,
}

/// Summary of a finished game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub winner: Side,
    pub total_moves: usize,
    pub men_on_board: u8,
    pub men_captured: u8,
    pub finished_at: DateTime<Local>,
}

/// A game in progress.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    to_move: Side,
    winner: Option<Side>,
    history: Vec<HistoryEntry>,
    selected: Option<Node>,
}

impl GameSession {
    /// Fresh game: men to move, 21 in reserve, no tiger.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Side::Men,
            winner: None,
            history: Vec::new(),
            selected: None,
        }
    }

    /// Rebuild a session from stored parts. The winner is recomputed.
    pub fn from_parts(
        board: Board,
        to_move: Side,
        history: Vec<HistoryEntry>,
        selected: Option<Node>,
    ) -> Result<Self> {
        if let Some(node) = selected {
            if !is_valid_node(node) || board.get(node) != Cell::Men {
                return Err(GameError::malformed(format!(
                    "selected node {node} does not hold a man"
                )));
            }
        }
        Ok(Self {
            board,
            to_move,
            winner: check_winner(&board, to_move),
            history,
            selected,
        })
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn to_move(&self) -> Side {
        self.to_move
    }

    #[inline]
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn phase(&self) -> Phase {
        Phase::of(&self.board, self.to_move)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Man picked up for relocation, if any
    pub fn selected(&self) -> Option<Node> {
        self.selected
    }

    /// Legal moves for the side to move (empty once the game is over).
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_over() {
            Vec::new()
        } else {
            legal_moves(&self.board, self.to_move)
        }
    }

    /// Play a move for the side to move.
    ///
    /// Rejected moves leave the session untouched.
    pub fn play(&mut self, mv: &Move) -> Result<()> {
        if let Some(winner) = self.winner {
            return Err(GameError::GameOver {
                winner: winner.name(),
            });
        }
        if !legal_moves(&self.board, self.to_move).contains(mv) {
            return Err(GameError::invalid_move(format!(
                "{mv} is not legal for {}",
                self.to_move.name()
            )));
        }

        self.history.push(HistoryEntry {
            board: self.board,
            turn: self.to_move,
            timestamp: Some(Local::now()),
        });

        let side = self.to_move;
        self.board = apply_move(&self.board, mv, side);
        self.to_move = turn_after(side, mv, &self.board);
        self.selected = None;
        self.winner = check_winner(&self.board, self.to_move);

        if let Some(winner) = self.winner {
            info!(
                winner = winner.name(),
                moves = self.history.len(),
                captured = self.board.men_captured(),
                "game over"
            );
        }
        Ok(())
    }

    /// Take back the last move. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.pop() else {
            return false;
        };
        self.board = entry.board;
        self.to_move = entry.turn;
        self.winner = check_winner(&self.board, self.to_move);
        self.selected = None;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// The move a click on `node` would play, ignoring selection changes.
    pub fn resolve_click(&self, node: Node) -> Option<Move> {
        if self.is_over() || !is_valid_node(node) {
            return None;
        }
        let board = &self.board;

        match self.to_move {
            Side::Men if is_block_turn(board) => block_move(board, node),
            Side::Men if board.men_reserve() > 0 => {
                board.is_empty(node).then_some(Move::PlaceSingle { target: node })
            }
            Side::Men => {
                let from = self.selected?;
                (board.is_empty(node) && graph().are_adjacent(from, node))
                    .then_some(Move::Relocate { from, to: node })
            }
            Side::Tiger => match board.tiger_pos() {
                None => board.is_empty(node).then_some(Move::PlaceSingle { target: node }),
                Some(from) => {
                    if let Some(jump) = best_jump_to(board, from, node) {
                        Some(jump.into())
                    } else {
                        (board.is_empty(node) && graph().are_adjacent(from, node))
                            .then_some(Move::Relocate { from, to: node })
                    }
                }
            },
        }
    }

    /// Handle a click on `node` for whoever is to move.
    ///
    /// In the men's movement phase a click on a man selects it (or
    /// deselects it when already selected); a click on an adjacent empty
    /// node then relocates it.
    pub fn click(&mut self, node: Node) -> Result<ClickOutcome> {
        if let Some(winner) = self.winner {
            return Err(GameError::GameOver {
                winner: winner.name(),
            });
        }
        if !is_valid_node(node) {
            return Err(GameError::invalid_move(format!("{node} is not a node")));
        }

        if self.to_move == Side::Men
            && !is_block_turn(&self.board)
            && self.board.men_reserve() == 0
        {
            if self.selected == Some(node) {
                self.selected = None;
                return Ok(ClickOutcome::Deselected);
            }
            if self.board.get(node) == Cell::Men {
                self.selected = Some(node);
                return Ok(ClickOutcome::Selected(node));
            }
        }

        match self.resolve_click(node) {
            Some(mv) => {
                self.play(&mv)?;
                Ok(ClickOutcome::Played(mv))
            }
            None => Ok(ClickOutcome::Ignored),
        }
    }

    /// Summary of the game, once it is over.
    pub fn record(&self) -> Option<GameRecord> {
        let winner = self.winner?;
        Some(GameRecord {
            winner,
            total_moves: self.history.len(),
            men_on_board: self.board.men_on_board(),
            men_captured: self.board.men_captured(),
            finished_at: Local::now(),
        })
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
