//! Board state: cell contents plus the men's reserve and the tiger position

use super::{Cell, Node, Side, NODE_COUNT, TOTAL_MEN};
use crate::error::{GameError, Result};

/// Game board.
///
/// A plain value type: search copies it freely instead of undoing moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; NODE_COUNT],
    /// Men not yet placed
    men_reserve: u8,
    /// Set once the opening 3x3 block turn is complete
    first_placement_done: bool,
    /// Mirror of the single `Cell::Tiger` entry
    tiger: Option<Node>,
}

impl Board {
    /// Empty board, all 21 men in reserve, tiger not placed
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; NODE_COUNT],
            men_reserve: TOTAL_MEN,
            first_placement_done: false,
            tiger: None,
        }
    }

    /// Rebuild a board from raw parts, checking every invariant.
    pub fn from_parts(
        cells: [Cell; NODE_COUNT],
        men_reserve: u8,
        first_placement_done: bool,
        tiger: Option<Node>,
    ) -> Result<Self> {
        let men = cells.iter().filter(|&&c| c == Cell::Men).count();
        if men + men_reserve as usize > TOTAL_MEN as usize {
            return Err(GameError::malformed(format!(
                "{men} men on board plus {men_reserve} in reserve exceeds {TOTAL_MEN}"
            )));
        }

        let tigers: Vec<Node> = (0..NODE_COUNT).filter(|&n| cells[n] == Cell::Tiger).collect();
        match (tiger, tigers.as_slice()) {
            (None, []) => {}
            (Some(pos), [found]) if pos == *found => {}
            (Some(pos), _) if pos >= NODE_COUNT => {
                return Err(GameError::malformed(format!("tiger position {pos} is not a node")));
            }
            _ => {
                return Err(GameError::malformed(format!(
                    "tiger position {tiger:?} does not match tiger cells {tigers:?}"
                )));
            }
        }

        Ok(Self {
            cells,
            men_reserve,
            first_placement_done,
            tiger,
        })
    }

    /// Get cell content at node
    #[inline]
    pub fn get(&self, node: Node) -> Cell {
        self.cells[node]
    }

    #[inline]
    pub fn is_empty(&self, node: Node) -> bool {
        self.cells[node] == Cell::Empty
    }

    #[inline]
    pub fn cells(&self) -> &[Cell; NODE_COUNT] {
        &self.cells
    }

    /// Put a piece on an empty node (no reserve bookkeeping).
    ///
    /// Placing the tiger moves it: any previous tiger cell is cleared.
    pub fn place_piece(&mut self, node: Node, side: Side) {
        debug_assert!(self.is_empty(node));
        if side == Side::Tiger {
            if let Some(old) = self.tiger.take() {
                self.cells[old] = Cell::Empty;
            }
            self.tiger = Some(node);
        }
        self.cells[node] = side.piece();
    }

    /// Clear a node
    pub fn remove_piece(&mut self, node: Node) {
        if self.cells[node] == Cell::Tiger {
            self.tiger = None;
        }
        self.cells[node] = Cell::Empty;
    }

    /// Move whatever stands on `from` to the empty node `to`
    pub fn move_piece(&mut self, from: Node, to: Node) {
        match self.cells[from].side() {
            Some(side) => {
                self.remove_piece(from);
                self.place_piece(to, side);
            }
            None => debug_assert!(false, "no piece on node {from}"),
        }
    }

    #[inline]
    pub fn men_reserve(&self) -> u8 {
        self.men_reserve
    }

    /// Take up to `count` men out of the reserve, returning how many were taken
    pub fn take_from_reserve(&mut self, count: u8) -> u8 {
        let taken = count.min(self.men_reserve);
        self.men_reserve -= taken;
        taken
    }

    /// Overwrite the reserve (used to build test and resumed positions)
    pub fn set_men_reserve(&mut self, reserve: u8) {
        debug_assert!(self.men_on_board() + reserve <= TOTAL_MEN);
        self.men_reserve = reserve;
    }

    #[inline]
    pub fn first_placement_done(&self) -> bool {
        self.first_placement_done
    }

    pub fn set_first_placement_done(&mut self, done: bool) {
        self.first_placement_done = done;
    }

    /// Node holding the tiger, if it has been dropped
    #[inline]
    pub fn tiger_pos(&self) -> Option<Node> {
        self.tiger
    }

    /// Men standing on the board
    pub fn men_on_board(&self) -> u8 {
        self.cells.iter().filter(|&&c| c == Cell::Men).count() as u8
    }

    /// Men still in play (on board + reserve)
    #[inline]
    pub fn men_total(&self) -> u8 {
        self.men_on_board() + self.men_reserve
    }

    /// Men removed by tiger jumps so far
    #[inline]
    pub fn men_captured(&self) -> u8 {
        TOTAL_MEN.saturating_sub(self.men_total())
    }

    pub fn men_positions(&self) -> impl Iterator<Item = Node> + '_ {
        (0..NODE_COUNT).filter(move |&n| self.cells[n] == Cell::Men)
    }

    pub fn empty_nodes(&self) -> impl Iterator<Item = Node> + '_ {
        (0..NODE_COUNT).filter(move |&n| self.cells[n] == Cell::Empty)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
