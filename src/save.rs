//! Saved game format
//!
//! Field names use the Javanese piece names: `uwong` for a man and
//! `macan` for the tiger. Cells are `null`, `"uwong"` or `"macan"`.
//!
//! ```json
//! {
//!   "boardState": [null, "uwong", ...],
//!   "turn": "macan",
//!   "uwongPiecesRemaining": 12,
//!   "macanPosition": null,
//!   "isFirstUwongTurn": false,
//!   "selectedUwongPiece": null,
//!   "winner": null,
//!   "history": [{ "board": [...], "macanPos": null, "uwongPieces": 21,
//!                 "turn": "uwong", "isFirst": true, "timestamp": "..." }],
//!   "isUwongAI": false, "isMacanAI": true, "aiDepth": 3,
//!   "playerSide": "uwong", "timestamp": "..."
//! }
//! ```

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::board::{Board, Cell, Node, Side, NODE_COUNT};
use crate::config::MAX_DEPTH;
use crate::error::{GameError, Result};
use crate::game::{GameSession, HistoryEntry};

/// Who plays which side, stored alongside the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerSettings {
    pub men_ai: bool,
    pub tiger_ai: bool,
    pub ai_depth: u8,
    /// Side the human chose on the start screen
    pub player_side: Side,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            men_ai: false,
            tiger_ai: true,
            ai_depth: 3,
            player_side: Side::Men,
        }
    }
}

/// One history snapshot in saved form.
///
/// Also accepts the generic field names `mobilePiecePos`, `reserveCount`
/// and `isFirstPlacementTurn`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedHistoryEntry {
    pub board: Vec<Option<Side>>,
    #[serde(alias = "mobilePiecePos")]
    pub macan_pos: Option<Node>,
    #[serde(alias = "reserveCount")]
    pub uwong_pieces: u8,
    pub turn: Side,
    #[serde(alias = "isFirstPlacementTurn")]
    pub is_first: bool,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Complete saved game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedGame {
    pub board_state: Vec<Option<Side>>,
    pub turn: Side,
    pub uwong_pieces_remaining: u8,
    pub macan_position: Option<Node>,
    pub is_first_uwong_turn: bool,
    #[serde(default)]
    pub selected_uwong_piece: Option<Node>,
    #[serde(default)]
    pub winner: Option<Side>,
    pub history: Vec<SavedHistoryEntry>,
    #[serde(default, rename = "isUwongAI")]
    pub is_uwong_ai: bool,
    #[serde(default = "default_true", rename = "isMacanAI")]
    pub is_macan_ai: bool,
    #[serde(default = "default_depth")]
    pub ai_depth: u8,
    #[serde(default = "default_side")]
    pub player_side: Side,
    #[serde(default)]
    pub timestamp: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_depth() -> u8 {
    PlayerSettings::default().ai_depth
}

fn default_side() -> Side {
    Side::Men
}

fn cells_to_saved(board: &Board) -> Vec<Option<Side>> {
    board.cells().iter().map(|c| c.side()).collect()
}

/// Rebuild a board from saved parts, checking every invariant.
fn board_from_saved(
    cells: &[Option<Side>],
    reserve: u8,
    tiger: Option<Node>,
    is_first: bool,
) -> Result<Board> {
    if cells.len() != NODE_COUNT {
        return Err(GameError::malformed(format!(
            "board has {} cells, expected {NODE_COUNT}",
            cells.len()
        )));
    }
    let mut array = [Cell::Empty; NODE_COUNT];
    for (slot, side) in array.iter_mut().zip(cells) {
        *slot = side.map_or(Cell::Empty, Side::piece);
    }
    Board::from_parts(array, reserve, !is_first, tiger)
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Local>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Local))
}

impl SavedHistoryEntry {
    fn from_entry(entry: &HistoryEntry) -> Self {
        Self {
            board: cells_to_saved(&entry.board),
            macan_pos: entry.board.tiger_pos(),
            uwong_pieces: entry.board.men_reserve(),
            turn: entry.turn,
            is_first: !entry.board.first_placement_done(),
            timestamp: entry.timestamp.map(|t| t.to_rfc3339()),
        }
    }

    fn to_entry(&self) -> Result<HistoryEntry> {
        Ok(HistoryEntry {
            board: board_from_saved(&self.board, self.uwong_pieces, self.macan_pos, self.is_first)?,
            turn: self.turn,
            timestamp: parse_timestamp(self.timestamp.as_deref()),
        })
    }
}

impl SavedGame {
    /// Snapshot a session together with the player settings.
    pub fn from_session(session: &GameSession, settings: &PlayerSettings) -> Self {
        let board = session.board();
        Self {
            board_state: cells_to_saved(board),
            turn: session.to_move(),
            uwong_pieces_remaining: board.men_reserve(),
            macan_position: board.tiger_pos(),
            is_first_uwong_turn: !board.first_placement_done(),
            selected_uwong_piece: session.selected(),
            winner: session.winner(),
            history: session
                .history()
                .iter()
                .map(SavedHistoryEntry::from_entry)
                .collect(),
            is_uwong_ai: settings.men_ai,
            is_macan_ai: settings.tiger_ai,
            ai_depth: settings.ai_depth,
            player_side: settings.player_side,
            timestamp: Some(Local::now().to_rfc3339()),
        }
    }

    /// Validate and rebuild the session.
    ///
    /// The stored winner is ignored in favour of re-running the win check,
    /// and the AI depth is clamped to `1..=MAX_DEPTH`.
    pub fn into_session(self) -> Result<(GameSession, PlayerSettings)> {
        let board = board_from_saved(
            &self.board_state,
            self.uwong_pieces_remaining,
            self.macan_position,
            self.is_first_uwong_turn,
        )?;
        let history = self
            .history
            .iter()
            .map(SavedHistoryEntry::to_entry)
            .collect::<Result<Vec<_>>>()?;
        let session = GameSession::from_parts(board, self.turn, history, self.selected_uwong_piece)?;

        let settings = PlayerSettings {
            men_ai: self.is_uwong_ai,
            tiger_ai: self.is_macan_ai,
            ai_depth: self.ai_depth.clamp(1, MAX_DEPTH),
            player_side: self.player_side,
        };
        Ok((session, settings))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a save. Any shape error is reported as a malformed save.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| GameError::malformed(e.to_string()))
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)
            .map_err(|e| GameError::io(format!("writing {}", path.display()), e))?;
        info!(path = %path.display(), "game saved");
        Ok(())
    }

    /// Read, parse and validate a save file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<(GameSession, PlayerSettings)> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| GameError::io(format!("reading {}", path.display()), e))?;
        let loaded = Self::from_json(&contents).and_then(Self::into_session);
        match &loaded {
            Ok((session, _)) => {
                info!(path = %path.display(), moves = session.history().len(), "game resumed")
            }
            Err(e) => warn!(path = %path.display(), error = %e, "saved game rejected"),
        }
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{block_move, Move};

    fn played_session() -> GameSession {
        let mut session = GameSession::new();
        let block = block_move(session.board(), 12).unwrap();
        session.play(&block).unwrap();
        session.play(&Move::PlaceSingle { target: 0 }).unwrap();
        session.play(&Move::PlaceSingle { target: 30 }).unwrap();
        session
    }

    #[test]
    fn test_camel_case_shape() {
        let saved = SavedGame::from_session(&played_session(), &PlayerSettings::default());
        let value: serde_json::Value = serde_json::from_str(&saved.to_json().unwrap()).unwrap();

        for key in [
            "boardState",
            "turn",
            "uwongPiecesRemaining",
            "macanPosition",
            "isFirstUwongTurn",
            "selectedUwongPiece",
            "winner",
            "history",
            "isUwongAI",
            "isMacanAI",
            "aiDepth",
            "playerSide",
            "timestamp",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["turn"], "macan");
        assert_eq!(value["macanPosition"], 0);
        assert_eq!(value["boardState"][12], "uwong");
        assert_eq!(value["boardState"][24], serde_json::Value::Null);
        assert_eq!(value["history"][0]["isFirst"], true);
        assert_eq!(value["history"][0]["uwongPieces"], 21);
    }

    #[test]
    fn test_resume_restores_session() {
        let session = played_session();
        let settings = PlayerSettings {
            men_ai: true,
            tiger_ai: false,
            ai_depth: 5,
            player_side: Side::Tiger,
        };
        let json = SavedGame::from_session(&session, &settings).to_json().unwrap();
        let (resumed, loaded_settings) = SavedGame::from_json(&json).unwrap().into_session().unwrap();

        assert_eq!(resumed.board(), session.board());
        assert_eq!(resumed.to_move(), session.to_move());
        assert_eq!(resumed.history().len(), 3);
        assert_eq!(loaded_settings, settings);
    }

    #[test]
    fn test_accepts_generic_history_names() {
        let json = format!(
            r#"{{
                "boardState": {empty},
                "turn": "uwong",
                "uwongPiecesRemaining": 21,
                "macanPosition": null,
                "isFirstUwongTurn": true,
                "history": [{{
                    "board": {empty},
                    "mobilePiecePos": null,
                    "reserveCount": 21,
                    "turn": "uwong",
                    "isFirstPlacementTurn": true,
                    "timestamp": "10:42:07 AM"
                }}]
            }}"#,
            empty = serde_json::to_string(&vec![None::<Side>; NODE_COUNT]).unwrap()
        );
        let (session, settings) = SavedGame::from_json(&json).unwrap().into_session().unwrap();
        assert_eq!(session.history().len(), 1);
        // Locale time strings are kept out of the typed timestamp
        assert_eq!(session.history()[0].timestamp, None);
        assert_eq!(settings, PlayerSettings::default());
    }

    #[test]
    fn test_ai_depth_clamped_on_resume() {
        let mut saved = SavedGame::from_session(&played_session(), &PlayerSettings::default());
        saved.ai_depth = 200;
        let json = saved.to_json().unwrap();
        let (_, settings) = SavedGame::from_json(&json).unwrap().into_session().unwrap();
        assert_eq!(settings.ai_depth, MAX_DEPTH);

        saved.ai_depth = 0;
        let (_, settings) = saved.into_session().unwrap();
        assert_eq!(settings.ai_depth, 1);
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let err = SavedGame::from_json(r#"{ "turn": "uwong" }"#).unwrap_err();
        assert!(matches!(err, GameError::MalformedSavedState { .. }));
    }

    #[test]
    fn test_rejects_bad_board() {
        let mut saved = SavedGame::from_session(&played_session(), &PlayerSettings::default());

        let mut short = saved.clone();
        short.board_state.pop();
        assert!(matches!(short.into_session(), Err(GameError::MalformedSavedState { .. })));

        let mut wrong_tiger = saved.clone();
        wrong_tiger.macan_position = Some(5);
        assert!(wrong_tiger.into_session().is_err());

        let mut off_board = saved.clone();
        off_board.macan_position = Some(40);
        assert!(off_board.into_session().is_err());

        let mut too_many = saved.clone();
        too_many.uwong_pieces_remaining = 21;
        assert!(too_many.into_session().is_err());

        saved.selected_uwong_piece = Some(0);
        assert!(saved.into_session().is_err());
    }

    #[test]
    fn test_rejects_bad_history_entry() {
        let mut saved = SavedGame::from_session(&played_session(), &PlayerSettings::default());
        saved.history[1].board.truncate(10);
        assert!(matches!(saved.into_session(), Err(GameError::MalformedSavedState { .. })));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("macanan_save_test_{}.json", std::process::id()));
        let session = played_session();
        SavedGame::from_session(&session, &PlayerSettings::default())
            .save_to(&path)
            .unwrap();

        let (loaded, _) = SavedGame::load_from(&path).unwrap();
        assert_eq!(loaded.board(), session.board());
        let _ = fs::remove_file(&path);

        assert!(matches!(SavedGame::load_from(&path), Err(GameError::Io { .. })));
    }
}
