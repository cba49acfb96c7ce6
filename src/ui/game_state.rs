//! Game state management for the Macanan GUI

use std::fs;
use std::io::ErrorKind;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::config::{AiConfig, Config, MAX_DEPTH};
use crate::game::{ClickOutcome, GameRecord, GameSession};
use crate::rules::{block_move, is_block_turn, Move, BLOCK_ANCHORS};
use crate::save::{PlayerSettings, SavedGame};
use crate::{AIEngine, MoveResult, Node, Side};

/// AI computation state
pub enum AiState {
    Idle,
    Thinking {
        receiver: Receiver<MoveResult>,
        start_time: Instant,
    },
}

/// Move timer for tracking thinking time
pub struct MoveTimer {
    pub start_time: Option<Instant>,
    pub ai_thinking_time: Option<Duration>,
}

impl Default for MoveTimer {
    fn default() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ai_thinking_time: None,
        }
    }
}

impl MoveTimer {
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.map_or(Duration::ZERO, |t| t.elapsed())
    }
}

/// Main game state
pub struct GameState {
    pub session: GameSession,
    pub settings: PlayerSettings,
    pub last_move: Option<Move>,
    pub last_ai_result: Option<MoveResult>,
    pub ai_state: AiState,
    pub move_timer: MoveTimer,
    pub message: Option<String>,
    /// Finished games this run
    pub records: Vec<GameRecord>,
    /// A save file was found at startup and not yet resumed or dismissed
    pub resume_available: bool,
    engine: Arc<AIEngine>,
    config: Config,
}

impl GameState {
    pub fn new(config: Config) -> Self {
        let settings = PlayerSettings {
            ai_depth: config.ai.depth,
            ..PlayerSettings::default()
        };
        Self {
            session: GameSession::new(),
            settings,
            last_move: None,
            last_ai_result: None,
            ai_state: AiState::Idle,
            move_timer: MoveTimer::default(),
            message: None,
            records: Vec::new(),
            resume_available: config.save_path.exists(),
            engine: Arc::new(AIEngine::with_config(config.ai.clone())),
            config,
        }
    }

    /// Start over with the same players
    pub fn reset(&mut self) {
        self.session.reset();
        self.last_move = None;
        self.last_ai_result = None;
        self.ai_state = AiState::Idle;
        self.move_timer = MoveTimer::default();
        self.message = None;
        self.engine.clear_cache();
        self.discard_save();
    }

    /// Human plays `side`, the AI plays the other
    pub fn set_player_side(&mut self, side: Side) {
        self.settings.player_side = side;
        self.settings.men_ai = side != Side::Men;
        self.settings.tiger_ai = side != Side::Tiger;
        self.ai_state = AiState::Idle;
    }

    /// Choose which sides the AI plays; cancels any search in flight
    pub fn set_ai_players(&mut self, men_ai: bool, tiger_ai: bool) {
        self.settings.men_ai = men_ai;
        self.settings.tiger_ai = tiger_ai;
        self.ai_state = AiState::Idle;
    }

    /// Change the AI search depth, rebuilding the engine
    pub fn set_ai_depth(&mut self, depth: u8) {
        if depth == self.settings.ai_depth {
            return;
        }
        self.settings.ai_depth = depth.clamp(1, MAX_DEPTH);
        self.rebuild_engine();
    }

    fn rebuild_engine(&mut self) {
        let ai = AiConfig {
            depth: self.settings.ai_depth,
            ..self.config.ai.clone()
        };
        self.engine = Arc::new(AIEngine::with_config(ai));
    }

    pub fn is_ai_side(&self, side: Side) -> bool {
        match side {
            Side::Men => self.settings.men_ai,
            Side::Tiger => self.settings.tiger_ai,
        }
    }

    /// Check if it's a human's turn
    pub fn is_human_turn(&self) -> bool {
        !self.is_ai_side(self.session.to_move())
    }

    /// Check if it's the AI's turn
    pub fn is_ai_turn(&self) -> bool {
        !self.session.is_over() && self.is_ai_side(self.session.to_move())
    }

    /// Check if AI is currently thinking
    pub fn is_ai_thinking(&self) -> bool {
        matches!(self.ai_state, AiState::Thinking { .. })
    }

    /// Nodes the human can click to make progress this turn
    pub fn highlighted_nodes(&self) -> Vec<Node> {
        if self.session.is_over() || !self.is_human_turn() {
            return Vec::new();
        }
        let board = self.session.board();
        if self.session.to_move() == Side::Men && is_block_turn(board) {
            return BLOCK_ANCHORS
                .iter()
                .copied()
                .filter(|&a| block_move(board, a).is_some())
                .collect();
        }

        let selected = self.session.selected();
        let mut nodes: Vec<Node> = self
            .session
            .legal_moves()
            .iter()
            .filter(|mv| match mv {
                Move::Relocate { from, .. } if self.session.to_move() == Side::Men => {
                    selected == Some(*from)
                }
                _ => true,
            })
            .filter_map(Move::target)
            .collect();
        nodes.sort_unstable();
        nodes.dedup();
        nodes
    }

    /// Handle a board click from the human player
    pub fn handle_click(&mut self, node: Node) {
        if self.is_ai_thinking() {
            self.message = Some("AI is thinking".to_string());
            return;
        }
        if !self.is_human_turn() {
            self.message = Some("Not your turn".to_string());
            return;
        }

        match self.session.click(node) {
            Ok(ClickOutcome::Played(mv)) => self.after_move(mv),
            Ok(ClickOutcome::Selected(_)) | Ok(ClickOutcome::Deselected) => self.message = None,
            Ok(ClickOutcome::Ignored) => {}
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    /// Bookkeeping after any accepted move
    fn after_move(&mut self, mv: Move) {
        self.last_move = Some(mv);
        self.message = None;
        self.move_timer.start();

        if let Some(record) = self.session.record() {
            self.records.push(record);
        }
        self.autosave();
    }

    /// Start AI thinking on a worker thread
    pub fn start_ai_thinking(&mut self) {
        if !self.is_ai_turn() || self.is_ai_thinking() {
            return;
        }

        let board = *self.session.board();
        let side = self.session.to_move();
        let engine = Arc::clone(&self.engine);
        let delay = Duration::from_millis(self.config.ai.thinking_delay_ms);

        let (tx, rx) = channel();

        thread::spawn(move || {
            let start = Instant::now();
            let result = engine.get_move_with_stats(&board, side);
            // Artificial thinking delay
            if let Some(rest) = delay.checked_sub(start.elapsed()) {
                thread::sleep(rest);
            }
            let _ = tx.send(result);
        });

        self.ai_state = AiState::Thinking {
            receiver: rx,
            start_time: Instant::now(),
        };
    }

    /// Check if AI has finished thinking
    pub fn check_ai_result(&mut self) {
        let result = match &self.ai_state {
            AiState::Thinking {
                receiver,
                start_time,
            } => match receiver.try_recv() {
                Ok(result) => Some((result, start_time.elapsed())),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => {
                    self.ai_state = AiState::Idle;
                    self.message = Some("AI error".to_string());
                    return;
                }
            },
            AiState::Idle => None,
        };

        let Some((move_result, elapsed)) = result else {
            return;
        };
        self.ai_state = AiState::Idle;
        self.move_timer.ai_thinking_time = Some(elapsed);
        self.last_ai_result = Some(move_result.clone());

        match move_result.best_move {
            Some(mv) => match self.session.play(&mv) {
                Ok(()) => self.after_move(mv),
                Err(e) => {
                    warn!(error = %e, "AI produced an unplayable move");
                    self.message = Some(e.to_string());
                }
            },
            None => self.message = Some("AI could not find a move".to_string()),
        }
    }

    /// Get AI thinking elapsed time
    pub fn ai_thinking_elapsed(&self) -> Option<Duration> {
        match &self.ai_state {
            AiState::Thinking { start_time, .. } => Some(start_time.elapsed()),
            AiState::Idle => None,
        }
    }

    /// Undo back to the last position where a human was to move.
    ///
    /// With the AI on both sides a single move is taken back.
    pub fn undo(&mut self) {
        if self.is_ai_thinking() || !self.session.undo() {
            return;
        }
        let has_human = !self.settings.men_ai || !self.settings.tiger_ai;
        while has_human && self.is_ai_side(self.session.to_move()) && self.session.undo() {}

        self.last_move = None;
        self.message = None;
        self.move_timer.start();
        self.autosave();
    }

    /// Replace the current game with the saved one
    pub fn resume(&mut self) {
        self.resume_available = false;
        match SavedGame::load_from(&self.config.save_path) {
            Ok((session, settings)) => {
                self.session = session;
                self.settings = settings;
                self.rebuild_engine();
                self.last_move = None;
                self.ai_state = AiState::Idle;
                self.message = Some("Game resumed".to_string());
            }
            Err(e) => {
                self.message = Some(format!("Could not resume: {e}"));
                self.discard_save();
            }
        }
    }

    /// Forget the saved game offered at startup
    pub fn dismiss_resume(&mut self) {
        self.resume_available = false;
        self.discard_save();
    }

    fn autosave(&mut self) {
        let saved = SavedGame::from_session(&self.session, &self.settings);
        if let Err(e) = saved.save_to(&self.config.save_path) {
            warn!(error = %e, "autosave failed");
        }
    }

    fn discard_save(&self) {
        match fs::remove_file(&self.config.save_path) {
            Ok(()) => info!(path = %self.config.save_path.display(), "saved game removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, "could not remove saved game"),
        }
    }
}
