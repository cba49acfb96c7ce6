//! GUI module for the Macanan game
//!
//! This module provides a native Rust GUI using egui/eframe.

mod app;
mod board_view;
mod game_state;
mod theme;

pub use app::MacananApp;
pub use game_state::{AiState, GameState, MoveTimer};
