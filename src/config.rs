//! Runtime configuration
//!
//! Everything is optional in the JSON file; missing fields fall back to the
//! defaults below. The path comes from `MACANAN_CONFIG` when set.
//!
//! ```json
//! {
//!   "ai": { "depth": 4, "thinking_delay_ms": 500, "weights": { "tiger": { "capture": 800 } } },
//!   "save_path": "macanan_save.json"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{GameError, Result};
use crate::eval::EvalWeights;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "MACANAN_CONFIG";

/// Deepest search the UI allows
pub const MAX_DEPTH: u8 = 8;

/// AI settings shared by both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Search depth in plies
    pub depth: u8,
    /// Transposition table size in megabytes
    pub tt_size_mb: usize,
    /// Root search threads (0 = one per core, up to 8)
    pub threads: usize,
    /// Pause before the AI plays, so a human can follow along
    pub thinking_delay_ms: u64,
    pub weights: EvalWeights,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            tt_size_mb: 16,
            threads: 0,
            thinking_delay_ms: 1000,
            weights: EvalWeights::default(),
        }
    }
}

impl AiConfig {
    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 || self.depth > MAX_DEPTH {
            return Err(GameError::Config(format!(
                "depth must be between 1 and {MAX_DEPTH}, got {}",
                self.depth
            )));
        }
        self.weights.validate()
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ai: AiConfig,
    /// Where the UI saves and resumes games
    pub save_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ai: AiConfig::default(),
            save_path: PathBuf::from("macanan_save.json"),
        }
    }
}

impl Config {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.ai.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| GameError::io(format!("reading {}", path.display()), e))?;
        let config = Self::from_json_str(&contents)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load from `MACANAN_CONFIG`, falling back to defaults on any failure.
    pub fn from_env() -> Self {
        let Ok(path) = std::env::var(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(%path, error = %e, "config rejected, using defaults");
                Self::default()
            }
        }
    }
}
