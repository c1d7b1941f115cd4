//! Application configuration loaded from a TOML file.
//!
//! ```toml
//! [defaults]
//! difficulty = "medium"
//! hint_time_ms = 100
//!
//! [[engines]]
//! name = "Stockfish"
//! kind = "uci"
//! path = "engines/stockfish/stockfish"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::difficulty::DifficultyLevel;
use crate::error::ConfigError;

/// Complete configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub defaults: Defaults,
    pub save: SaveDirs,
    /// Engines to register at startup, in order. The first is the default.
    pub engines: Vec<EngineConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            defaults: Defaults::default(),
            save: SaveDirs::default(),
            engines: vec![
                EngineConfig::builtin("Classical", EngineKind::Classical),
                EngineConfig::builtin("Random", EngineKind::Random),
            ],
        }
    }
}

/// Session defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub difficulty: DifficultyLevel,
    /// Thinking time for hints and analysis requests
    pub hint_time_ms: u64,
    /// Autoplay speed, 1 (slow) to 10
    pub autoplay_speed: u8,
    /// Engine matches end in a draw after this many plies
    pub max_plies: usize,
    /// Pause between engine-match moves so a watcher can follow
    pub move_delay_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            difficulty: DifficultyLevel::Medium,
            hint_time_ms: 100,
            autoplay_speed: 5,
            max_plies: 400,
            move_delay_ms: 100,
        }
    }
}

impl Defaults {
    pub fn hint_time(&self) -> Duration {
        Duration::from_millis(self.hint_time_ms)
    }

    pub fn move_delay(&self) -> Duration {
        Duration::from_millis(self.move_delay_ms)
    }
}

/// Where finished games are written, one directory per kind of session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveDirs {
    pub human_vs_engine: PathBuf,
    pub engine_vs_engine: PathBuf,
    pub analysis: PathBuf,
}

impl Default for SaveDirs {
    fn default() -> Self {
        Self {
            human_vs_engine: PathBuf::from("pgn/HumanVSEngine_PGNs"),
            engine_vs_engine: PathBuf::from("pgn/EngineVSEngine_PGNs"),
            analysis: PathBuf::from("pgn/Analysis_PGNs"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Built-in alpha-beta searcher
    Classical,
    /// Uniformly random mover
    Random,
    /// External program speaking UCI
    Uci,
}

/// One `[[engines]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub name: String,
    pub kind: EngineKind,
    /// Executable, required for `uci`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// `setoption` pairs sent after the handshake
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
    /// Depth cap for `classical`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u8>,
    /// Fixed seed for `random`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl EngineConfig {
    pub fn builtin(name: &str, kind: EngineKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            path: None,
            args: Vec::new(),
            options: BTreeMap::new(),
            max_depth: None,
            seed: None,
        }
    }

    pub fn uci(name: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::builtin(name, EngineKind::Uci)
        }
    }
}

impl AppConfig {
    /// Reads `path`. A missing file yields the defaults; an unreadable or
    /// malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
