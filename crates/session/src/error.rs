//! Error types for sessions, configuration and the engine registry.

use std::path::PathBuf;

use chess_core::{sq_to_coord, EngineError, Move, Square};

use crate::outcome::Outcome;

/// Failures surfaced by the session controllers.
///
/// None of these is fatal: the controller keeps its previous state and the
/// caller decides whether to re-prompt, notify or end the game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("illegal move {mv}")]
    InvalidMove { mv: Move },

    #[error("it is not your turn")]
    NotPlayersTurn,

    #[error("the game is over: {outcome}")]
    GameOver { outcome: Outcome },

    /// Terminal detection upstream should have prevented this request.
    #[error("no legal moves in this position")]
    NoLegalMoves,

    #[error("the engine offered no suggestion")]
    NoPrincipalVariation,

    #[error("invalid position text: {reason}")]
    InvalidPositionText { reason: String },

    #[error("both kings must be on the board")]
    MissingKing,

    #[error("cannot replace the king on {}", sq_to_coord(*square))]
    CannotReplaceKing { square: Square },

    #[error("cannot move the king on {} in setup mode", sq_to_coord(*square))]
    CannotMoveKing { square: Square },

    #[error("no piece on {}", sq_to_coord(*square))]
    EmptySquare { square: Square },

    #[error("the current line has no ply {ply}")]
    NoSuchPly { ply: usize },

    #[error("no promotion is waiting for a piece")]
    NoPendingPromotion,

    #[error("engine unavailable: {reason}")]
    EngineUnavailable { reason: String },

    /// A recorded move no longer applies when replaying from the start.
    #[error("move history cannot be replayed: {reason}")]
    CorruptHistory { reason: String },
}

impl From<EngineError> for SessionError {
    fn from(err: EngineError) -> Self {
        match err {
            // Searchers refuse exactly the boards that have no legal play.
            EngineError::UnplayablePosition { .. } => SessionError::NoLegalMoves,
            other => SessionError::EngineUnavailable {
                reason: other.to_string(),
            },
        }
    }
}

/// Errors that occur when loading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors that occur when building the engine registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("no engine could be started")]
    Empty,

    #[error("engine {name} is configured twice")]
    DuplicateName { name: String },

    #[error("engine {name} is a UCI engine but has no path")]
    MissingPath { name: String },
}
