//! Session state engine
//!
//! This crate holds everything between the rules oracle (`chess_core`) and
//! a display layer:
//! - [`MoveTree`]: branching record of moves and board edits
//! - [`DifficultyPolicy`]: graded opponents built from one strongest-move oracle
//! - [`setup`]: board edits outside legal play and the king invariant
//! - [`SessionController`]: human vs engine, or free analysis
//! - [`DualEngineOrchestrator`]: engine vs engine on a background worker
//! - [`EngineRegistry`], [`pgn`], [`config`]: the plumbing around them

pub mod analysis;
pub mod config;
pub mod controller;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod outcome;
pub mod pgn;
pub mod registry;
pub mod setup;
pub mod tree;

#[cfg(test)]
mod test_support;

pub use analysis::AnalysisStart;
pub use config::{AppConfig, EngineConfig, EngineKind};
pub use controller::{Intent, Mode, Notice, SessionController, SessionState, Update};
pub use difficulty::{DifficultyLevel, DifficultyPolicy};
pub use engine::EngineHandle;
pub use error::{ConfigError, RegistryError, SessionError};
pub use orchestrator::{
    DualEngineOrchestrator, MatchConfig, MatchEvent, MatchView, RunState, Slot, ViewSnapshot,
};
pub use outcome::Outcome;
pub use pgn::{GameHeaders, GameRecord, PgnError, SaveError};
pub use registry::EngineRegistry;
pub use setup::SetupEdit;
pub use tree::{BranchMode, MoveNode, MoveTree, NodeId, ViewCursor};
