pub mod board;
pub mod error;
pub mod fen;
pub mod notation;
pub mod rules;
pub mod time_control;
pub mod types;
pub mod uci;

pub use board::*;
pub use error::*;
pub use fen::{EMPTY_FEN, STARTING_FEN};
pub use time_control::*;
pub use types::*;
pub use uci::*;

// =============================================================================
// Engine trait: the strongest-move oracle (external UCI programs, built-ins)
// =============================================================================

/// Result of a search operation
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// The best move found (None if no legal moves)
    pub best_move: Option<Move>,
    /// Principal variation, starting with `best_move` when the engine reports one
    pub pv: Vec<Move>,
    /// Evaluation score in centipawns from the side to move's perspective
    pub score: i32,
    /// Search depth reached
    pub depth: u8,
    /// Number of nodes searched (optional, for stats)
    pub nodes: u64,
    /// Whether search was stopped early due to time limit
    pub stopped: bool,
}

/// Trait that every strongest-move oracle implements.
///
/// One instance must never be queried from two call sites at once; the
/// session layer wraps each instance in a mutex-guarded handle.
pub trait Engine: Send {
    /// Search the position with the given search limits.
    ///
    /// Blocks until the engine answers. The limits bound the expected
    /// latency but are not a cancellation contract.
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> Result<SearchResult, EngineError>;

    /// Returns the engine's name
    fn name(&self) -> &str;

    /// Best move only.
    fn play(&mut self, pos: &Position, limits: SearchLimits) -> Result<Option<Move>, EngineError> {
        Ok(self.search(pos, limits)?.best_move)
    }

    /// Principal variation only; may be empty.
    fn analyse(&mut self, pos: &Position, limits: SearchLimits) -> Result<Vec<Move>, EngineError> {
        let result = self.search(pos, limits)?;
        if result.pv.is_empty() {
            return Ok(result.best_move.into_iter().collect());
        }
        Ok(result.pv)
    }

    /// Reset internal state for a new game (clear hash tables, history, etc.)
    fn new_game(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    /// Set an engine option. Returns true if the option was recognized.
    fn set_option(&mut self, _name: &str, _value: &str) -> Result<bool, EngineError> {
        Ok(false)
    }

    /// Release whatever backs the engine (e.g. terminate its process).
    fn quit(&mut self) {}
}
