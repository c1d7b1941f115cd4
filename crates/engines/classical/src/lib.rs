//! Classical Chess Engine
//!
//! Alpha-beta search with material-based evaluation. This is the built-in
//! strongest-move oracle, available without any external program.

mod eval;
mod search;

use chess_core::{rules, Engine, EngineError, Move, Position, SearchLimits, SearchResult};

pub use eval::evaluate;
pub use search::{iterative_deepening, SearchOutcome, MATE};

/// Depth used when the caller asks for more than the engine allows.
pub const DEFAULT_MAX_DEPTH: u8 = 4;

/// Deepest iteration attempted for time-limited queries.
const TIMED_DEPTH_CAP: u8 = 32;

/// Classical chess engine using negamax with alpha-beta pruning.
///
/// This engine uses:
/// - Iterative deepening with the previous best move searched first
/// - Simple material evaluation
/// - Draw detection through the rules oracle plus threefold repetition
/// - Time control support for move time limits
///
/// Depth-only queries are clamped to `max_depth`, since a pure material
/// searcher at depth 10 would stall its caller for minutes.
#[derive(Debug, Clone)]
pub struct ClassicalEngine {
    max_depth: u8,
    /// Node counter for statistics
    nodes: u64,
}

impl Default for ClassicalEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassicalEngine {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: u8) -> Self {
        Self {
            max_depth: max_depth.max(1),
            nodes: 0,
        }
    }

    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }
}

impl Engine for ClassicalEngine {
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> Result<SearchResult, EngineError> {
        let board = pos
            .to_board()
            .ok_or_else(|| EngineError::UnplayablePosition { fen: pos.to_fen() })?;

        self.nodes = 0;
        limits.start();

        let depth = if limits.is_depth_only() {
            limits.depth.min(self.max_depth)
        } else {
            limits.depth.min(TIMED_DEPTH_CAP)
        };
        let outcome = iterative_deepening(&board, depth, &mut self.nodes, &limits.time_control);

        let mut walk = board.clone();
        let pv: Vec<Move> = outcome
            .pv
            .iter()
            .map(|&native| {
                let mv = rules::from_native(&walk, native);
                walk.play_unchecked(native);
                mv
            })
            .collect();

        tracing::debug!(
            depth = outcome.depth,
            score = outcome.score,
            nodes = self.nodes,
            stopped = outcome.stopped,
            "classical search finished"
        );

        Ok(SearchResult {
            best_move: pv.first().copied(),
            pv,
            score: outcome.score,
            depth: outcome.depth,
            nodes: self.nodes,
            stopped: outcome.stopped,
        })
    }

    fn name(&self) -> &str {
        "Classical"
    }

    fn new_game(&mut self) -> Result<(), EngineError> {
        self.nodes = 0;
        Ok(())
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<bool, EngineError> {
        if !name.eq_ignore_ascii_case("maxdepth") {
            return Ok(false);
        }
        match value.trim().parse::<u8>() {
            Ok(depth) => {
                self.max_depth = depth.max(1);
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }
}
