//! Deterministic engines for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chess_core::{Engine, EngineError, Move, Position, SearchLimits, SearchResult};

use crate::engine::EngineHandle;

/// Always answers with the first legal move and counts its queries.
pub struct FirstLegal {
    name: String,
    pub calls: Arc<AtomicUsize>,
}

impl FirstLegal {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Engine for FirstLegal {
    fn search(&mut self, pos: &Position, _limits: SearchLimits) -> Result<SearchResult, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !pos.is_playable() {
            return Err(EngineError::UnplayablePosition { fen: pos.to_fen() });
        }
        let best_move = pos.legal_moves().first().copied();
        Ok(SearchResult {
            best_move,
            pv: best_move.into_iter().collect(),
            ..SearchResult::default()
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Replies with a fixed line regardless of the position.
pub struct FixedLine(pub Vec<Move>);

impl Engine for FixedLine {
    fn search(&mut self, _pos: &Position, _limits: SearchLimits) -> Result<SearchResult, EngineError> {
        Ok(SearchResult {
            best_move: self.0.first().copied(),
            pv: self.0.clone(),
            ..SearchResult::default()
        })
    }

    fn name(&self) -> &str {
        "Fixed"
    }
}

/// Every query fails as if the process had died.
pub struct Broken;

impl Engine for Broken {
    fn search(&mut self, _pos: &Position, _limits: SearchLimits) -> Result<SearchResult, EngineError> {
        Err(EngineError::Unavailable {
            name: "Broken".to_string(),
            reason: "process exited".to_string(),
        })
    }

    fn name(&self) -> &str {
        "Broken"
    }
}

pub fn first_legal(name: &str) -> EngineHandle {
    EngineHandle::new(FirstLegal::new(name))
}
