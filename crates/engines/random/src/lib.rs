//! Random Move Chess Engine
//!
//! A simple engine that selects moves uniformly at random from all legal moves.
//! Useful for:
//! - Exercising a session without an external engine installed
//! - Baseline comparisons (any real engine should easily beat this)
//! - Deterministic tests, through a seeded generator

use chess_core::{Engine, EngineError, Position, SearchLimits, SearchResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[cfg(test)]
mod lib_tests;

/// A chess engine that plays random legal moves.
///
/// This engine provides no evaluation. Its "principal variation" is the
/// single move it picked.
#[derive(Debug, Clone)]
pub struct RandomEngine {
    rng: StdRng,
    nodes: u64,
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomEngine {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            nodes: 0,
        }
    }

    /// Reproducible move choices for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            nodes: 0,
        }
    }
}

impl Engine for RandomEngine {
    fn search(&mut self, pos: &Position, _limits: SearchLimits) -> Result<SearchResult, EngineError> {
        if !pos.is_playable() {
            return Err(EngineError::UnplayablePosition { fen: pos.to_fen() });
        }

        let moves = pos.legal_moves();
        self.nodes = moves.len() as u64;
        let best_move = moves.choose(&mut self.rng).copied();

        Ok(SearchResult {
            best_move,
            pv: best_move.into_iter().collect(),
            score: 0,
            depth: 1,
            nodes: self.nodes,
            stopped: false,
        })
    }

    fn name(&self) -> &str {
        "Random"
    }

    fn new_game(&mut self) -> Result<(), EngineError> {
        self.nodes = 0;
        Ok(())
    }
}
