//! Graded opponents built from one strongest-move oracle.
//!
//! Each level mixes uniformly random legal moves with the oracle's choice:
//!
//! | Level   | random share | oracle budget |
//! |---------|--------------|---------------|
//! | Trivial | 100%         | -             |
//! | Easy    | 70%          | depth 1       |
//! | Medium  | 50%          | depth 5       |
//! | Hard    | 0%           | depth 10      |
//! | Maximum | 0%           | 100 ms        |

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chess_core::{Move, Position, SearchLimits};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::engine::EngineHandle;
use crate::error::SessionError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    #[serde(rename = "trivial", alias = "Super Duper Easy")]
    TrivialRandom,
    #[serde(alias = "Easy")]
    Easy,
    #[default]
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "Hard")]
    Hard,
    #[serde(alias = "Impossible")]
    Maximum,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 5] = [
        DifficultyLevel::TrivialRandom,
        DifficultyLevel::Easy,
        DifficultyLevel::Medium,
        DifficultyLevel::Hard,
        DifficultyLevel::Maximum,
    ];

    /// Canonical lowercase name used in config files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            DifficultyLevel::TrivialRandom => "trivial",
            DifficultyLevel::Easy => "easy",
            DifficultyLevel::Medium => "medium",
            DifficultyLevel::Hard => "hard",
            DifficultyLevel::Maximum => "maximum",
        }
    }

    /// Label shown to players.
    pub fn label(self) -> &'static str {
        match self {
            DifficultyLevel::TrivialRandom => "Super Duper Easy",
            DifficultyLevel::Easy => "Easy",
            DifficultyLevel::Medium => "Medium",
            DifficultyLevel::Hard => "Hard",
            DifficultyLevel::Maximum => "Impossible",
        }
    }

    /// Probability of ignoring the oracle for a uniformly random move.
    pub fn random_probability(self) -> f64 {
        match self {
            DifficultyLevel::TrivialRandom => 1.0,
            DifficultyLevel::Easy => 0.7,
            DifficultyLevel::Medium => 0.5,
            DifficultyLevel::Hard | DifficultyLevel::Maximum => 0.0,
        }
    }

    /// Budget for the oracle query; `None` when the oracle is never asked.
    pub fn oracle_limits(self) -> Option<SearchLimits> {
        match self {
            DifficultyLevel::TrivialRandom => None,
            DifficultyLevel::Easy => Some(SearchLimits::depth(1)),
            DifficultyLevel::Medium => Some(SearchLimits::depth(5)),
            DifficultyLevel::Hard => Some(SearchLimits::depth(10)),
            DifficultyLevel::Maximum => Some(SearchLimits::time(Duration::from_millis(100))),
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DifficultyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        DifficultyLevel::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s) || level.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unknown difficulty '{s}' (expected trivial, easy, medium, hard or maximum)")
            })
    }
}

/// One opponent: an oracle, a level and the generator behind the dice.
#[derive(Debug)]
pub struct DifficultyPolicy {
    engine: EngineHandle,
    level: DifficultyLevel,
    rng: StdRng,
}

impl DifficultyPolicy {
    pub fn new(engine: EngineHandle, level: DifficultyLevel) -> Self {
        Self::with_rng(engine, level, StdRng::from_entropy())
    }

    pub fn seeded(engine: EngineHandle, level: DifficultyLevel, seed: u64) -> Self {
        Self::with_rng(engine, level, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(engine: EngineHandle, level: DifficultyLevel, rng: StdRng) -> Self {
        Self { engine, level, rng }
    }

    pub fn level(&self) -> DifficultyLevel {
        self.level
    }

    pub fn set_level(&mut self, level: DifficultyLevel) {
        self.level = level;
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    pub fn set_engine(&mut self, engine: EngineHandle) {
        self.engine = engine;
    }

    /// Picks a move for the side to move. Never changes `pos`.
    pub fn select_move(&mut self, pos: &Position) -> Result<Move, SessionError> {
        let moves = pos.legal_moves();
        if moves.is_empty() {
            // An edited board may leave the opposing king en prise; taking
            // it ends the game whatever the level.
            return pos
                .king_captures()
                .first()
                .copied()
                .ok_or(SessionError::NoLegalMoves);
        }

        let roll: f64 = self.rng.gen();
        let limits = match self.level.oracle_limits() {
            Some(limits) if roll >= self.level.random_probability() => limits,
            _ => {
                let mv = *moves.choose(&mut self.rng).ok_or(SessionError::NoLegalMoves)?;
                tracing::debug!(level = %self.level, %mv, "random move");
                return Ok(mv);
            }
        };

        let mv = self
            .engine
            .play(pos, limits)?
            .ok_or_else(|| SessionError::EngineUnavailable {
                reason: format!("{} returned no move", self.engine.name()),
            })?;
        if !moves.contains(&mv) {
            return Err(SessionError::EngineUnavailable {
                reason: format!("{} suggested illegal move {mv}", self.engine.name()),
            });
        }
        tracing::debug!(level = %self.level, engine = self.engine.name(), %mv, "oracle move");
        Ok(mv)
    }

    /// First move of the oracle's principal variation. Advisory only.
    pub fn hint(&self, pos: &Position, limits: SearchLimits) -> Result<Move, SessionError> {
        self.analyse(pos, limits)?
            .first()
            .copied()
            .ok_or(SessionError::NoPrincipalVariation)
    }

    /// The oracle's whole principal variation.
    pub fn analyse(&self, pos: &Position, limits: SearchLimits) -> Result<Vec<Move>, SessionError> {
        let line = self.engine.analyse(pos, limits)?;
        if line.is_empty() {
            return Err(SessionError::NoPrincipalVariation);
        }
        Ok(line)
    }
}

#[cfg(test)]
#[path = "difficulty_tests.rs"]
mod difficulty_tests;
