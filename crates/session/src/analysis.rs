//! Where an analysis session starts from.

use std::path::Path;

use chess_core::{Position, EMPTY_FEN};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::SessionError;
use crate::pgn::{self, GameHeaders, GameRecord};
use crate::setup;

/// Random starts play this many random moves from the initial position.
pub const RANDOM_PLIES: std::ops::RangeInclusive<usize> = 5..=20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisStart {
    Standard,
    Fen(String),
    /// PGN text, not a path
    Pgn(String),
    Random,
    /// Empty board; the king invariant puts both kings back.
    Clear,
}

impl AnalysisStart {
    /// Interprets free text the way the load dialog does: FEN first, then a
    /// path to a PGN file, then PGN text.
    pub fn from_input(input: &str) -> Result<Self, SessionError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(AnalysisStart::Standard);
        }
        if Position::from_fen(input).is_ok() {
            return Ok(AnalysisStart::Fen(input.to_string()));
        }
        let path = Path::new(input);
        if path.is_file() {
            let text = std::fs::read_to_string(path).map_err(|e| SessionError::InvalidPositionText {
                reason: format!("cannot read {}: {e}", path.display()),
            })?;
            return Ok(AnalysisStart::Pgn(text));
        }
        match pgn::read_pgn(input) {
            Ok(_) => Ok(AnalysisStart::Pgn(input.to_string())),
            Err(e) => Err(SessionError::InvalidPositionText {
                reason: format!("neither FEN, a PGN file nor PGN text ({e})"),
            }),
        }
    }

    /// Builds the record the analysis session opens with.
    pub fn into_record(self, rng: &mut impl Rng) -> Result<GameRecord, SessionError> {
        let headers = GameHeaders::new("Analysis", "?", "?");
        let start = match self {
            AnalysisStart::Standard => Position::startpos(),
            AnalysisStart::Fen(text) => {
                Position::from_fen(&text).map_err(|e| SessionError::InvalidPositionText {
                    reason: e.to_string(),
                })?
            }
            AnalysisStart::Pgn(text) => {
                return pgn::read_pgn(&text).map_err(|e| SessionError::InvalidPositionText {
                    reason: e.to_string(),
                });
            }
            AnalysisStart::Random => random_position(rng),
            AnalysisStart::Clear => Position::from_fen(EMPTY_FEN).map_err(|e| {
                SessionError::InvalidPositionText {
                    reason: e.to_string(),
                }
            })?,
        };
        let mut start = start;
        setup::enforce_king_invariant(&mut start);
        Ok(GameRecord::new(headers, start))
    }
}

/// Plays a random number of random legal moves from the initial position,
/// stopping early if the game ends.
pub fn random_position(rng: &mut impl Rng) -> Position {
    let mut pos = Position::startpos();
    let plies = rng.gen_range(RANDOM_PLIES);
    for _ in 0..plies {
        let Some(&mv) = pos.legal_moves().choose(rng) else {
            break;
        };
        if pos.play(mv).is_err() || pos.is_game_over() {
            break;
        }
    }
    pos
}

#[cfg(test)]
#[path = "analysis_tests.rs"]
mod analysis_tests;
