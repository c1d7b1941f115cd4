//! Forsyth-Edwards Notation for [`Position`].
//!
//! Parsing is lenient in the same places a user typing into a text box is:
//! only the piece placement is required, the remaining fields default to
//! `w - - 0 1`. King counts are not checked here; that is the setup layer's
//! job.

use std::fmt;
use std::str::FromStr;

use crate::board::{CastlingRights, Position};
use crate::error::FenError;
use crate::types::*;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// The empty board, as used by "clear board" analysis starts.
pub const EMPTY_FEN: &str = "8/8/8/8/8/8/8/8 w - - 0 1";

impl Position {
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.is_empty() {
            return Err(FenError::Empty);
        }
        if parts.len() > 6 {
            return Err(FenError::TooManyFields { found: parts.len() });
        }

        let mut pos = Position::empty();
        parse_placement(&mut pos, parts[0])?;

        pos.side_to_move = match parts.get(1).copied().unwrap_or("w") {
            "w" | "W" => Color::White,
            "b" | "B" => Color::Black,
            other => {
                return Err(FenError::InvalidColor {
                    found: other.to_string(),
                });
            }
        };

        let castle_part = parts.get(2).copied().unwrap_or("-");
        if castle_part != "-" {
            for c in castle_part.chars() {
                match c {
                    'K' => pos.castling.wk = true,
                    'Q' => pos.castling.wq = true,
                    'k' => pos.castling.bk = true,
                    'q' => pos.castling.bq = true,
                    _ => return Err(FenError::InvalidCastlingChar { character: c }),
                }
            }
        }
        pos.clean_castling_rights();

        let ep_part = parts.get(3).copied().unwrap_or("-");
        pos.en_passant = if ep_part == "-" {
            None
        } else {
            let sq = coord_to_sq(ep_part).ok_or_else(|| FenError::InvalidEnPassant {
                found: ep_part.to_string(),
            })?;
            if rank_of(sq) != 2 && rank_of(sq) != 5 {
                return Err(FenError::InvalidEnPassant {
                    found: ep_part.to_string(),
                });
            }
            Some(sq)
        };

        pos.halfmove_clock = parse_counter(parts.get(4).copied(), "halfmove clock", 0)?;
        pos.fullmove_number = parse_counter(parts.get(5).copied(), "fullmove number", 1)?.max(1);

        Ok(pos)
    }

    pub fn to_fen(&self) -> String {
        self.fen_with_counters(self.halfmove_clock, self.fullmove_number)
    }

    /// FEN with counters clamped to what the rules oracle can store.
    /// FEN with counters clamped into the range the rules oracle accepts.
    pub(crate) fn rules_fen(&self) -> String {
        self.fen_with_counters(
            self.halfmove_clock.min(100),
            self.fullmove_number.clamp(1, u16::MAX as u32),
        )
    }

    fn fen_with_counters(&self, halfmove: u32, fullmove: u32) -> String {
        let mut fen = String::with_capacity(90);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match square_at(file, rank).and_then(|sq| self.piece_at(sq)) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        let CastlingRights { wk, wq, bk, bq } = self.castling;
        if !(wk || wq || bk || bq) {
            fen.push('-');
        } else {
            for (flag, c) in [(wk, 'K'), (wq, 'Q'), (bk, 'k'), (bq, 'q')] {
                if flag {
                    fen.push(c);
                }
            }
        }

        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq_to_coord(sq)),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {halfmove} {fullmove}"));
        fen
    }
}

fn parse_placement(pos: &mut Position, placement: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount { found: ranks.len() });
    }

    for (rank_idx, rank_str) in ranks.iter().enumerate() {
        // FEN lists rank 8 first.
        let rank = 7 - rank_idx;
        let mut file = 0usize;
        for ch in rank_str.chars() {
            if let Some(d) = ch.to_digit(10) {
                file += d as usize;
            } else {
                let piece = Piece::from_char(ch)
                    .ok_or(FenError::InvalidPieceChar { character: ch })?;
                let sq = square_at(file, rank).ok_or(FenError::BadRankLength {
                    rank: rank_idx,
                    length: file + 1,
                })?;
                pos.set_piece_at(sq, piece);
                file += 1;
            }
        }
        if file != 8 {
            return Err(FenError::BadRankLength {
                rank: rank_idx,
                length: file,
            });
        }
    }
    Ok(())
}

fn parse_counter(part: Option<&str>, field: &'static str, default: u32) -> Result<u32, FenError> {
    match part {
        None => Ok(default),
        Some(text) => text.parse().map_err(|_| FenError::InvalidMoveCounter {
            field,
            found: text.to_string(),
        }),
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

#[cfg(test)]
#[path = "fen_tests.rs"]
mod fen_tests;
