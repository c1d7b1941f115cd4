//! Standard Algebraic Notation.

use crate::board::Position;
use crate::types::*;

impl Position {
    /// SAN for a legal move in this position, with `+`/`#` suffixes.
    ///
    /// Moves the position cannot interpret fall back to UCI text.
    pub fn san(&self, mv: Move) -> String {
        if mv.is_null {
            return "--".to_string();
        }
        let Some(piece) = self.piece_at(mv.from) else {
            return mv.to_string();
        };

        let mut san = String::new();
        if piece.kind == PieceKind::King && file_of(mv.from).abs_diff(file_of(mv.to)) == 2 {
            san.push_str(if file_of(mv.to) > file_of(mv.from) {
                "O-O"
            } else {
                "O-O-O"
            });
        } else {
            let is_capture = self.piece_at(mv.to).is_some()
                || (piece.kind == PieceKind::Pawn && file_of(mv.from) != file_of(mv.to));

            if piece.kind == PieceKind::Pawn {
                if is_capture {
                    san.push((b'a' + file_of(mv.from) as u8) as char);
                }
            } else {
                san.push(kind_to_char(piece.kind).to_ascii_uppercase());
                san.push_str(&self.disambiguation(mv, piece));
            }

            if is_capture {
                san.push('x');
            }
            san.push_str(&sq_to_coord(mv.to));

            if let Some(promo) = mv.promo {
                san.push('=');
                san.push(kind_to_char(promo).to_ascii_uppercase());
            }
        }

        let mut after = self.clone();
        if after.play(mv).is_ok() {
            if after.is_checkmate() {
                san.push('#');
            } else if after.is_check() {
                san.push('+');
            }
        }
        san
    }

    fn disambiguation(&self, mv: Move, piece: Piece) -> String {
        let rivals: Vec<Square> = self
            .legal_moves()
            .into_iter()
            .filter(|m| m.to == mv.to && m.from != mv.from && self.piece_at(m.from) == Some(piece))
            .map(|m| m.from)
            .collect();
        if rivals.is_empty() {
            return String::new();
        }

        let coord = sq_to_coord(mv.from);
        let shares_file = rivals.iter().any(|&sq| file_of(sq) == file_of(mv.from));
        let shares_rank = rivals.iter().any(|&sq| rank_of(sq) == rank_of(mv.from));
        if !shares_file {
            coord[..1].to_string()
        } else if !shares_rank {
            coord[1..].to_string()
        } else {
            coord
        }
    }

    /// Resolves SAN (or UCI) text against the legal moves, and against the
    /// king captures an edited board may allow.
    pub fn parse_san(&self, text: &str) -> Option<Move> {
        if matches!(text.trim(), "--" | "0000") {
            return Some(Move::NULL);
        }
        let wanted = normalize_san(text);
        self.legal_moves()
            .into_iter()
            .chain(self.king_captures())
            .find(|&mv| normalize_san(&self.san(mv)) == wanted)
            .or_else(|| self.parse_uci(text))
    }
}

fn normalize_san(text: &str) -> String {
    text.trim()
        .trim_end_matches(['+', '#', '!', '?'])
        .replace('0', "O")
}

#[cfg(test)]
#[path = "notation_tests.rs"]
mod notation_tests;
