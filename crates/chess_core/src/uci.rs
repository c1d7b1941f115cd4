use crate::{board::Position, types::*};

impl Position {
    /// Parses a UCI long-algebraic move and matches it against the legal
    /// moves and king captures, so castling and promotions come out
    /// normalized.
    ///
    /// A pawn reaching the last rank without a promotion letter is read as
    /// a queen promotion.
    pub fn parse_uci(&self, txt: &str) -> Option<Move> {
        let txt = txt.trim();
        if txt == "0000" {
            return Some(Move::NULL);
        }
        if txt.len() < 4 || !txt.is_ascii() {
            return None;
        }
        let from = coord_to_sq(&txt[0..2])?;
        let to = coord_to_sq(&txt[2..4])?;
        let promo = match txt[4..].chars().next() {
            Some(c) => Some(kind_from_char(c)?),
            None => None,
        };

        let wanted = Move { from, to, promo, is_null: false };
        let mut legals = self.legal_moves();
        legals.extend(self.king_captures());
        if legals.contains(&wanted) {
            return Some(wanted);
        }
        if promo.is_none() && self.is_promotion(wanted) {
            let queen = Move::with_promo(from, to, PieceKind::Queen);
            return legals.contains(&queen).then_some(queen);
        }
        None
    }
}

/// Parses a whitespace-separated UCI line (e.g. a principal variation),
/// stopping at the first token that is not legal in sequence.
pub fn parse_uci_line(start: &Position, tokens: &[&str]) -> Vec<Move> {
    let mut pos = start.clone();
    let mut line = Vec::with_capacity(tokens.len());
    for token in tokens {
        let Some(mv) = pos.parse_uci(token) else {
            break;
        };
        if pos.play(mv).is_err() {
            break;
        }
        line.push(mv);
    }
    line
}
