//! How a game ends, and the terminal checks every controller shares.

use std::fmt;

use chess_core::{color_name, Color, Move, PieceKind, Position};

/// Final state of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    /// A move would have taken a king. Only reachable after setup edits
    /// left the board inconsistent; the capturing side is awarded the game.
    KingCaptured { winner: Color },
    /// A king is still absent after repair; the side with a king wins, or
    /// nobody if both are gone.
    MissingKing { winner: Option<Color> },
    Resigned { winner: Color },
    InsufficientMaterial,
    /// Seventy-five moves without a capture or pawn move
    SeventyFiveMoves,
    /// Engine match reached its ply cap
    MoveLimit,
}

impl Outcome {
    pub fn winner(self) -> Option<Color> {
        match self {
            Outcome::Checkmate { winner }
            | Outcome::KingCaptured { winner }
            | Outcome::Resigned { winner } => Some(winner),
            Outcome::MissingKing { winner } => winner,
            Outcome::Stalemate
            | Outcome::InsufficientMaterial
            | Outcome::SeventyFiveMoves
            | Outcome::MoveLimit => None,
        }
    }

    /// PGN result token.
    pub fn result(self) -> &'static str {
        match self.winner() {
            Some(Color::White) => "1-0",
            Some(Color::Black) => "0-1",
            None => "1/2-1/2",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Outcome::Checkmate { winner } => write!(f, "checkmate, {} wins", color_name(winner)),
            Outcome::Stalemate => write!(f, "stalemate"),
            Outcome::KingCaptured { winner } => {
                write!(f, "king captured, {} wins", color_name(winner))
            }
            Outcome::MissingKing { winner: Some(winner) } => {
                write!(f, "missing king, {} wins", color_name(winner))
            }
            Outcome::MissingKing { winner: None } => write!(f, "both kings missing"),
            Outcome::Resigned { winner } => {
                write!(f, "{} resigned", color_name(!winner))
            }
            Outcome::InsufficientMaterial => write!(f, "draw by insufficient material"),
            Outcome::SeventyFiveMoves => write!(f, "draw by the seventy-five move rule"),
            Outcome::MoveLimit => write!(f, "move limit reached"),
        }
    }
}

/// Terminal states of interactive play: a missing king, checkmate or
/// stalemate.
pub fn terminal(pos: &Position) -> Option<Outcome> {
    let white = pos.king_square(Color::White).is_some();
    let black = pos.king_square(Color::Black).is_some();
    match (white, black) {
        (true, true) => {}
        (true, false) => return Some(Outcome::MissingKing { winner: Some(Color::White) }),
        (false, true) => return Some(Outcome::MissingKing { winner: Some(Color::Black) }),
        (false, false) => return Some(Outcome::MissingKing { winner: None }),
    }
    if pos.is_checkmate() {
        return Some(Outcome::Checkmate {
            winner: !pos.side_to_move,
        });
    }
    if pos.is_stalemate() {
        return Some(Outcome::Stalemate);
    }
    None
}

/// [`terminal`] plus the automatic draws that end unattended play.
pub fn game_over(pos: &Position) -> Option<Outcome> {
    if let Some(outcome) = terminal(pos) {
        return Some(outcome);
    }
    if pos.is_insufficient_material() {
        return Some(Outcome::InsufficientMaterial);
    }
    if pos.halfmove_clock >= 150 {
        return Some(Outcome::SeventyFiveMoves);
    }
    None
}

/// The outcome of `mv` if it takes the opposing king: the side to move
/// takes the game. The piece on `mv.from` must belong to the side to move
/// and actually reach the king on the current placement.
pub fn king_capture(pos: &Position, mv: Move) -> Option<Outcome> {
    if mv.is_null {
        return None;
    }
    pos.king_captures()
        .iter()
        .any(|take| take.from == mv.from && take.to == mv.to)
        .then_some(Outcome::KingCaptured {
            winner: pos.side_to_move,
        })
}

/// A pawn move to the last rank with no piece chosen becomes a queen
/// promotion.
pub fn with_default_promotion(pos: &Position, mv: Move) -> Move {
    if mv.promo.is_none() && pos.is_promotion(mv) {
        Move::with_promo(mv.from, mv.to, PieceKind::Queen)
    } else {
        mv
    }
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod outcome_tests;
