//! Board edits outside legal play.
//!
//! Every edit is followed by the same settling step: castling rights that
//! no longer match the placement are dropped, the en-passant square is
//! cleared, and the king invariant (exactly one king per colour) is
//! re-established.

use std::fmt;

use chess_core::{coord_to_sq, sq_to_coord, Color, Piece, PieceKind, Position, Square};

use crate::error::SessionError;

/// One board edit, as recorded on a null-move node of the move tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SetupEdit {
    /// Put `piece` on `square`; refused when a king stands there.
    Place { square: Square, piece: Piece },
    Remove { square: Square },
    /// Drag a non-king piece to another square.
    Relocate { from: Square, to: Square },
    /// Remove everything but the kings.
    ClearNonKings,
    /// No edit of its own; only the settling step.
    RepairKings,
}

impl fmt::Display for SetupEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SetupEdit::Place { square, piece } => {
                write!(f, "place {} {}", sq_to_coord(square), piece.to_char())
            }
            SetupEdit::Remove { square } => write!(f, "remove {}", sq_to_coord(square)),
            SetupEdit::Relocate { from, to } => {
                write!(f, "relocate {} {}", sq_to_coord(from), sq_to_coord(to))
            }
            SetupEdit::ClearNonKings => write!(f, "clear"),
            SetupEdit::RepairKings => write!(f, "repair"),
        }
    }
}

impl SetupEdit {
    /// Reads the form produced by `Display`.
    pub fn parse(text: &str) -> Option<SetupEdit> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        match tokens.as_slice() {
            ["place", sq, piece] => {
                let mut chars = piece.chars();
                let piece = match (chars.next(), chars.next()) {
                    (Some(c), None) => Piece::from_char(c)?,
                    _ => return None,
                };
                Some(SetupEdit::Place {
                    square: coord_to_sq(sq)?,
                    piece,
                })
            }
            ["remove", sq] => Some(SetupEdit::Remove {
                square: coord_to_sq(sq)?,
            }),
            ["relocate", from, to] => Some(SetupEdit::Relocate {
                from: coord_to_sq(from)?,
                to: coord_to_sq(to)?,
            }),
            ["clear"] => Some(SetupEdit::ClearNonKings),
            ["repair"] => Some(SetupEdit::RepairKings),
            _ => None,
        }
    }
}

/// What the settling step did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditReport {
    /// The king invariant had to change the board
    pub kings_repaired: bool,
    /// Colours still without a king because their home square is taken
    pub missing_kings: Vec<Color>,
}

/// Where a repaired king is put back.
pub const fn home_square(color: Color) -> Square {
    match color {
        Color::White => Square::E1,
        Color::Black => Square::E8,
    }
}

/// For each colour without exactly one king: remove all its kings, then
/// put one back on its home square if that square is empty.
///
/// Returns whether the board changed. Running it twice is a no-op the
/// second time.
pub fn enforce_king_invariant(pos: &mut Position) -> bool {
    let mut changed = false;
    for color in [Color::White, Color::Black] {
        let kings = pos.pieces(color, PieceKind::King);
        if kings.len() == 1 {
            continue;
        }
        for &sq in &kings {
            pos.remove_piece_at(sq);
            changed = true;
        }
        let home = home_square(color);
        if pos.piece_at(home).is_none() {
            pos.set_piece_at(home, Piece::new(color, PieceKind::King));
            changed = true;
        }
    }
    if changed {
        tracing::warn!(fen = %pos.to_fen(), "king count repaired");
    }
    changed
}

/// Cleans rights and repairs kings after an edit.
pub fn settle(pos: &mut Position) -> EditReport {
    pos.clean_castling_rights();
    pos.en_passant = None;
    let kings_repaired = enforce_king_invariant(pos);
    let missing_kings = [Color::White, Color::Black]
        .into_iter()
        .filter(|&c| pos.king_square(c).is_none())
        .collect();
    EditReport {
        kings_repaired,
        missing_kings,
    }
}

pub fn place_piece(pos: &mut Position, square: Square, piece: Piece) -> Result<EditReport, SessionError> {
    if is_king(pos, square) {
        return Err(SessionError::CannotReplaceKing { square });
    }
    pos.set_piece_at(square, piece);
    Ok(settle(pos))
}

/// Kings may be removed; the settling step puts them back.
pub fn remove_piece(pos: &mut Position, square: Square) -> Result<EditReport, SessionError> {
    if pos.remove_piece_at(square).is_none() {
        return Err(SessionError::EmptySquare { square });
    }
    Ok(settle(pos))
}

pub fn relocate_piece(pos: &mut Position, from: Square, to: Square) -> Result<EditReport, SessionError> {
    let piece = pos
        .piece_at(from)
        .ok_or(SessionError::EmptySquare { square: from })?;
    if piece.kind == PieceKind::King {
        return Err(SessionError::CannotMoveKing { square: from });
    }
    if is_king(pos, to) {
        return Err(SessionError::CannotReplaceKing { square: to });
    }
    pos.remove_piece_at(from);
    pos.set_piece_at(to, piece);
    Ok(settle(pos))
}

pub fn clear_non_kings(pos: &mut Position) -> EditReport {
    let doomed: Vec<Square> = pos
        .occupied()
        .filter(|(_, piece)| piece.kind != PieceKind::King)
        .map(|(sq, _)| sq)
        .collect();
    for sq in doomed {
        pos.remove_piece_at(sq);
    }
    settle(pos)
}

/// Applies `edit` to `pos`. On error the position is unchanged.
pub fn apply_edit(pos: &mut Position, edit: SetupEdit) -> Result<EditReport, SessionError> {
    match edit {
        SetupEdit::Place { square, piece } => place_piece(pos, square, piece),
        SetupEdit::Remove { square } => remove_piece(pos, square),
        SetupEdit::Relocate { from, to } => relocate_piece(pos, from, to),
        SetupEdit::ClearNonKings => Ok(clear_non_kings(pos)),
        SetupEdit::RepairKings => Ok(settle(pos)),
    }
}

fn is_king(pos: &Position, square: Square) -> bool {
    pos.piece_at(square)
        .is_some_and(|piece| piece.kind == PieceKind::King)
}

#[cfg(test)]
#[path = "setup_tests.rs"]
mod setup_tests;
