//! Bridge to the cozy-chess rules oracle.
//!
//! cozy-chess encodes castling as the king capturing its own rook; the rest
//! of the workspace uses the conventional two-file king step. Every move
//! crossing this boundary goes through [`from_native`] / [`to_native`].

use cozy_chess::{Board, Move as NativeMove};

use crate::types::*;

/// All legal moves in rules-oracle encoding.
pub fn native_moves(board: &Board) -> Vec<NativeMove> {
    let mut moves = Vec::with_capacity(64);
    board.generate_moves(|piece_moves| {
        moves.extend(piece_moves);
        false
    });
    moves
}

pub fn legal_moves(board: &Board) -> Vec<Move> {
    native_moves(board)
        .into_iter()
        .map(|mv| from_native(board, mv))
        .collect()
}

pub fn is_legal_native(board: &Board, mv: NativeMove) -> bool {
    native_moves(board).contains(&mv)
}

fn is_castle_native(board: &Board, mv: NativeMove) -> bool {
    board.piece_on(mv.from) == Some(PieceKind::King)
        && board.color_on(mv.to) == Some(board.side_to_move())
}

pub fn from_native(board: &Board, mv: NativeMove) -> Move {
    if is_castle_native(board, mv) {
        let file = if file_of(mv.to) > file_of(mv.from) {
            File::G
        } else {
            File::C
        };
        return Move::new(mv.from, Square::new(file, mv.from.rank()));
    }
    Move {
        from: mv.from,
        to: mv.to,
        promo: mv.promotion,
        is_null: false,
    }
}

pub fn to_native(board: &Board, mv: Move) -> NativeMove {
    let king_step = board.piece_on(mv.from) == Some(PieceKind::King)
        && file_of(mv.from).abs_diff(file_of(mv.to)) == 2;
    if king_step {
        let file = if file_of(mv.to) > file_of(mv.from) {
            File::H
        } else {
            File::A
        };
        return NativeMove {
            from: mv.from,
            to: Square::new(file, mv.from.rank()),
            promotion: None,
        };
    }
    NativeMove {
        from: mv.from,
        to: mv.to,
        promotion: mv.promo,
    }
}
