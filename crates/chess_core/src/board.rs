use cozy_chess::{
    get_bishop_moves, get_king_moves, get_knight_moves, get_pawn_attacks, get_rook_moves, BitBoard,
    Board,
};

use crate::error::IllegalMove;
use crate::rules;
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CastlingRights {
    pub wk: bool,
    pub wq: bool,
    pub bk: bool,
    pub bq: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        wk: true,
        wq: true,
        bk: true,
        bq: true,
    };

    pub const NONE: CastlingRights = CastlingRights {
        wk: false,
        wq: false,
        bk: false,
        bq: false,
    };
}

/// A full board state.
///
/// Unlike a rules-engine board this accepts any placement, including boards
/// with zero or several kings, so setup edits can pass through states the
/// rules refuse. Rule queries build a `cozy_chess::Board` on demand; a
/// placement the rules refuse is *unplayable* and simply has no legal moves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    squares: [Option<Piece>; 64],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    /// Square a pawn skipped over on the previous double push.
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Position {
    pub fn startpos() -> Self {
        let mut p = Position::empty();
        p.castling = CastlingRights::ALL;

        for f in 0..8 {
            if let (Some(w), Some(b)) = (square_at(f, 1), square_at(f, 6)) {
                p.squares[w as usize] = Some(Piece::new(Color::White, PieceKind::Pawn));
                p.squares[b as usize] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            }
        }
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (f, &kind) in back.iter().enumerate() {
            if let (Some(w), Some(b)) = (square_at(f, 0), square_at(f, 7)) {
                p.squares[w as usize] = Some(Piece::new(Color::White, kind));
                p.squares[b as usize] = Some(Piece::new(Color::Black, kind));
            }
        }
        p
    }

    /// An empty board, White to move, no rights.
    pub fn empty() -> Self {
        Position {
            squares: [None; 64],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq as usize]
    }

    /// Puts `piece` on `sq`, returning whatever stood there.
    pub fn set_piece_at(&mut self, sq: Square, piece: Piece) -> Option<Piece> {
        self.squares[sq as usize].replace(piece)
    }

    pub fn remove_piece_at(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq as usize].take()
    }

    /// Occupied squares in A1..H8 order.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::ALL
            .iter()
            .filter_map(|&sq| self.squares[sq as usize].map(|p| (sq, p)))
    }

    pub fn pieces(&self, color: Color, kind: PieceKind) -> Vec<Square> {
        self.occupied()
            .filter(|(_, p)| p.color == color && p.kind == kind)
            .map(|(sq, _)| sq)
            .collect()
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color, PieceKind::King).first().copied()
    }

    pub fn has_both_kings(&self) -> bool {
        self.king_square(Color::White).is_some() && self.king_square(Color::Black).is_some()
    }

    /// Drops castling rights whose king or rook has left its home square.
    pub fn clean_castling_rights(&mut self) {
        let home = |p: &Position, sq: Square, color: Color, kind: PieceKind| {
            p.piece_at(sq) == Some(Piece::new(color, kind))
        };
        let white_king = home(self, Square::E1, Color::White, PieceKind::King);
        let black_king = home(self, Square::E8, Color::Black, PieceKind::King);
        self.castling.wk &= white_king && home(self, Square::H1, Color::White, PieceKind::Rook);
        self.castling.wq &= white_king && home(self, Square::A1, Color::White, PieceKind::Rook);
        self.castling.bk &= black_king && home(self, Square::H8, Color::Black, PieceKind::Rook);
        self.castling.bq &= black_king && home(self, Square::A8, Color::Black, PieceKind::Rook);
    }

    /// The rules-oracle view of this position, if the rules accept it.
    pub fn to_board(&self) -> Option<Board> {
        if !self.has_both_kings() {
            return None;
        }
        if let Ok(board) = Board::from_fen(&self.rules_fen(), false) {
            return Some(board);
        }
        // A stale en-passant square is the most common reason for refusal.
        if self.en_passant.is_some() {
            let mut relaxed = self.clone();
            relaxed.en_passant = None;
            return Board::from_fen(&relaxed.rules_fen(), false).ok();
        }
        None
    }

    /// Reads a position back from the rules oracle.
    pub fn from_board(board: &Board) -> Self {
        let mut p = Position::empty();
        for &sq in Square::ALL.iter() {
            if let (Some(kind), Some(color)) = (board.piece_on(sq), board.color_on(sq)) {
                p.squares[sq as usize] = Some(Piece::new(color, kind));
            }
        }
        p.side_to_move = board.side_to_move();
        let white = board.castle_rights(Color::White);
        let black = board.castle_rights(Color::Black);
        p.castling = CastlingRights {
            wk: white.short.is_some(),
            wq: white.long.is_some(),
            bk: black.short.is_some(),
            bq: black.long.is_some(),
        };
        p.en_passant = board.en_passant().map(|file| {
            let rank = match board.side_to_move() {
                Color::White => Rank::Sixth,
                Color::Black => Rank::Third,
            };
            Square::new(file, rank)
        });
        p.halfmove_clock = board.halfmove_clock() as u32;
        p.fullmove_number = board.fullmove_number() as u32;
        p
    }

    pub fn is_playable(&self) -> bool {
        self.to_board().is_some()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        match self.to_board() {
            Some(board) => rules::legal_moves(&board),
            None => Vec::new(),
        }
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        !mv.is_null && self.legal_moves().contains(&mv)
    }

    /// Applies a legal move. The null move passes the turn.
    pub fn play(&mut self, mv: Move) -> Result<(), IllegalMove> {
        if mv.is_null {
            self.pass_turn();
            return Ok(());
        }
        let mut board = self.to_board().ok_or(IllegalMove { mv })?;
        let native = rules::to_native(&board, mv);
        if !rules::is_legal_native(&board, native) {
            return Err(IllegalMove { mv });
        }
        board.play_unchecked(native);
        let clock = self.halfmove_clock;
        *self = Position::from_board(&board);
        // The oracle's clock is clamped; keep counting past it.
        if self.halfmove_clock != 0 {
            self.halfmove_clock = clock + 1;
        }
        Ok(())
    }

    fn pass_turn(&mut self) {
        self.en_passant = None;
        if self.side_to_move == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = !self.side_to_move;
    }

    fn occupancy(&self) -> BitBoard {
        self.occupied()
            .fold(BitBoard::EMPTY, |bb, (sq, _)| bb | sq.bitboard())
    }

    /// Whether the piece on `from` attacks `to` on this placement, ignoring
    /// pins, checks and whose turn it is.
    pub fn attacks(&self, from: Square, to: Square) -> bool {
        let Some(piece) = self.piece_at(from) else {
            return false;
        };
        let blockers = self.occupancy();
        let reach = match piece.kind {
            PieceKind::Pawn => get_pawn_attacks(from, piece.color),
            PieceKind::Knight => get_knight_moves(from),
            PieceKind::Bishop => get_bishop_moves(from, blockers),
            PieceKind::Rook => get_rook_moves(from, blockers),
            PieceKind::Queen => get_bishop_moves(from, blockers) | get_rook_moves(from, blockers),
            PieceKind::King => get_king_moves(from),
        };
        reach.has(to)
    }

    /// Moves by the side to move that would take the opposing king.
    ///
    /// Empty on any board the rules accept; only an edited board can leave
    /// the side not to move in check. A pawn taking on the last rank comes
    /// out as a queen promotion.
    pub fn king_captures(&self) -> Vec<Move> {
        let us = self.side_to_move;
        let Some(target) = self.king_square(!us) else {
            return Vec::new();
        };
        self.occupied()
            .filter(|&(from, piece)| piece.color == us && self.attacks(from, target))
            .map(|(from, _)| {
                let mv = Move::new(from, target);
                if self.is_promotion(mv) {
                    Move::with_promo(from, target, PieceKind::Queen)
                } else {
                    mv
                }
            })
            .collect()
    }

    /// Whether `mv` takes a pawn to its last rank.
    pub fn is_promotion(&self, mv: Move) -> bool {
        match self.piece_at(mv.from) {
            Some(Piece {
                kind: PieceKind::Pawn,
                color,
            }) => {
                let last = match color {
                    Color::White => 7,
                    Color::Black => 0,
                };
                !mv.is_null && rank_of(mv.to) == last
            }
            _ => false,
        }
    }

    pub fn is_check(&self) -> bool {
        self.to_board()
            .is_some_and(|board| !board.checkers().is_empty())
    }

    pub fn is_checkmate(&self) -> bool {
        self.to_board().is_some_and(|board| {
            !board.checkers().is_empty() && rules::legal_moves(&board).is_empty()
        })
    }

    pub fn is_stalemate(&self) -> bool {
        self.to_board().is_some_and(|board| {
            board.checkers().is_empty() && rules::legal_moves(&board).is_empty()
        })
    }

    /// Neither side can possibly deliver mate: bare kings, a single minor
    /// piece, or bishops that all share one square colour.
    pub fn is_insufficient_material(&self) -> bool {
        let mut minors = 0;
        let mut bishop_shades = [false; 2];
        for (sq, piece) in self.occupied() {
            match piece.kind {
                PieceKind::King => {}
                PieceKind::Knight => minors += 1,
                PieceKind::Bishop => {
                    minors += 1;
                    bishop_shades[(file_of(sq) + rank_of(sq)) % 2] = true;
                }
                PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            }
        }
        let knights = self.pieces(Color::White, PieceKind::Knight).len()
            + self.pieces(Color::Black, PieceKind::Knight).len();
        minors <= 1 || (knights == 0 && !(bishop_shades[0] && bishop_shades[1]))
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Game over without any claim: mate, stalemate, dead position or the
    /// seventy-five move rule.
    pub fn is_game_over(&self) -> bool {
        self.is_checkmate()
            || self.is_stalemate()
            || self.is_insufficient_material()
            || self.halfmove_clock >= 150
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
