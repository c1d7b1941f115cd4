//! Material-based position evaluation.

use cozy_chess::{Board, Color, Piece};

/// Evaluates the position from the side-to-move's perspective.
///
/// Returns a score in centipawns:
/// - Positive = good for side to move
/// - Negative = bad for side to move
/// - 0 = equal position
pub fn evaluate(board: &Board) -> i32 {
    let mut score = 0i32;

    for piece in Piece::ALL {
        let value = piece_value(piece);
        let white = board.colored_pieces(Color::White, piece).len() as i32;
        let black = board.colored_pieces(Color::Black, piece).len() as i32;
        score += value * (white - black);
    }

    if board.side_to_move() == Color::White {
        score
    } else {
        -score
    }
}

/// Returns the material value of a piece in centipawns.
#[inline]
pub fn piece_value(kind: Piece) -> i32 {
    match kind {
        Piece::Pawn => 100,
        Piece::Knight => 320,
        Piece::Bishop => 330,
        Piece::Rook => 500,
        Piece::Queen => 900,
        Piece::King => 0,
    }
}
