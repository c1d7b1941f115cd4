use std::fmt;

pub use cozy_chess::{Color, File, Piece as PieceKind, Rank, Square};

/// A coloured piece standing on a square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub fn to_char(self) -> char {
        let c = kind_to_char(self.kind);
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let kind = kind_from_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece { color, kind })
    }
}

pub fn kind_to_char(kind: PieceKind) -> char {
    match kind {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    }
}

pub fn kind_from_char(c: char) -> Option<PieceKind> {
    match c.to_ascii_lowercase() {
        'p' => Some(PieceKind::Pawn),
        'n' => Some(PieceKind::Knight),
        'b' => Some(PieceKind::Bishop),
        'r' => Some(PieceKind::Rook),
        'q' => Some(PieceKind::Queen),
        'k' => Some(PieceKind::King),
        _ => None,
    }
}

/// A move as recorded in a game.
///
/// Castling is written king-moves-two-files (`e1g1`). The null move carries
/// no squares of its own and stands in for board edits in the history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promo: Option<PieceKind>,
    pub is_null: bool,
}

impl Move {
    pub const NULL: Move = Move {
        from: Square::A1,
        to: Square::A1,
        promo: None,
        is_null: true,
    };

    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promo: None,
            is_null: false,
        }
    }

    pub const fn with_promo(from: Square, to: Square, promo: PieceKind) -> Self {
        Self {
            from,
            to,
            promo: Some(promo),
            is_null: false,
        }
    }

    /// The squares to highlight after this move, if it has any.
    pub fn squares(&self) -> Option<(Square, Square)> {
        (!self.is_null).then_some((self.from, self.to))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null {
            return write!(f, "0000");
        }
        write!(f, "{}{}", sq_to_coord(self.from), sq_to_coord(self.to))?;
        if let Some(p) = self.promo {
            write!(f, "{}", kind_to_char(p))?;
        }
        Ok(())
    }
}

// Helpers
pub fn square_at(file: usize, rank: usize) -> Option<Square> {
    if file < 8 && rank < 8 {
        Some(Square::new(File::index(file), Rank::index(rank)))
    } else {
        None
    }
}

pub fn file_of(sq: Square) -> usize {
    sq.file() as usize
}

pub fn rank_of(sq: Square) -> usize {
    sq.rank() as usize
}

pub fn sq_to_coord(sq: Square) -> String {
    let f = (b'a' + file_of(sq) as u8) as char;
    let r = (b'1' + rank_of(sq) as u8) as char;
    format!("{f}{r}")
}

pub fn coord_to_sq(c: &str) -> Option<Square> {
    let b = c.as_bytes();
    if b.len() != 2 {
        return None;
    }
    let f = b[0].to_ascii_lowercase();
    let r = b[1];
    if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) {
        return None;
    }
    square_at((f - b'a') as usize, (r - b'1') as usize)
}

pub fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}
