//! Error types for position text, move application and engine queries.

use crate::types::Move;

/// Errors that occur when parsing a FEN string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("empty FEN string")]
    Empty,
    #[error("expected at most 6 FEN fields, found {found}")]
    TooManyFields { found: usize },
    #[error("expected 8 ranks in piece placement, found {found}")]
    WrongRankCount { found: usize },
    #[error("rank {rank} describes {length} squares, expected 8")]
    BadRankLength { rank: usize, length: usize },
    #[error("invalid piece character: '{character}'")]
    InvalidPieceChar { character: char },
    #[error("invalid active color: \"{found}\"")]
    InvalidColor { found: String },
    #[error("invalid castling character: '{character}'")]
    InvalidCastlingChar { character: char },
    #[error("invalid en passant square: \"{found}\"")]
    InvalidEnPassant { found: String },
    #[error("invalid {field}: \"{found}\"")]
    InvalidMoveCounter { field: &'static str, found: String },
}

/// A move that is not legal in the position it was applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal move {mv}")]
pub struct IllegalMove {
    pub mv: Move,
}

/// Failures of a strongest-move oracle.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine process is gone, never started, or its handle is unusable.
    #[error("engine {name} is unavailable: {reason}")]
    Unavailable { name: String, reason: String },

    #[error("I/O error talking to engine {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine replied with something the protocol does not allow here.
    #[error("engine {name} sent an unexpected reply: {line}")]
    Protocol { name: String, line: String },

    /// The position cannot be handed to a searcher (missing king, side not
    /// to move in check, ...).
    #[error("position cannot be searched: {fen}")]
    UnplayablePosition { fen: String },
}
