//! PGN export and import of a [`GameRecord`].
//!
//! Board edits are written as null moves (`--`) followed by an
//! `{[%edit ...]}` comment so a reader can reproduce the edited board.
//! Plain `--` without that comment is an ordinary pass.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chess_core::{FenError, Move, Position, STARTING_FEN};

use crate::setup::{self, SetupEdit};
use crate::tree::{MoveTree, NodeId};

const EDIT_PREFIX: &str = "[%edit ";
const LINE_WIDTH: usize = 79;

#[derive(Debug, thiserror::Error)]
pub enum PgnError {
    #[error("no game found")]
    Empty,

    #[error("malformed tag pair: {text}")]
    BadTag { text: String },

    #[error("invalid FEN tag: {source}")]
    BadFen {
        #[from]
        source: FenError,
    },

    #[error("illegal or unreadable move '{text}' at ply {ply}")]
    IllegalMove { ply: usize, text: String },

    #[error("unbalanced variation parentheses")]
    UnbalancedVariation,

    #[error("board edit '{text}' cannot be applied: {reason}")]
    BadEdit { text: String, reason: String },
}

/// A game could not be written. The session carries on either way.
#[derive(Debug, thiserror::Error)]
#[error("cannot save game to {}: {source}", path.display())]
pub struct SaveError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Seven-tag roster plus any other tags read from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameHeaders {
    pub event: String,
    pub site: String,
    pub date: String,
    pub round: String,
    pub white: String,
    pub black: String,
    pub result: String,
    /// Remaining tags in file order, without `SetUp` and `FEN`
    pub other: Vec<(String, String)>,
}

impl Default for GameHeaders {
    fn default() -> Self {
        Self {
            event: "?".to_string(),
            site: "?".to_string(),
            date: "????.??.??".to_string(),
            round: "?".to_string(),
            white: "?".to_string(),
            black: "?".to_string(),
            result: "*".to_string(),
            other: Vec::new(),
        }
    }
}

impl GameHeaders {
    /// Headers for a game played now.
    pub fn new(event: &str, white: &str, black: &str) -> Self {
        Self {
            event: event.to_string(),
            site: "Local".to_string(),
            date: chrono::Local::now().format("%Y.%m.%d").to_string(),
            round: "1".to_string(),
            white: white.to_string(),
            black: black.to_string(),
            ..Self::default()
        }
    }

    fn set(&mut self, name: &str, value: String) {
        match name {
            "Event" => self.event = value,
            "Site" => self.site = value,
            "Date" => self.date = value,
            "Round" => self.round = value,
            "White" => self.white = value,
            "Black" => self.black = value,
            "Result" => self.result = value,
            _ => self.other.push((name.to_string(), value)),
        }
    }
}

/// Everything the serializer needs: headers, start position and the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub headers: GameHeaders,
    pub start: Position,
    pub tree: MoveTree,
}

impl GameRecord {
    pub fn new(headers: GameHeaders, start: Position) -> Self {
        Self {
            headers,
            start,
            tree: MoveTree::new(),
        }
    }

    /// Board at the tree's write cursor.
    pub fn position(&self) -> Result<Position, crate::SessionError> {
        self.tree.position_at(&self.start, self.tree.cursor())
    }
}

/// Writes `record` as one PGN game.
pub fn write_pgn<W: Write>(record: &GameRecord, mut out: W) -> io::Result<()> {
    let h = &record.headers;
    for (name, value) in [
        ("Event", &h.event),
        ("Site", &h.site),
        ("Date", &h.date),
        ("Round", &h.round),
        ("White", &h.white),
        ("Black", &h.black),
        ("Result", &h.result),
    ] {
        write_tag(&mut out, name, value)?;
    }
    let fen = record.start.to_fen();
    if fen != STARTING_FEN {
        write_tag(&mut out, "SetUp", "1")?;
        write_tag(&mut out, "FEN", &fen)?;
    }
    for (name, value) in &h.other {
        write_tag(&mut out, name, value)?;
    }
    writeln!(out)?;

    let mut tokens = Vec::new();
    if !record.tree.node(record.tree.root()).comment.is_empty() {
        tokens.push(comment_token(&record.tree.node(record.tree.root()).comment));
    }
    movetext(&record.tree, record.tree.root(), record.start.clone(), true, &mut tokens)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    tokens.push(h.result.clone());

    let mut line = String::new();
    for token in tokens {
        let glue = line.ends_with('(') || token == ")";
        if !line.is_empty() && !glue && line.len() + 1 + token.len() > LINE_WIDTH {
            writeln!(out, "{line}")?;
            line.clear();
        } else if !line.is_empty() && !glue {
            line.push(' ');
        }
        line.push_str(&token);
    }
    writeln!(out, "{line}")?;
    writeln!(out)
}

pub fn to_pgn_string(record: &GameRecord) -> String {
    let mut buf = Vec::new();
    // Writing to a Vec only fails on an unreplayable tree.
    if let Err(e) = write_pgn(record, &mut buf) {
        tracing::warn!(error = %e, "game record could not be fully exported");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn write_tag<W: Write>(out: &mut W, name: &str, value: &str) -> io::Result<()> {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    writeln!(out, "[{name} \"{escaped}\"]")
}

fn comment_token(text: &str) -> String {
    format!("{{{}}}", text.replace('}', ")"))
}

/// Appends the line below `parent` (main line first, then each
/// variation in parentheses) to `tokens`.
fn movetext(
    tree: &MoveTree,
    mut parent: NodeId,
    mut pos: Position,
    mut force_number: bool,
    tokens: &mut Vec<String>,
) -> Result<(), crate::SessionError> {
    while let Some((&main, variations)) = tree.node(parent).children().split_first() {
        let next_force = emit(tree, main, &pos, force_number, tokens);
        for &var in variations {
            tokens.push("(".to_string());
            let var_force = emit(tree, var, &pos, true, tokens);
            let mut var_pos = pos.clone();
            tree.step(&mut var_pos, var)?;
            movetext(tree, var, var_pos, var_force, tokens)?;
            tokens.push(")".to_string());
        }
        tree.step(&mut pos, main)?;
        force_number = next_force || !variations.is_empty();
        parent = main;
    }
    Ok(())
}

/// Pushes the tokens of one node; returns whether the next move needs its
/// number repeated.
fn emit(tree: &MoveTree, id: NodeId, pos: &Position, force_number: bool, tokens: &mut Vec<String>) -> bool {
    let node = tree.node(id);
    let mut text = String::new();
    match pos.side_to_move {
        chess_core::Color::White => {
            let _ = write!(text, "{}. ", pos.fullmove_number);
        }
        chess_core::Color::Black if force_number => {
            let _ = write!(text, "{}... ", pos.fullmove_number);
        }
        chess_core::Color::Black => {}
    }
    match node.mv {
        Some(mv) if mv.is_null => text.push_str("--"),
        Some(mv) => text.push_str(&pos.san(mv)),
        None => {}
    }
    tokens.push(text);

    let mut commented = false;
    if let Some(edit) = node.edit {
        tokens.push(format!("{{{EDIT_PREFIX}{edit}]}}"));
        commented = true;
    }
    if !node.comment.is_empty() {
        tokens.push(comment_token(&node.comment));
        commented = true;
    }
    commented
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Tag(String, String),
    Comment(String),
    Open,
    Close,
    Result(String),
    Move(String),
}

fn tokenize(text: &str) -> Result<Vec<Token>, PgnError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '[' => {
                chars.next();
                let mut raw = String::new();
                let mut in_quotes = false;
                let mut escaped = false;
                for ch in chars.by_ref() {
                    if ch == ']' && !in_quotes {
                        break;
                    }
                    if ch == '"' && !escaped {
                        in_quotes = !in_quotes;
                    }
                    escaped = ch == '\\' && !escaped;
                    raw.push(ch);
                }
                tokens.push(parse_tag(&raw)?);
            }
            '{' => {
                chars.next();
                let comment: String = chars.by_ref().take_while(|&ch| ch != '}').collect();
                tokens.push(Token::Comment(comment.trim().to_string()));
            }
            ';' => {
                let comment: String = chars.by_ref().take_while(|&ch| ch != '\n').collect();
                tokens.push(Token::Comment(comment[1..].trim().to_string()));
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            _ => {
                let mut word = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_whitespace() || "(){};[".contains(ch) {
                        break;
                    }
                    word.push(ch);
                    chars.next();
                }
                if let Some(token) = word_token(&word) {
                    tokens.push(token);
                }
            }
        }
    }
    Ok(tokens)
}

fn parse_tag(raw: &str) -> Result<Token, PgnError> {
    let bad = || PgnError::BadTag {
        text: raw.to_string(),
    };
    let (name, rest) = raw.trim().split_once(char::is_whitespace).ok_or_else(bad)?;
    let value = rest
        .trim()
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or_else(bad)?;
    Ok(Token::Tag(
        name.to_string(),
        value.replace("\\\"", "\"").replace("\\\\", "\\"),
    ))
}

/// Classifies a bare word: move numbers and NAGs vanish, results and
/// moves are kept.
fn word_token(word: &str) -> Option<Token> {
    if word.starts_with('$') {
        return None;
    }
    if matches!(word, "1-0" | "0-1" | "1/2-1/2" | "*") {
        return Some(Token::Result(word.to_string()));
    }
    let mv = word.trim_start_matches(|c: char| c.is_ascii_digit());
    let mv = if mv.len() < word.len() && mv.starts_with('.') {
        mv.trim_start_matches('.')
    } else {
        word
    };
    let mv = mv.trim_end_matches(['!', '?']);
    (!mv.is_empty()).then(|| Token::Move(mv.to_string()))
}

/// One level of the variation stack.
#[derive(Clone)]
struct Frame {
    node: NodeId,
    pos: Position,
    /// Where a variation opened here branches from
    before: (NodeId, Position),
    /// A `--` waiting to learn whether it records an edit
    pending_null: bool,
}

impl Frame {
    fn settle_null(&mut self) {
        if self.pending_null {
            self.pending_null = false;
            // Passing the turn never fails.
            let _ = self.pos.play(Move::NULL);
        }
    }
}

/// Reads the first game in `text`.
pub fn read_pgn(text: &str) -> Result<GameRecord, PgnError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(PgnError::Empty);
    }

    let mut headers = GameHeaders::default();
    let mut fen = None;
    let mut body = tokens.as_slice();
    while let Some((Token::Tag(name, value), rest)) = body.split_first() {
        match name.as_str() {
            "FEN" => fen = Some(value.clone()),
            "SetUp" => {}
            _ => headers.set(name, value.clone()),
        }
        body = rest;
    }
    let start = match fen {
        Some(fen) => Position::from_fen(&fen)?,
        None => Position::startpos(),
    };

    let mut tree = MoveTree::new();
    let root = tree.root();
    let mut stack = vec![Frame {
        node: root,
        pos: start.clone(),
        before: (root, start.clone()),
        pending_null: false,
    }];
    let mut ply = 0;

    for token in body {
        let frame = stack.last_mut().ok_or(PgnError::UnbalancedVariation)?;
        match token {
            Token::Tag(..) => break,
            Token::Result(result) => {
                frame.settle_null();
                if headers.result == "*" {
                    headers.result = result.clone();
                }
                break;
            }
            Token::Comment(comment) => {
                if let Some(edit_text) = comment
                    .strip_prefix(EDIT_PREFIX)
                    .and_then(|c| c.strip_suffix(']'))
                    .filter(|_| frame.pending_null)
                {
                    let edit = SetupEdit::parse(edit_text).ok_or_else(|| PgnError::BadEdit {
                        text: edit_text.to_string(),
                        reason: "unknown edit".to_string(),
                    })?;
                    setup::apply_edit(&mut frame.pos, edit).map_err(|e| PgnError::BadEdit {
                        text: edit_text.to_string(),
                        reason: e.to_string(),
                    })?;
                    tree.set_edit(frame.node, edit);
                    frame.pending_null = false;
                } else {
                    frame.settle_null();
                    tree.set_comment_at(frame.node, comment.clone());
                }
            }
            Token::Open => {
                frame.settle_null();
                let (node, pos) = frame.before.clone();
                stack.push(Frame {
                    node,
                    pos: pos.clone(),
                    before: (node, pos),
                    pending_null: false,
                });
            }
            Token::Close => {
                if stack.len() == 1 {
                    return Err(PgnError::UnbalancedVariation);
                }
                stack.pop();
            }
            Token::Move(text) => {
                frame.settle_null();
                ply += 1;
                let mv = frame.pos.parse_san(text).ok_or_else(|| PgnError::IllegalMove {
                    ply,
                    text: text.clone(),
                })?;
                let node = tree.add_child(frame.node, mv);
                frame.before = (frame.node, frame.pos.clone());
                frame.node = node;
                if mv.is_null {
                    frame.pending_null = true;
                } else {
                    frame.pos.play(mv).map_err(|_| PgnError::IllegalMove {
                        ply,
                        text: text.clone(),
                    })?;
                }
            }
        }
    }
    if stack.len() != 1 {
        return Err(PgnError::UnbalancedVariation);
    }
    if ply == 0 && headers == GameHeaders::default() && start == Position::startpos() {
        return Err(PgnError::Empty);
    }

    tree.fast_forward_to_end();
    Ok(GameRecord {
        headers,
        start,
        tree,
    })
}

/// Writes `record` to a fresh timestamped file in `dir`.
pub fn save_game(record: &GameRecord, dir: &Path) -> Result<PathBuf, SaveError> {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let mut path = dir.join(format!("game_{stamp}.pgn"));
    let mut n = 2;
    while path.exists() {
        path = dir.join(format!("game_{stamp}_{n}.pgn"));
        n += 1;
    }

    let result = fs::create_dir_all(dir)
        .and_then(|()| fs::File::create(&path))
        .and_then(|file| {
            let mut out = io::BufWriter::new(file);
            write_pgn(record, &mut out)?;
            out.flush()
        });
    match result {
        Ok(()) => {
            tracing::info!(path = %path.display(), "game saved");
            Ok(path)
        }
        Err(source) => {
            tracing::warn!(path = %path.display(), error = %source, "saving game failed");
            Err(SaveError { path, source })
        }
    }
}

#[cfg(test)]
#[path = "pgn_tests.rs"]
mod pgn_tests;
