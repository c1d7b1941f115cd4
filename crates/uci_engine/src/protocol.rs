//! Text of the UCI protocol, both directions.
//!
//! Only the subset a GUI needs to drive an engine is understood; anything
//! else an engine prints is passed through as [`EngineMessage::Other`].

use chess_core::{Position, SearchLimits};

/// Score as reported on an `info` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Centipawns(i32),
    /// Mate in N moves; negative when the engine is being mated
    Mate(i32),
}

impl Score {
    /// Centipawn view, with mates mapped far outside material range.
    pub fn as_centipawns(self) -> i32 {
        match self {
            Score::Centipawns(cp) => cp,
            Score::Mate(n) if n >= 0 => 100_000 - n,
            Score::Mate(n) => -100_000 - n,
        }
    }
}

/// Engine analysis information from one `info` line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineInfo {
    pub depth: Option<u8>,
    pub seldepth: Option<u8>,
    pub time_ms: Option<u64>,
    pub nodes: Option<u64>,
    pub score: Option<Score>,
    /// Principal variation as raw UCI tokens
    pub pv: Vec<String>,
    pub multipv: Option<u8>,
}

/// One line received from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineMessage {
    IdName(String),
    UciOk,
    ReadyOk,
    Info(EngineInfo),
    /// `None` when the engine has no move to offer (`(none)` or `0000`)
    BestMove {
        mv: Option<String>,
        ponder: Option<String>,
    },
    Other(String),
}

pub fn parse_line(line: &str) -> EngineMessage {
    let mut tokens = line.split_whitespace();
    match tokens.next() {
        Some("uciok") => EngineMessage::UciOk,
        Some("readyok") => EngineMessage::ReadyOk,
        Some("id") if tokens.next() == Some("name") => {
            EngineMessage::IdName(tokens.collect::<Vec<_>>().join(" "))
        }
        Some("info") => EngineMessage::Info(parse_info(tokens)),
        Some("bestmove") => {
            let mv = tokens
                .next()
                .filter(|&m| m != "(none)" && m != "0000")
                .map(str::to_string);
            let ponder = match (tokens.next(), tokens.next()) {
                (Some("ponder"), Some(p)) => Some(p.to_string()),
                _ => None,
            };
            EngineMessage::BestMove { mv, ponder }
        }
        _ => EngineMessage::Other(line.trim().to_string()),
    }
}

fn parse_info<'a>(mut tokens: impl Iterator<Item = &'a str>) -> EngineInfo {
    let mut info = EngineInfo::default();
    while let Some(key) = tokens.next() {
        match key {
            "depth" => info.depth = tokens.next().and_then(|v| v.parse().ok()),
            "seldepth" => info.seldepth = tokens.next().and_then(|v| v.parse().ok()),
            "time" => info.time_ms = tokens.next().and_then(|v| v.parse().ok()),
            "nodes" => info.nodes = tokens.next().and_then(|v| v.parse().ok()),
            "multipv" => info.multipv = tokens.next().and_then(|v| v.parse().ok()),
            "score" => {
                info.score = match (tokens.next(), tokens.next().and_then(|v| v.parse().ok())) {
                    (Some("cp"), Some(v)) => Some(Score::Centipawns(v)),
                    (Some("mate"), Some(v)) => Some(Score::Mate(v)),
                    _ => None,
                };
            }
            // pv runs to the end of the line
            "pv" => {
                info.pv = tokens.by_ref().map(str::to_string).collect();
            }
            // string runs to the end of the line and carries no data we use
            "string" => break,
            _ => {}
        }
    }
    info
}

/// Parameters for the `go` command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoParams {
    pub depth: Option<u8>,
    pub movetime_ms: Option<u64>,
}

impl GoParams {
    pub fn from_limits(limits: &SearchLimits) -> Self {
        let movetime_ms = limits.move_time.map(|t| t.as_millis() as u64);
        // Unbounded depth comes from time-only limits.
        let depth = (limits.depth != u8::MAX || movetime_ms.is_none()).then_some(limits.depth);
        GoParams { depth, movetime_ms }
    }

    pub fn to_command(self) -> String {
        let mut cmd = String::from("go");
        if let Some(depth) = self.depth {
            cmd.push_str(&format!(" depth {depth}"));
        }
        if let Some(ms) = self.movetime_ms {
            cmd.push_str(&format!(" movetime {ms}"));
        }
        cmd
    }
}

pub fn position_command(pos: &Position) -> String {
    format!("position fen {}", pos.to_fen())
}

pub fn setoption_command(name: &str, value: &str) -> String {
    if value.is_empty() {
        format!("setoption name {name}")
    } else {
        format!("setoption name {name} value {value}")
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod protocol_tests;
