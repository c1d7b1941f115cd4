//! External engines over UCI.
//!
//! [`UciEngine`] launches an engine program, performs the `uci`/`isready`
//! handshake and answers [`Engine`] queries by sending `position fen ...`
//! followed by `go`. Lines from the engine are read on a dedicated thread
//! so every wait can be bounded.

pub mod protocol;

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chess_core::{parse_uci_line, Engine, EngineError, Position, SearchLimits, SearchResult};

pub use protocol::{EngineInfo, EngineMessage, GoParams, Score};

/// How long the engine gets to finish the handshake or answer `isready`.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound on waiting for `bestmove` beyond the requested move time.
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(60);

/// How long an overdue search gets to answer `stop` before the engine is
/// shut down.
const STOP_GRACE: Duration = Duration::from_secs(2);

/// Grace period after `quit` before the process is killed.
const QUIT_GRACE: Duration = Duration::from_millis(500);

/// A running UCI engine process.
pub struct UciEngine {
    name: String,
    id_name: Option<String>,
    child: Child,
    stdin: Option<ChildStdin>,
    lines: Receiver<String>,
    reader: Option<JoinHandle<()>>,
    reply_timeout: Duration,
}

impl std::fmt::Debug for UciEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UciEngine")
            .field("name", &self.name)
            .field("id_name", &self.id_name)
            .field("pid", &self.child.id())
            .finish()
    }
}

impl UciEngine {
    /// Starts `path` with `args`, completes the handshake and applies
    /// `options` in order.
    pub fn launch(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        args: &[String],
        options: &[(String, String)],
    ) -> Result<Self, EngineError> {
        let name = name.into();
        let path = path.as_ref();
        let mut child = Command::new(path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| EngineError::Unavailable {
                name: name.clone(),
                reason: format!("cannot start {}: {e}", path.display()),
            })?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(EngineError::Unavailable {
                    name,
                    reason: "engine pipes were not opened".to_string(),
                });
            }
        };

        let (tx, lines) = mpsc::channel();
        let reader_name = name.clone();
        let reader = thread::Builder::new()
            .name(format!("uci-{name}"))
            .spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    let Ok(line) = line else { break };
                    tracing::trace!(engine = %reader_name, "<- {line}");
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            })
            .map_err(|source| EngineError::Io {
                name: name.clone(),
                source,
            })?;

        let mut engine = UciEngine {
            name,
            id_name: None,
            child,
            stdin: Some(stdin),
            lines,
            reader: Some(reader),
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
        };

        engine.send("uci")?;
        engine.id_name = engine.wait_for(HANDSHAKE_TIMEOUT, {
            let mut id = None;
            move |msg| match msg {
                EngineMessage::IdName(n) => {
                    id = Some(n);
                    None
                }
                EngineMessage::UciOk => Some(id.take()),
                _ => None,
            }
        })?;

        for (option, value) in options {
            engine.send(&protocol::setoption_command(option, value))?;
        }
        engine.sync()?;

        tracing::info!(
            engine = %engine.name,
            id = engine.id_name.as_deref().unwrap_or("?"),
            "engine ready"
        );
        Ok(engine)
    }

    /// The name the engine reports for itself, if it sent one.
    pub fn id_name(&self) -> Option<&str> {
        self.id_name.as_deref()
    }

    pub fn set_reply_timeout(&mut self, timeout: Duration) {
        self.reply_timeout = timeout;
    }

    /// Sends `isready` and waits for `readyok`.
    pub fn sync(&mut self) -> Result<(), EngineError> {
        self.send("isready")?;
        self.wait_for(HANDSHAKE_TIMEOUT, |msg| {
            matches!(msg, EngineMessage::ReadyOk).then_some(())
        })
    }

    fn send(&mut self, command: &str) -> Result<(), EngineError> {
        let stdin = self.stdin.as_mut().ok_or_else(|| EngineError::Unavailable {
            name: self.name.clone(),
            reason: "engine has quit".to_string(),
        })?;
        tracing::trace!(engine = %self.name, "-> {command}");
        writeln!(stdin, "{command}")
            .and_then(|()| stdin.flush())
            .map_err(|source| EngineError::Io {
                name: self.name.clone(),
                source,
            })
    }

    /// Stops an overdue search and swallows its `bestmove` so it cannot
    /// answer a later `go`. An engine that stays silent is shut down.
    fn abandon_search(&mut self) {
        let stopped = self.send("stop").is_ok()
            && self
                .wait_for(STOP_GRACE, |msg| {
                    matches!(msg, EngineMessage::BestMove { .. }).then_some(())
                })
                .is_ok();
        if !stopped {
            tracing::warn!(engine = %self.name, "engine did not stop searching, shutting it down");
            self.quit();
        }
    }

    /// Feeds engine lines to `accept` until it yields a value or `timeout`
    /// passes.
    fn wait_for<T>(
        &mut self,
        timeout: Duration,
        mut accept: impl FnMut(EngineMessage) -> Option<T>,
    ) -> Result<T, EngineError> {
        let deadline = Instant::now() + timeout;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.lines.recv_timeout(left) {
                Ok(line) => {
                    if let Some(value) = accept(protocol::parse_line(&line)) {
                        return Ok(value);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(EngineError::Unavailable {
                        name: self.name.clone(),
                        reason: format!("no reply within {timeout:?}"),
                    });
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(EngineError::Unavailable {
                        name: self.name.clone(),
                        reason: "engine process exited".to_string(),
                    });
                }
            }
        }
    }
}

impl Engine for UciEngine {
    fn search(&mut self, pos: &Position, limits: SearchLimits) -> Result<SearchResult, EngineError> {
        if !pos.is_playable() {
            return Err(EngineError::UnplayablePosition { fen: pos.to_fen() });
        }

        let stale = self.lines.try_iter().count();
        if stale > 0 {
            tracing::debug!(engine = %self.name, stale, "discarded leftover engine output");
        }

        let go = GoParams::from_limits(&limits);
        self.send(&protocol::position_command(pos))?;
        self.send(&go.to_command())?;

        let timeout = limits.move_time.unwrap_or_default() + self.reply_timeout;
        let mut last = EngineInfo::default();
        let reply = self.wait_for(timeout, |msg| match msg {
            EngineMessage::Info(info) => {
                // Keep the deepest line that actually carries a variation.
                if !info.pv.is_empty() && info.multipv.unwrap_or(1) == 1 {
                    last = info;
                }
                None
            }
            EngineMessage::BestMove { mv, .. } => Some((mv, std::mem::take(&mut last))),
            _ => None,
        });
        let (best, info) = match reply {
            Ok(reply) => reply,
            Err(err) => {
                self.abandon_search();
                return Err(err);
            }
        };

        let best_move = match best {
            Some(text) => Some(pos.parse_uci(&text).ok_or_else(|| EngineError::Protocol {
                name: self.name.clone(),
                line: format!("bestmove {text}"),
            })?),
            None => None,
        };

        let tokens: Vec<&str> = info.pv.iter().map(String::as_str).collect();
        let mut pv = parse_uci_line(pos, &tokens);
        // The reported line must lead with the move actually chosen.
        if pv.first().copied() != best_move {
            pv = best_move.into_iter().collect();
        }

        Ok(SearchResult {
            best_move,
            pv,
            score: info.score.map(Score::as_centipawns).unwrap_or(0),
            depth: info.depth.unwrap_or(0),
            nodes: info.nodes.unwrap_or(0),
            stopped: false,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn new_game(&mut self) -> Result<(), EngineError> {
        self.send("ucinewgame")?;
        self.sync()
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<bool, EngineError> {
        self.send(&protocol::setoption_command(name, value))?;
        self.sync()?;
        Ok(true)
    }

    fn quit(&mut self) {
        if self.stdin.is_none() {
            return;
        }
        let _ = self.send("quit");
        // Closing stdin is a second hint for engines that ignore `quit`.
        self.stdin = None;

        let deadline = Instant::now() + QUIT_GRACE;
        loop {
            match self.child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) if Instant::now() < deadline => thread::sleep(Duration::from_millis(10)),
                _ => {
                    tracing::warn!(engine = %self.name, "engine ignored quit, killing it");
                    let _ = self.child.kill();
                    let _ = self.child.wait();
                    break;
                }
            }
        }
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
        tracing::debug!(engine = %self.name, "engine stopped");
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        self.quit();
    }
}
