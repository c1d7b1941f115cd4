//! Line-driven front end for a [`SessionController`].
//!
//! Stdin is read on its own thread so autoplay can tick while the user
//! is not typing.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use chess_core::{color_name, sq_to_coord, Color, SearchLimits};
use session::pgn::save_game;
use session::{EngineRegistry, Intent, Notice, SessionController, Update};

use crate::input::{parse_command, Command, HELP};
use crate::render;

/// Idle wait between input checks when autoplay is off.
const IDLE_POLL: Duration = Duration::from_secs(3600);

pub struct Terminal {
    session: SessionController,
    registry: EngineRegistry,
    save_dir: PathBuf,
    perspective: Color,
}

impl Terminal {
    pub fn new(session: SessionController, registry: EngineRegistry, save_dir: PathBuf) -> Self {
        let perspective = session.mode().human().unwrap_or(Color::White);
        Self {
            session,
            registry,
            save_dir,
            perspective,
        }
    }

    /// Runs until `quit` or end of input, then offers the game back.
    pub fn run(mut self) -> Result<SessionController> {
        let lines = spawn_stdin_reader()?;
        println!("{HELP}\n");

        let update = self.session.start()?;
        self.show(&update);
        self.prompt();

        loop {
            let wait = if self.session.autoplay() {
                self.session.autoplay_interval()
            } else {
                IDLE_POLL
            };
            match lines.recv_timeout(wait) {
                Ok(line) => {
                    if !self.on_line(&line) {
                        break;
                    }
                    self.prompt();
                }
                Err(RecvTimeoutError::Timeout) => {
                    if self.session.autoplay() {
                        let update = self.session.autoplay_step()?;
                        self.show(&update);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        Ok(self.session)
    }

    /// False on quit.
    fn on_line(&mut self, line: &str) -> bool {
        let command = match parse_command(line, self.session.position()) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                return true;
            }
        };
        let result = match command {
            Command::Quit | Command::Intent(Intent::Quit) => return false,
            Command::Help => {
                println!("{HELP}");
                return true;
            }
            Command::Board => Ok(self.session.snapshot()),
            Command::Flip => {
                self.perspective = !self.perspective;
                Ok(self.session.snapshot())
            }
            Command::Moves => {
                println!("{}", render::move_list(&self.session.move_list()));
                return true;
            }
            Command::Save => {
                self.save();
                return true;
            }
            Command::AnalyseWith(name) => match self.registry.get(&name) {
                Some(engine) => self
                    .session
                    .analyse_with(&engine, SearchLimits::time(Duration::from_secs(1))),
                None => {
                    println!("no engine named '{name}' (have: {})", self.registry.names().join(", "));
                    return true;
                }
            },
            Command::Intent(intent) => self.session.handle(intent),
        };
        match result {
            Ok(update) => self.show(&update),
            Err(e) => println!("{e}"),
        }
        true
    }

    fn save(&self) {
        match save_game(&self.session.record(), &self.save_dir) {
            Ok(path) => println!("saved {}", path.display()),
            Err(e) => println!("{e}"),
        }
    }

    fn show(&self, update: &Update) {
        println!("{}", render::board(&update.position, &update.highlights, self.perspective));
        for notice in &update.notices {
            println!("{}", describe(notice));
        }
        if update.promotion_pending {
            println!("promote to? (promote q|r|b|n)");
        }
        if self.session.setup_mode() {
            println!("[setup mode]");
        }
    }

    fn prompt(&self) {
        print!("> ");
        // Prompt only; a failed flush shows up on the next println.
        io::stdout().flush().ok();
    }
}

fn describe(notice: &Notice) -> String {
    match notice {
        Notice::KingsRepaired => "kings restored to their home squares".to_string(),
        Notice::MissingKing(color) => format!("{} has no king and its home square is taken", color_name(*color)),
        Notice::FuturePruned { discarded } => format!("discarded {discarded} later moves"),
        Notice::EngineMoved(mv) => format!("engine plays {mv}"),
        Notice::EngineFault(reason) => format!("engine problem: {reason}"),
        Notice::AutoplayStopped => "autoplay stopped".to_string(),
        Notice::Hint(mv) => match mv.squares() {
            Some((from, to)) => format!("hint: {} to {}", sq_to_coord(from), sq_to_coord(to)),
            None => "hint: pass".to_string(),
        },
        Notice::Line { engine, moves } => format!("{engine}: {}", moves.join(" ")),
        Notice::GameOver(outcome) => format!("game over: {outcome} ({})", outcome.result()),
    }
}

pub(crate) fn spawn_stdin_reader() -> Result<Receiver<String>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("failed to start input thread")?;
    Ok(rx)
}

#[cfg(test)]
#[path = "interactive_tests.rs"]
mod interactive_tests;
