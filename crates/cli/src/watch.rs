//! Watching an engine match, with pause and history browsing.

use std::io::{self, Write};
use std::path::Path;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use anyhow::Result;
use chess_core::Color;
use session::pgn::save_game;
use session::{DualEngineOrchestrator, MatchEvent, ViewSnapshot};

use crate::interactive::spawn_stdin_reader;
use crate::render;

const HELP: &str = "\
pause, resume, stop
back, forward, start, end, live (browse without stopping the match)
moves, help";

const POLL: Duration = Duration::from_millis(50);

/// Prints the match as it goes; returns when it ends or the user stops it.
/// The finished game is saved under `save_dir`.
pub fn run(orch: DualEngineOrchestrator, save_dir: &Path) -> Result<()> {
    let lines = spawn_stdin_reader()?;
    let mut view = orch.view();
    let mut following = true;
    println!("{HELP}\n");

    loop {
        // Read before draining so the final events are printed.
        let finished = orch.is_finished();
        for event in orch.drain_events() {
            match event {
                MatchEvent::MoveCommitted { ply, slot, mv } => {
                    println!("ply {}: engine {slot:?} plays {mv}", ply + 1);
                    if following {
                        show(&view.follow_live());
                    }
                }
                MatchEvent::KingsRepaired => println!("kings restored to their home squares"),
                MatchEvent::Finished(outcome) => println!("game over: {outcome} ({})", outcome.result()),
                MatchEvent::EngineFailed { slot, message } => {
                    println!("engine {slot:?} failed: {message}");
                }
                MatchEvent::Stopped => println!("match stopped"),
            }
        }
        if finished {
            break;
        }

        match lines.recv_timeout(POLL) {
            Ok(line) => {
                let snapshot = match line.trim() {
                    "pause" => {
                        orch.pause();
                        None
                    }
                    "resume" => {
                        orch.resume();
                        None
                    }
                    "stop" | "quit" => break,
                    "back" => {
                        following = false;
                        Some(view.backward())
                    }
                    "forward" => Some(view.forward()),
                    "start" => {
                        following = false;
                        Some(view.to_start())
                    }
                    "end" => Some(view.to_end()),
                    "live" => {
                        following = true;
                        Some(view.follow_live())
                    }
                    "moves" => {
                        println!("{}", render::move_list(&view.snapshot().move_list));
                        None
                    }
                    _ => {
                        println!("{HELP}");
                        None
                    }
                };
                if let Some(snapshot) = snapshot {
                    following = following || snapshot.live;
                    show(&snapshot);
                }
                print!("> ");
                io::stdout().flush().ok();
            }
            Err(RecvTimeoutError::Timeout) => {}
            // Input closed; keep watching until the game ends.
            Err(RecvTimeoutError::Disconnected) => std::thread::sleep(POLL),
        }
    }

    let outcome = orch.outcome();
    let record = orch.finish();
    if outcome.is_none() {
        println!("match ended without a result");
    }
    match save_game(&record, save_dir) {
        Ok(path) => println!("saved {}", path.display()),
        Err(e) => println!("{e}"),
    }
    Ok(())
}

fn show(snapshot: &ViewSnapshot) {
    println!(
        "{}\nply {}{}",
        render::board(&snapshot.position, &snapshot.highlights, Color::White),
        snapshot.ply,
        if snapshot.live { " (live)" } else { "" }
    );
}
