//! Typed lines to session intents.

use chess_core::{coord_to_sq, kind_from_char, Position};
use session::{DifficultyLevel, Intent, SetupEdit};

/// One line of user input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    /// Line from a named registry engine instead of the opponent
    AnalyseWith(String),
    Save,
    Board,
    Moves,
    /// Turn the board around
    Flip,
    Help,
    Quit,
}

pub const HELP: &str = "\
Moves:      e4, Nf3, e7e8q, or click e2 then click e4
            promote <q|r|b|n> after a pending promotion
Navigation: undo, redo, start, end, goto <ply>
Engine:     hint, analyse [engine], auto, speed <1-10>, level <name>
Game:       fen <FEN>, reset, resign, save, board, flip, moves
Setup:      setup (toggle), place <sq> <piece>, remove <sq>,
            relocate <from> <to>, clear, repair
Other:      help, quit";

/// Parses a line typed at `pos`. A lone word that is not a keyword is
/// read as a move.
pub fn parse_command(line: &str, pos: &Position) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let intent = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(Command::Board),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        "save" => return Ok(Command::Save),
        "board" => return Ok(Command::Board),
        "moves" => return Ok(Command::Moves),
        "flip" => return Ok(Command::Flip),
        "undo" | "back" => Intent::Undo,
        "redo" | "forward" => Intent::Redo,
        "start" => Intent::RewindToStart,
        "end" => Intent::FastForwardToEnd,
        "goto" => Intent::GoTo(
            rest.parse()
                .map_err(|_| format!("goto takes a ply number, got '{rest}'"))?,
        ),
        "hint" => Intent::Hint,
        "analyse" | "analyze" if rest.is_empty() => Intent::Analyse,
        "analyse" | "analyze" => return Ok(Command::AnalyseWith(rest.to_string())),
        "auto" => Intent::ToggleAutoplay,
        "speed" => Intent::SetSpeed(
            rest.parse()
                .map_err(|_| format!("speed takes a number from 1 to 10, got '{rest}'"))?,
        ),
        "level" => Intent::SetDifficulty(rest.parse::<DifficultyLevel>()?),
        "fen" => Intent::LoadFen(rest.to_string()),
        "reset" => Intent::Reset,
        "resign" => Intent::Resign,
        "setup" => Intent::ToggleSetupMode,
        "promote" => {
            let mut chars = rest.chars();
            match (chars.next().and_then(kind_from_char), chars.next()) {
                (Some(kind), None) => Intent::Promote(kind),
                _ => return Err(format!("promote takes one of q, r, b, n, got '{rest}'")),
            }
        }
        "click" => Intent::SelectSquare(
            coord_to_sq(rest).ok_or_else(|| format!("not a square: '{rest}'"))?,
        ),
        "place" | "remove" | "relocate" | "clear" | "repair" => {
            let edit = SetupEdit::parse(&normalize_edit(line))
                .ok_or_else(|| format!("cannot read setup edit '{line}'"))?;
            Intent::Setup(edit)
        }
        _ if rest.is_empty() => {
            let mv = pos
                .parse_san(word)
                .ok_or_else(|| format!("unknown command or illegal move '{word}'"))?;
            Intent::Move(mv)
        }
        _ => return Err(format!("unknown command '{word}'")),
    };
    Ok(Command::Intent(intent))
}

/// Lowercases keywords and squares but not a piece letter, whose case
/// carries the colour.
fn normalize_edit(line: &str) -> String {
    line.split_whitespace()
        .map(|token| {
            if token.len() == 1 {
                token.to_string()
            } else {
                token.to_ascii_lowercase()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod input_tests;
