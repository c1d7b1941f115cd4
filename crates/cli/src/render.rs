//! Text board for the terminal.

use chess_core::{color_name, square_at, Color, Position, Square};

/// Draws `pos` from `perspective`'s side. Highlighted empty squares show
/// `*`, highlighted pieces are wrapped in brackets.
pub fn board(pos: &Position, highlights: &[Square], perspective: Color) -> String {
    let mut out = String::new();
    let ranks: Vec<usize> = match perspective {
        Color::White => (0..8).rev().collect(),
        Color::Black => (0..8).collect(),
    };
    let files: Vec<usize> = match perspective {
        Color::White => (0..8).collect(),
        Color::Black => (0..8).rev().collect(),
    };

    for &rank in &ranks {
        out.push_str(&format!("{} ", rank + 1));
        for &file in &files {
            let Some(sq) = square_at(file, rank) else {
                continue;
            };
            let lit = highlights.contains(&sq);
            let cell = match (pos.piece_at(sq), lit) {
                (Some(piece), true) => format!("[{}]", piece.to_char()),
                (Some(piece), false) => format!(" {} ", piece.to_char()),
                (None, true) => " * ".to_string(),
                (None, false) => " . ".to_string(),
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }
    out.push_str("  ");
    for &file in &files {
        out.push_str(&format!(" {} ", (b'a' + file as u8) as char));
    }
    out.push('\n');
    out.push_str(&format!("{} to move", color_name(pos.side_to_move)));
    if pos.is_check() {
        out.push_str(", check");
    }
    out
}

/// Numbered move list, two plies per line.
pub fn move_list(sans: &[String]) -> String {
    sans.chunks(2)
        .enumerate()
        .map(|(i, pair)| format!("{:>3}. {}", i + 1, pair.join(" ")))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;
