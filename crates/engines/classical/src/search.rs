//! Negamax search with alpha-beta pruning and iterative deepening.

use chess_core::{rules, TimeControl};
use cozy_chess::{Board, GameStatus, Move};

use crate::eval::{evaluate, piece_value};

/// Score of being checkmated at the root; mates further away score closer to zero.
pub const MATE: i32 = 100_000;

/// Result of a search indicating whether it completed or was stopped.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Best move found (if any legal moves exist)
    pub best_move: Option<Move>,
    /// Principal variation in rules-oracle encoding, starting with `best_move`
    pub pv: Vec<Move>,
    pub score: i32,
    /// Deepest iteration that completed
    pub depth: u8,
    /// True if search was stopped early due to time
    pub stopped: bool,
}

/// Searches one iteration per depth up to `max_depth`, keeping the result
/// of the last iteration that finished before the clock ran out.
pub fn iterative_deepening(
    board: &Board,
    max_depth: u8,
    nodes: &mut u64,
    tc: &TimeControl,
) -> SearchOutcome {
    let moves = ordered_moves(board, None);
    if moves.is_empty() {
        return SearchOutcome::default();
    }

    let mut searcher = Searcher {
        tc,
        nodes: 0,
        history: vec![board.hash()],
    };
    let mut outcome = SearchOutcome {
        best_move: moves.first().copied(),
        pv: moves.first().copied().into_iter().collect(),
        ..SearchOutcome::default()
    };

    for depth in 1..=max_depth.max(1) {
        let mut pv = Vec::new();
        let (score, stopped) = searcher.root(board, depth, outcome.best_move, &mut pv);
        if stopped {
            outcome.stopped = true;
            // A partial first iteration still beats an arbitrary move.
            if depth == 1 && !pv.is_empty() {
                outcome.best_move = pv.first().copied();
                outcome.pv = pv;
                outcome.score = score;
            }
            break;
        }

        tracing::trace!(depth, score, nodes = searcher.nodes, "iteration complete");
        outcome.best_move = pv.first().copied();
        outcome.pv = pv;
        outcome.score = score;
        outcome.depth = depth;

        if score.abs() >= MATE - i32::from(max_depth) {
            break;
        }
    }

    *nodes += searcher.nodes;
    outcome
}

struct Searcher<'a> {
    tc: &'a TimeControl,
    nodes: u64,
    history: Vec<u64>,
}

impl Searcher<'_> {
    fn root(
        &mut self,
        board: &Board,
        depth: u8,
        first: Option<Move>,
        pv: &mut Vec<Move>,
    ) -> (i32, bool) {
        let mut alpha = -MATE - 1;
        let beta = MATE + 1;

        for mv in ordered_moves(board, first) {
            if self.tc.should_check_time(self.nodes) && self.tc.check_time() {
                return (alpha, true);
            }

            let mut child = board.clone();
            child.play_unchecked(mv);
            self.history.push(child.hash());
            self.nodes += 1;

            let mut line = Vec::new();
            let (score, stopped) = self.negamax(&child, depth - 1, 1, -beta, -alpha, &mut line);
            let score = -score;
            self.history.pop();

            if stopped {
                return (alpha, true);
            }

            if score > alpha {
                alpha = score;
                pv.clear();
                pv.push(mv);
                pv.extend(line);
            }
        }

        (alpha, false)
    }

    /// Returns (score, stopped) where stopped indicates the search was
    /// aborted because time ran out.
    fn negamax(
        &mut self,
        board: &Board,
        depth: u8,
        ply: u8,
        mut alpha: i32,
        beta: i32,
        pv: &mut Vec<Move>,
    ) -> (i32, bool) {
        if self.tc.should_check_time(self.nodes) && self.tc.check_time() {
            return (0, true);
        }

        match board.status() {
            GameStatus::Won => return (-MATE + i32::from(ply), false),
            GameStatus::Drawn => return (0, false),
            GameStatus::Ongoing => {}
        }

        let key = board.hash();
        if self.history.iter().filter(|&&k| k == key).count() >= 3 {
            return (0, false); // threefold repetition
        }

        if depth == 0 {
            return (evaluate(board), false);
        }

        let mut best = -MATE - 1;
        for mv in ordered_moves(board, None) {
            let mut child = board.clone();
            child.play_unchecked(mv);
            self.history.push(child.hash());
            self.nodes += 1;

            let mut line = Vec::new();
            let (score, stopped) =
                self.negamax(&child, depth - 1, ply + 1, -beta, -alpha, &mut line);
            let score = -score;
            self.history.pop();

            if stopped {
                return (best, true);
            }

            if score > best {
                best = score;
            }
            if best > alpha {
                alpha = best;
                pv.clear();
                pv.push(mv);
                pv.extend(line);
            }
            if alpha >= beta {
                break; // Beta cutoff
            }
        }

        (best, false)
    }
}

/// Legal moves with `first` leading, then captures by victim value.
fn ordered_moves(board: &Board, first: Option<Move>) -> Vec<Move> {
    let them = !board.side_to_move();
    let mut moves = rules::native_moves(board);
    moves.sort_by_key(|mv| {
        if Some(*mv) == first {
            return i32::MIN;
        }
        match board.color_on(mv.to) {
            Some(color) if color == them => {
                -board.piece_on(mv.to).map(piece_value).unwrap_or(0) - 1
            }
            _ => 0,
        }
    });
    moves
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
