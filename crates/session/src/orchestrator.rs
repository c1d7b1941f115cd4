//! Engine against engine on a background worker.
//!
//! The worker owns the write cursor of a shared [`MoveTree`]. Viewers read
//! the tree under the same lock through their own [`ViewCursor`], so
//! browsing never moves the worker's cursor. Run control (pause, resume,
//! stop) is a mutex-guarded state with a condition variable; it is only
//! looked at between moves, never during an oracle query.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chess_core::{Color, Move, Position, Square};

use crate::difficulty::DifficultyPolicy;
use crate::error::SessionError;
use crate::outcome::{self, Outcome};
use crate::pgn::{GameHeaders, GameRecord};
use crate::setup::{self, SetupEdit};
use crate::tree::{MoveTree, ViewCursor};

/// Which of the two engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    pub fn other(self) -> Slot {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }

    fn index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchConfig {
    /// The game is drawn after this many plies
    pub max_plies: usize,
    /// Pause after each move so a watcher can follow
    pub move_delay: Duration,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_plies: 400,
            move_delay: Duration::ZERO,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchEvent {
    MoveCommitted { ply: usize, slot: Slot, mv: Move },
    /// A king went missing and was put back before the next move
    KingsRepaired,
    Finished(Outcome),
    /// The match ends without a result
    EngineFailed { slot: Slot, message: String },
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
    Stopped,
}

struct MatchState {
    start: Position,
    position: Position,
    tree: MoveTree,
    /// Engine behind each applied move, in order
    producers: Vec<Slot>,
    outcome: Option<Outcome>,
    finished: bool,
}

type Shared = Arc<RwLock<MatchState>>;

fn read(shared: &Shared) -> RwLockReadGuard<'_, MatchState> {
    shared.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(shared: &Shared) -> RwLockWriteGuard<'_, MatchState> {
    shared.write().unwrap_or_else(PoisonError::into_inner)
}

struct Control {
    state: Mutex<RunState>,
    changed: Condvar,
}

impl Control {
    fn get(&self) -> RunState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves from `from` to `to`; returns false if the state was elsewhere.
    fn transition(&self, from: RunState, to: RunState) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state != from {
            return false;
        }
        *state = to;
        self.changed.notify_all();
        true
    }

    fn stop(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = RunState::Stopped;
        self.changed.notify_all();
    }

    /// Blocks while paused. False once stopped.
    fn wait_while_paused(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let state = self
            .changed
            .wait_while(state, |s| *s == RunState::Paused)
            .unwrap_or_else(PoisonError::into_inner);
        *state != RunState::Stopped
    }

    /// Sleeps for `delay` unless stopped first. False once stopped.
    fn sleep(&self, delay: Duration) -> bool {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let (state, _) = self
            .changed
            .wait_timeout_while(state, delay, |s| *s != RunState::Stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *state != RunState::Stopped
    }
}

/// Two policies alternating on one board, engine A first.
pub struct DualEngineOrchestrator {
    shared: Shared,
    control: Arc<Control>,
    events: Receiver<MatchEvent>,
    worker: Option<JoinHandle<()>>,
    headers: GameHeaders,
}

impl DualEngineOrchestrator {
    /// Starts the worker. A start position with missing kings is repaired
    /// first.
    pub fn start(
        a: DifficultyPolicy,
        b: DifficultyPolicy,
        start: Position,
        config: MatchConfig,
    ) -> Result<Self, SessionError> {
        let mut start = start;
        let report = setup::settle(&mut start);

        let (first, second) = (a.engine().name().to_string(), b.engine().name().to_string());
        let headers = match start.side_to_move {
            Color::White => GameHeaders::new("Engine vs Engine", &first, &second),
            Color::Black => GameHeaders::new("Engine vs Engine", &second, &first),
        };

        let shared = Arc::new(RwLock::new(MatchState {
            start: start.clone(),
            position: start,
            tree: MoveTree::new(),
            producers: Vec::new(),
            outcome: None,
            finished: false,
        }));
        let control = Arc::new(Control {
            state: Mutex::new(RunState::Running),
            changed: Condvar::new(),
        });
        let (tx, events) = mpsc::channel();
        if report.kings_repaired {
            tx.send(MatchEvent::KingsRepaired).ok();
        }

        let worker = Worker {
            policies: [a, b],
            shared: Arc::clone(&shared),
            control: Arc::clone(&control),
            events: tx,
            config,
        };
        let handle = thread::Builder::new()
            .name("match-worker".to_string())
            .spawn(move || worker.run())
            .map_err(|e| SessionError::EngineUnavailable {
                reason: format!("cannot start match worker: {e}"),
            })?;
        tracing::info!(a = %first, b = %second, "match started");

        Ok(Self {
            shared,
            control,
            events,
            worker: Some(handle),
            headers,
        })
    }

    /// Worker notifications, in order.
    pub fn events(&self) -> &Receiver<MatchEvent> {
        &self.events
    }

    /// Takes whatever events are waiting without blocking.
    pub fn drain_events(&self) -> Vec<MatchEvent> {
        self.events.try_iter().collect()
    }

    /// The worker finishes the move in flight, then waits.
    pub fn pause(&self) -> bool {
        let paused = self.control.transition(RunState::Running, RunState::Paused);
        if paused {
            tracing::debug!("match paused");
        }
        paused
    }

    pub fn resume(&self) -> bool {
        let resumed = self.control.transition(RunState::Paused, RunState::Running);
        if resumed {
            tracing::debug!("match resumed");
        }
        resumed
    }

    /// Asks the worker to exit after the move in flight.
    pub fn stop(&self) {
        self.control.stop();
    }

    pub fn run_state(&self) -> RunState {
        self.control.get()
    }

    /// The game ended, by result or by failure.
    pub fn is_finished(&self) -> bool {
        read(&self.shared).finished
    }

    pub fn outcome(&self) -> Option<Outcome> {
        read(&self.shared).outcome
    }

    /// Engines behind each applied move.
    pub fn producers(&self) -> Vec<Slot> {
        read(&self.shared).producers.clone()
    }

    pub fn ply(&self) -> usize {
        read(&self.shared).producers.len()
    }

    /// A viewer starting at the live position.
    pub fn view(&self) -> MatchView {
        let mut cursor = ViewCursor::new();
        cursor.follow(&read(&self.shared).tree);
        MatchView {
            shared: Arc::clone(&self.shared),
            cursor,
        }
    }

    /// The game so far.
    pub fn record(&self) -> GameRecord {
        let state = read(&self.shared);
        let mut headers = self.headers.clone();
        headers.result = state
            .outcome
            .map_or_else(|| "*".to_string(), |o| o.result().to_string());
        GameRecord {
            headers,
            start: state.start.clone(),
            tree: state.tree.clone(),
        }
    }

    /// Stops the worker, waits for it and returns the game.
    pub fn finish(mut self) -> GameRecord {
        self.shutdown();
        self.record()
    }

    fn shutdown(&mut self) {
        self.control.stop();
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                tracing::warn!("match worker panicked");
            }
        }
    }
}

impl Drop for DualEngineOrchestrator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct Worker {
    policies: [DifficultyPolicy; 2],
    shared: Shared,
    control: Arc<Control>,
    events: Sender<MatchEvent>,
    config: MatchConfig,
}

impl Worker {
    fn run(mut self) {
        let mut slot = Slot::A;
        loop {
            if !self.control.wait_while_paused() {
                self.send(MatchEvent::Stopped);
                break;
            }
            let Some(pos) = self.prepare() else {
                break;
            };

            // Only this engine's own mutex is held during the query.
            let chosen = self.policies[slot.index()].select_move(&pos);
            let mv = match chosen {
                Ok(mv) => mv,
                Err(e) => {
                    self.fail(slot, e.to_string());
                    break;
                }
            };
            if !self.apply(slot, mv) {
                break;
            }

            slot = slot.other();
            if !self.config.move_delay.is_zero() && !self.control.sleep(self.config.move_delay) {
                self.send(MatchEvent::Stopped);
                break;
            }
        }
        self.control.stop();
        tracing::info!("match worker exited");
    }

    fn send(&self, event: MatchEvent) {
        // A dropped receiver only means nobody is listening.
        self.events.send(event).ok();
    }

    /// Repairs kings and checks for the end; returns the position to search.
    fn prepare(&self) -> Option<Position> {
        let mut state = write(&self.shared);
        if !state.position.has_both_kings() {
            let mut pos = state.position.clone();
            if setup::apply_edit(&mut pos, SetupEdit::RepairKings).is_ok() {
                state.tree.apply_edit(SetupEdit::RepairKings);
                state.position = pos;
                self.send(MatchEvent::KingsRepaired);
            }
        }
        let end = outcome::game_over(&state.position).or_else(|| {
            (state.producers.len() >= self.config.max_plies).then_some(Outcome::MoveLimit)
        });
        if let Some(outcome) = end {
            self.conclude(&mut state, outcome);
            return None;
        }
        Some(state.position.clone())
    }

    /// Applies `mv` for `slot`. False when the game is over.
    fn apply(&self, slot: Slot, mv: Move) -> bool {
        let mut state = write(&self.shared);
        let mv = outcome::with_default_promotion(&state.position, mv);
        if let Some(outcome) = outcome::king_capture(&state.position, mv) {
            tracing::warn!(?slot, %mv, "engine move would capture a king");
            self.conclude(&mut state, outcome);
            return false;
        }
        if state.position.play(mv).is_err() {
            drop(state);
            self.fail(slot, format!("illegal move {mv}"));
            return false;
        }
        state.tree.apply_move(mv);
        state.producers.push(slot);
        let ply = state.producers.len() - 1;
        tracing::debug!(ply, ?slot, %mv, "match move");
        self.send(MatchEvent::MoveCommitted { ply, slot, mv });

        if let Some(outcome) = outcome::game_over(&state.position) {
            self.conclude(&mut state, outcome);
            return false;
        }
        true
    }

    fn conclude(&self, state: &mut MatchState, outcome: Outcome) {
        tracing::info!(%outcome, plies = state.producers.len(), "match finished");
        state.outcome = Some(outcome);
        state.finished = true;
        self.send(MatchEvent::Finished(outcome));
    }

    fn fail(&self, slot: Slot, message: String) {
        tracing::warn!(?slot, %message, "engine failed, match abandoned");
        write(&self.shared).finished = true;
        self.send(MatchEvent::EngineFailed { slot, message });
    }
}

/// Read-only browser over a running match.
pub struct MatchView {
    shared: Shared,
    cursor: ViewCursor,
}

/// What a viewer shows at its cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub position: Position,
    pub highlights: Vec<Square>,
    /// Moves from the start to the viewed position
    pub ply: usize,
    /// Whole game so far in standard notation
    pub move_list: Vec<String>,
    /// The viewer sits on the latest move
    pub live: bool,
    pub outcome: Option<Outcome>,
}

impl MatchView {
    pub fn snapshot(&self) -> ViewSnapshot {
        let state = read(&self.shared);
        let node = self.cursor.node();
        let position = state
            .tree
            .position_at(&state.start, node)
            .unwrap_or_else(|_| state.position.clone());
        ViewSnapshot {
            position,
            highlights: state
                .tree
                .node(node)
                .mv
                .and_then(|mv| mv.squares())
                .map(|(from, to)| vec![from, to])
                .unwrap_or_default(),
            ply: state.tree.depth_of(node),
            move_list: state.tree.main_line_san(&state.start),
            live: node == state.tree.cursor(),
            outcome: state.outcome,
        }
    }

    fn step(&mut self, f: impl FnOnce(&mut ViewCursor, &MoveTree)) -> ViewSnapshot {
        {
            let state = read(&self.shared);
            f(&mut self.cursor, &state.tree);
        }
        self.snapshot()
    }

    pub fn forward(&mut self) -> ViewSnapshot {
        self.step(|cursor, tree| {
            cursor.forward(tree);
        })
    }

    pub fn backward(&mut self) -> ViewSnapshot {
        self.step(|cursor, tree| {
            cursor.backward(tree);
        })
    }

    pub fn to_start(&mut self) -> ViewSnapshot {
        self.step(|cursor, _| cursor.to_start())
    }

    pub fn to_end(&mut self) -> ViewSnapshot {
        self.step(|cursor, tree| cursor.to_end(tree))
    }

    /// Jumps to the latest move.
    pub fn follow_live(&mut self) -> ViewSnapshot {
        self.step(|cursor, tree| cursor.follow(tree))
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod orchestrator_tests;
