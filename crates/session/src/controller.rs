//! One human against one automated opponent, or free analysis.
//!
//! The controller owns the start position, the move tree and the live
//! board. The live board is always the start position with the path to the
//! tree's cursor replayed; navigation re-derives it instead of keeping
//! per-node snapshots.
//!
//! The display layer talks to it through [`Intent`] values and gets an
//! [`Update`] back for every one of them.

use std::time::Duration;

use chess_core::{color_name, Color, Move, PieceKind, Position, SearchLimits, Square};

use crate::difficulty::{DifficultyLevel, DifficultyPolicy};
use crate::engine::EngineHandle;
use crate::error::SessionError;
use crate::outcome::{self, Outcome};
use crate::pgn::{GameHeaders, GameRecord};
use crate::setup::{self, EditReport, SetupEdit};
use crate::tree::{BranchMode, MoveTree};

pub const DEFAULT_HINT_TIME: Duration = Duration::from_millis(100);
pub const DEFAULT_AUTOPLAY_SPEED: u8 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// The human plays `human`; the policy answers for the other side.
    Play { human: Color },
    /// The user moves both sides; nothing replies automatically.
    Analysis,
}

impl Mode {
    pub fn human(self) -> Option<Color> {
        match self {
            Mode::Play { human } => Some(human),
            Mode::Analysis => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Terminal(Outcome),
}

/// Things the display should tell the user about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// The king invariant changed the board
    KingsRepaired,
    /// A king could not be put back because its home square is taken
    MissingKing(Color),
    /// A new move discarded this many nodes after the cursor
    FuturePruned { discarded: usize },
    /// The automated side moved
    EngineMoved(Move),
    /// Engine failure; automated moves and hints stay off until the
    /// engine is replaced
    EngineFault(String),
    AutoplayStopped,
    Hint(Move),
    /// Principal variation in standard notation
    Line { engine: String, moves: Vec<String> },
    GameOver(Outcome),
}

/// What the display renders after an intent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Update {
    pub position: Position,
    pub highlights: Vec<Square>,
    pub notices: Vec<Notice>,
    /// A pawn is waiting for [`Intent::Promote`]
    pub promotion_pending: bool,
}

/// Inbound requests from the display layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    SelectSquare(Square),
    Promote(PieceKind),
    Move(Move),
    Undo,
    Redo,
    RewindToStart,
    FastForwardToEnd,
    /// Board after this many plies of the current line
    GoTo(usize),
    Hint,
    Analyse,
    ToggleAutoplay,
    SetSpeed(u8),
    SetDifficulty(DifficultyLevel),
    LoadFen(String),
    Reset,
    Resign,
    ToggleSetupMode,
    Setup(SetupEdit),
    Quit,
}

pub struct SessionController {
    mode: Mode,
    headers: GameHeaders,
    start: Position,
    tree: MoveTree,
    position: Position,
    state: SessionState,
    /// Resignation or king capture; holds until the cursor moves
    forced: Option<Outcome>,
    policy: DifficultyPolicy,
    hint_time: Duration,
    autoplay: bool,
    speed: u8,
    setup_mode: bool,
    selected: Option<Square>,
    pending_promotion: Option<(Square, Square)>,
    engine_fault: Option<String>,
}

impl SessionController {
    /// New game from the standard start position.
    pub fn new(mode: Mode, policy: DifficultyPolicy) -> Self {
        let headers = default_headers(mode, policy.engine().name());
        let record = GameRecord::new(headers, Position::startpos());
        Self::build(mode, policy, record, Position::startpos())
    }

    /// Continues a recorded game (loaded PGN, analysis start) at its cursor.
    pub fn from_record(mode: Mode, policy: DifficultyPolicy, record: GameRecord) -> Result<Self, SessionError> {
        let position = record.position()?;
        Ok(Self::build(mode, policy, record, position))
    }

    fn build(mode: Mode, policy: DifficultyPolicy, record: GameRecord, position: Position) -> Self {
        tracing::info!(
            ?mode,
            engine = policy.engine().name(),
            level = %policy.level(),
            "session started"
        );
        let mut session = Self {
            mode,
            headers: record.headers,
            start: record.start,
            tree: record.tree,
            position,
            state: SessionState::Active,
            forced: None,
            policy,
            hint_time: DEFAULT_HINT_TIME,
            autoplay: false,
            speed: DEFAULT_AUTOPLAY_SPEED,
            setup_mode: false,
            selected: None,
            pending_promotion: None,
            engine_fault: None,
        };
        session.rederive(&mut Vec::new());
        session
    }

    pub fn with_hint_time(mut self, hint_time: Duration) -> Self {
        self.hint_time = hint_time;
        self
    }

    pub fn with_autoplay_speed(mut self, speed: u8) -> Self {
        self.set_speed(speed);
        self
    }

    pub fn set_branch_mode(&mut self, mode: BranchMode) {
        self.tree.set_mode(mode);
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, SessionState::Terminal(_))
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn start_position(&self) -> &Position {
        &self.start
    }

    pub fn tree(&self) -> &MoveTree {
        &self.tree
    }

    pub fn autoplay(&self) -> bool {
        self.autoplay
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn setup_mode(&self) -> bool {
        self.setup_mode
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn engine_fault(&self) -> Option<&str> {
        self.engine_fault.as_deref()
    }

    pub fn difficulty(&self) -> DifficultyLevel {
        self.policy.level()
    }

    pub fn engine_name(&self) -> &str {
        self.policy.engine().name()
    }

    /// Main line in standard notation, for the move list.
    pub fn move_list(&self) -> Vec<String> {
        self.tree.main_line_san(&self.start)
    }

    /// Board and highlights with no news.
    pub fn snapshot(&self) -> Update {
        self.update(Vec::new())
    }

    /// Lets the engine open the game when the human plays Black.
    pub fn start(&mut self) -> Result<Update, SessionError> {
        let notices = self.reply_notices();
        Ok(self.update(notices))
    }

    /// Plays `mv` for the human. Does not trigger the automated reply;
    /// see [`reply_if_due`](Self::reply_if_due).
    pub fn human_move(&mut self, mv: Move) -> Result<Update, SessionError> {
        let notices = self.play_human(mv)?;
        Ok(self.update(notices))
    }

    /// Plays the policy's move for the automated side.
    pub fn automated_move(&mut self) -> Result<Update, SessionError> {
        if let Mode::Play { human } = self.mode {
            if self.position.side_to_move == human {
                return Err(SessionError::NotPlayersTurn);
            }
        }
        let notices = self.play_policy()?;
        Ok(self.update(notices))
    }

    /// Plays the automated reply if it is the automated side's turn and the
    /// game can go on.
    pub fn reply_if_due(&mut self) -> Result<Update, SessionError> {
        let notices = self.reply_notices();
        Ok(self.update(notices))
    }

    fn reply_due(&self) -> bool {
        match self.mode {
            Mode::Play { human } => {
                self.position.side_to_move != human
                    && self.state == SessionState::Active
                    && self.position.has_both_kings()
                    && outcome::game_over(&self.position).is_none()
                    && self.engine_fault.is_none()
            }
            Mode::Analysis => false,
        }
    }

    fn reply_notices(&mut self) -> Vec<Notice> {
        if !self.reply_due() {
            return Vec::new();
        }
        match self.play_policy() {
            Ok(notices) => notices,
            Err(e) => {
                tracing::warn!(error = %e, "automated reply failed");
                vec![Notice::EngineFault(e.to_string())]
            }
        }
    }

    fn play_human(&mut self, mv: Move) -> Result<Vec<Notice>, SessionError> {
        if let SessionState::Terminal(outcome) = self.state {
            return Err(SessionError::GameOver { outcome });
        }
        if let Mode::Play { human } = self.mode {
            if self.position.side_to_move != human {
                return Err(SessionError::NotPlayersTurn);
            }
        }
        self.commit(mv)
    }

    /// Policy move for whichever side is to move.
    fn play_policy(&mut self) -> Result<Vec<Notice>, SessionError> {
        if let SessionState::Terminal(outcome) = self.state {
            return Err(SessionError::GameOver { outcome });
        }
        if let Some(reason) = &self.engine_fault {
            return Err(SessionError::EngineUnavailable {
                reason: reason.clone(),
            });
        }
        if !self.position.has_both_kings() {
            return Err(SessionError::MissingKing);
        }
        let selected = self.policy.select_move(&self.position);
        let mv = self.note_fault(selected)?;
        let mut notices = self.commit(mv)?;
        notices.insert(0, Notice::EngineMoved(mv));
        Ok(notices)
    }

    /// Validates and applies one move, then re-derives the state.
    fn commit(&mut self, mv: Move) -> Result<Vec<Notice>, SessionError> {
        let mv = outcome::with_default_promotion(&self.position, mv);
        if let Some(outcome) = outcome::king_capture(&self.position, mv) {
            tracing::warn!(%mv, fen = %self.position.to_fen(), "move would capture a king");
            self.forced = Some(outcome);
            let mut notices = Vec::new();
            self.rederive(&mut notices);
            return Ok(notices);
        }
        if !self.position.is_legal(mv) {
            return Err(SessionError::InvalidMove { mv });
        }

        let mut notices = Vec::new();
        if self.tree.mode() == BranchMode::Prune && self.tree.has_future() {
            let discarded = self.tree.truncate_future();
            self.tree.compact();
            notices.push(Notice::FuturePruned { discarded });
        }
        self.position
            .play(mv)
            .map_err(|e| SessionError::InvalidMove { mv: e.mv })?;
        self.tree.apply_move(mv);
        tracing::debug!(%mv, ply = self.tree.depth(), "move applied");

        self.selected = None;
        self.pending_promotion = None;
        self.rederive(&mut notices);
        Ok(notices)
    }

    /// Recomputes the state from the live board and the forced outcome,
    /// announcing a fresh terminal state.
    fn rederive(&mut self, notices: &mut Vec<Notice>) {
        let was_terminal = self.is_terminal();
        self.state = match self.forced.or_else(|| outcome::terminal(&self.position)) {
            Some(outcome) => SessionState::Terminal(outcome),
            None => SessionState::Active,
        };
        self.headers.result = match self.state {
            SessionState::Terminal(outcome) => outcome.result().to_string(),
            SessionState::Active => "*".to_string(),
        };
        if let SessionState::Terminal(outcome) = self.state {
            if !was_terminal {
                tracing::info!(%outcome, "game over");
                notices.push(Notice::GameOver(outcome));
                self.stop_autoplay(notices);
            }
        }
    }

    fn stop_autoplay(&mut self, notices: &mut Vec<Notice>) {
        if self.autoplay {
            self.autoplay = false;
            notices.push(Notice::AutoplayStopped);
        }
    }

    /// Records an engine failure so later requests fail fast.
    fn note_fault<T>(&mut self, result: Result<T, SessionError>) -> Result<T, SessionError> {
        if let Err(SessionError::EngineUnavailable { reason }) = &result {
            tracing::warn!(engine = self.policy.engine().name(), %reason, "engine fault");
            self.engine_fault = Some(reason.clone());
        }
        result
    }

    fn navigate(&mut self, step: impl FnOnce(&mut MoveTree) -> bool) -> Result<Update, SessionError> {
        let before = self.tree.cursor();
        step(&mut self.tree);
        self.selected = None;
        self.pending_promotion = None;
        let mut notices = Vec::new();
        if self.tree.cursor() != before {
            self.position = self.tree.position_at(&self.start, self.tree.cursor())?;
            self.forced = None;
            self.rederive(&mut notices);
        }
        Ok(self.update(notices))
    }

    pub fn undo(&mut self) -> Result<Update, SessionError> {
        self.navigate(MoveTree::undo)
    }

    pub fn redo(&mut self) -> Result<Update, SessionError> {
        self.navigate(MoveTree::redo)
    }

    pub fn rewind_to_start(&mut self) -> Result<Update, SessionError> {
        self.navigate(|tree| {
            tree.rewind_to_start();
            true
        })
    }

    pub fn fast_forward_to_end(&mut self) -> Result<Update, SessionError> {
        self.navigate(|tree| {
            tree.fast_forward_to_end();
            true
        })
    }

    /// Jumps to the board after `ply` moves of the current line; 0 is the
    /// start position.
    pub fn go_to(&mut self, ply: usize) -> Result<Update, SessionError> {
        let mut reached = false;
        let update = self.navigate(|tree| {
            reached = tree.go_to_ply(ply);
            reached
        })?;
        if !reached {
            return Err(SessionError::NoSuchPly { ply });
        }
        Ok(update)
    }

    /// Suggests a move without touching the game.
    pub fn hint(&mut self) -> Result<Update, SessionError> {
        self.ready_for_engine()?;
        let hint = self
            .policy
            .hint(&self.position, SearchLimits::time(self.hint_time));
        let mv = self.note_fault(hint)?;
        let mut update = self.update(vec![Notice::Hint(mv)]);
        update.highlights = mv.squares().map(|(from, to)| vec![from, to]).unwrap_or_default();
        Ok(update)
    }

    /// Principal variation from the session's own engine.
    pub fn analyse(&mut self) -> Result<Update, SessionError> {
        self.ready_for_engine()?;
        let line = self
            .policy
            .analyse(&self.position, SearchLimits::time(self.hint_time));
        let line = self.note_fault(line)?;
        let engine = self.policy.engine().name().to_string();
        Ok(self.update(vec![self.line_notice(engine, &line)]))
    }

    /// Principal variation from any engine, e.g. another registry entry.
    pub fn analyse_with(&self, engine: &EngineHandle, limits: SearchLimits) -> Result<Update, SessionError> {
        if !self.position.has_both_kings() {
            return Err(SessionError::MissingKing);
        }
        let line = engine.analyse(&self.position, limits)?;
        if line.is_empty() {
            return Err(SessionError::NoPrincipalVariation);
        }
        Ok(self.update(vec![self.line_notice(engine.name().to_string(), &line)]))
    }

    fn ready_for_engine(&self) -> Result<(), SessionError> {
        if let Some(reason) = &self.engine_fault {
            return Err(SessionError::EngineUnavailable {
                reason: reason.clone(),
            });
        }
        if !self.position.has_both_kings() {
            return Err(SessionError::MissingKing);
        }
        Ok(())
    }

    fn line_notice(&self, engine: String, line: &[Move]) -> Notice {
        let mut pos = self.position.clone();
        let mut moves = Vec::with_capacity(line.len());
        for &mv in line {
            let san = pos.san(mv);
            if pos.play(mv).is_err() {
                break;
            }
            moves.push(san);
        }
        Notice::Line { engine, moves }
    }

    pub fn resign(&mut self) -> Result<Update, SessionError> {
        if let SessionState::Terminal(outcome) = self.state {
            return Err(SessionError::GameOver { outcome });
        }
        let loser = self.mode.human().unwrap_or(self.position.side_to_move);
        tracing::info!(side = color_name(loser), "resigned");
        self.forced = Some(Outcome::Resigned { winner: !loser });
        let mut notices = Vec::new();
        self.rederive(&mut notices);
        Ok(self.update(notices))
    }

    /// Restarts from `text`. Malformed text leaves everything as it was.
    pub fn load_fen(&mut self, text: &str) -> Result<Update, SessionError> {
        let mut start = Position::from_fen(text).map_err(|e| SessionError::InvalidPositionText {
            reason: e.to_string(),
        })?;
        let kings_repaired = setup::enforce_king_invariant(&mut start);
        let missing_kings = [Color::White, Color::Black]
            .into_iter()
            .filter(|&c| start.king_square(c).is_none())
            .collect();
        let mut notices = edit_notices(&EditReport {
            kings_repaired,
            missing_kings,
        });
        self.restart(start, &mut notices);
        notices.extend(self.reply_notices());
        Ok(self.update(notices))
    }

    /// Back to the standard start position with an empty tree.
    pub fn reset(&mut self) -> Result<Update, SessionError> {
        let mut notices = Vec::new();
        self.restart(Position::startpos(), &mut notices);
        notices.extend(self.reply_notices());
        Ok(self.update(notices))
    }

    fn restart(&mut self, start: Position, notices: &mut Vec<Notice>) {
        tracing::info!(fen = %start.to_fen(), "new start position");
        self.tree = MoveTree::with_mode(self.tree.mode());
        self.position = start.clone();
        self.start = start;
        self.forced = None;
        self.setup_mode = false;
        self.selected = None;
        self.pending_promotion = None;
        self.state = SessionState::Active;
        self.rederive(notices);
    }

    pub fn set_difficulty(&mut self, level: DifficultyLevel) {
        tracing::info!(%level, "difficulty changed");
        self.policy.set_level(level);
    }

    /// Swaps the opponent and forgets a recorded engine fault.
    pub fn set_engine(&mut self, engine: EngineHandle) {
        tracing::info!(engine = engine.name(), "engine changed");
        self.policy.set_engine(engine);
        self.engine_fault = None;
    }

    pub fn toggle_setup_mode(&mut self) -> bool {
        self.setup_mode = !self.setup_mode;
        self.selected = None;
        self.pending_promotion = None;
        self.setup_mode
    }

    /// Applies a board edit and records it as a null move.
    pub fn apply_setup_edit(&mut self, edit: SetupEdit) -> Result<Update, SessionError> {
        let mut pos = self.position.clone();
        let report = setup::apply_edit(&mut pos, edit)?;

        let mut notices = Vec::new();
        if self.tree.mode() == BranchMode::Prune && self.tree.has_future() {
            let discarded = self.tree.truncate_future();
            self.tree.compact();
            notices.push(Notice::FuturePruned { discarded });
        }
        self.tree.apply_edit(edit);
        self.position = pos;
        tracing::debug!(%edit, "setup edit");
        if edit == SetupEdit::ClearNonKings {
            self.setup_mode = true;
        }
        notices.extend(edit_notices(&report));

        self.selected = None;
        self.pending_promotion = None;
        self.forced = None;
        self.rederive(&mut notices);
        Ok(self.update(notices))
    }

    /// Board click: pick a piece, then a target.
    pub fn select_square(&mut self, square: Square) -> Result<Update, SessionError> {
        self.pending_promotion = None;
        let Some(from) = self.selected.take() else {
            return self.pick(square);
        };
        if from == square {
            return Ok(self.snapshot());
        }
        if self.setup_mode {
            return self.apply_setup_edit(SetupEdit::Relocate { from, to: square });
        }
        let own = self
            .position
            .piece_at(square)
            .is_some_and(|piece| piece.color == self.position.side_to_move);
        if own {
            return self.pick(square);
        }

        let candidates: Vec<Move> = self
            .reachable_moves()
            .into_iter()
            .filter(|mv| mv.from == from && mv.to == square)
            .collect();
        match candidates.as_slice() {
            [] => Err(SessionError::InvalidMove {
                mv: Move::new(from, square),
            }),
            [mv] => self.play_and_reply(*mv),
            _ => {
                self.pending_promotion = Some((from, square));
                Ok(self.snapshot())
            }
        }
    }

    /// Legal moves, plus king captures an edited board leaves open.
    fn reachable_moves(&self) -> Vec<Move> {
        let mut moves = self.position.legal_moves();
        moves.extend(self.position.king_captures());
        moves
    }

    fn pick(&mut self, square: Square) -> Result<Update, SessionError> {
        let Some(piece) = self.position.piece_at(square) else {
            return Ok(self.snapshot());
        };
        if self.setup_mode {
            self.selected = Some(square);
            return Ok(self.snapshot());
        }
        if let SessionState::Terminal(outcome) = self.state {
            return Err(SessionError::GameOver { outcome });
        }
        let movable = piece.color == self.position.side_to_move
            && self.mode.human().map_or(true, |human| human == piece.color);
        if movable {
            self.selected = Some(square);
        }
        Ok(self.snapshot())
    }

    /// Completes a pending promotion with `kind`.
    pub fn promote(&mut self, kind: PieceKind) -> Result<Update, SessionError> {
        let (from, to) = self
            .pending_promotion
            .take()
            .ok_or(SessionError::NoPendingPromotion)?;
        self.play_and_reply(Move::with_promo(from, to, kind))
    }

    fn play_and_reply(&mut self, mv: Move) -> Result<Update, SessionError> {
        let mut notices = self.play_human(mv)?;
        notices.extend(self.reply_notices());
        Ok(self.update(notices))
    }

    pub fn toggle_autoplay(&mut self) -> bool {
        self.autoplay = !self.autoplay;
        tracing::debug!(on = self.autoplay, "autoplay toggled");
        self.autoplay
    }

    /// Clamped to 1..=10.
    pub fn set_speed(&mut self, speed: u8) {
        self.speed = speed.clamp(1, 10);
    }

    /// Time between autoplay moves.
    pub fn autoplay_interval(&self) -> Duration {
        Duration::from_secs(1) / u32::from(self.speed)
    }

    /// One autoplay tick: a policy move for the side to move. Switches
    /// autoplay off when the game cannot go on.
    pub fn autoplay_step(&mut self) -> Result<Update, SessionError> {
        let mut notices = Vec::new();
        if !self.autoplay {
            return Ok(self.update(notices));
        }
        if self.is_terminal() || !self.position.has_both_kings() {
            self.stop_autoplay(&mut notices);
            return Ok(self.update(notices));
        }
        if let Some(outcome) = outcome::game_over(&self.position) {
            notices.push(Notice::GameOver(outcome));
            self.stop_autoplay(&mut notices);
            return Ok(self.update(notices));
        }
        match self.play_policy() {
            Ok(moved) => notices.extend(moved),
            Err(e) => {
                notices.push(Notice::EngineFault(e.to_string()));
                self.stop_autoplay(&mut notices);
            }
        }
        Ok(self.update(notices))
    }

    /// The game so far, for the serializer.
    pub fn record(&self) -> GameRecord {
        GameRecord {
            headers: self.headers.clone(),
            start: self.start.clone(),
            tree: self.tree.clone(),
        }
    }

    pub fn handle(&mut self, intent: Intent) -> Result<Update, SessionError> {
        match intent {
            Intent::SelectSquare(square) => self.select_square(square),
            Intent::Promote(kind) => self.promote(kind),
            Intent::Move(mv) => self.play_and_reply(mv),
            Intent::Undo => self.undo(),
            Intent::Redo => self.redo(),
            Intent::RewindToStart => self.rewind_to_start(),
            Intent::FastForwardToEnd => self.fast_forward_to_end(),
            Intent::GoTo(ply) => self.go_to(ply),
            Intent::Hint => self.hint(),
            Intent::Analyse => self.analyse(),
            Intent::ToggleAutoplay => {
                self.toggle_autoplay();
                Ok(self.snapshot())
            }
            Intent::SetSpeed(speed) => {
                self.set_speed(speed);
                Ok(self.snapshot())
            }
            Intent::SetDifficulty(level) => {
                self.set_difficulty(level);
                Ok(self.snapshot())
            }
            Intent::LoadFen(text) => self.load_fen(&text),
            Intent::Reset => self.reset(),
            Intent::Resign => self.resign(),
            Intent::ToggleSetupMode => {
                self.toggle_setup_mode();
                Ok(self.snapshot())
            }
            Intent::Setup(edit) => self.apply_setup_edit(edit),
            Intent::Quit => Ok(self.snapshot()),
        }
    }

    fn update(&self, notices: Vec<Notice>) -> Update {
        Update {
            position: self.position.clone(),
            highlights: self.highlights(),
            notices,
            promotion_pending: self.pending_promotion.is_some(),
        }
    }

    /// Pending promotion squares, else the selection and its targets, else
    /// the last move.
    fn highlights(&self) -> Vec<Square> {
        if let Some((from, to)) = self.pending_promotion {
            return vec![from, to];
        }
        if let Some(from) = self.selected {
            let mut squares = vec![from];
            if !self.setup_mode {
                squares.extend(
                    self.reachable_moves()
                        .into_iter()
                        .filter(|mv| mv.from == from)
                        .map(|mv| mv.to),
                );
                squares.dedup();
            }
            return squares;
        }
        self.tree
            .node(self.tree.cursor())
            .mv
            .and_then(|mv| mv.squares())
            .map(|(from, to)| vec![from, to])
            .unwrap_or_default()
    }
}

fn edit_notices(report: &EditReport) -> Vec<Notice> {
    let mut notices = Vec::new();
    if report.kings_repaired {
        notices.push(Notice::KingsRepaired);
    }
    notices.extend(report.missing_kings.iter().map(|&color| Notice::MissingKing(color)));
    notices
}

fn default_headers(mode: Mode, engine: &str) -> GameHeaders {
    match mode {
        Mode::Play { human: Color::White } => GameHeaders::new("Human vs Engine", "Human", engine),
        Mode::Play { human: Color::Black } => GameHeaders::new("Human vs Engine", engine, "Human"),
        Mode::Analysis => GameHeaders::new("Analysis", "?", "?"),
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod controller_tests;
