use super::*;
use chess_core::{Piece, STARTING_FEN};

use crate::test_support::{first_legal, Broken};

fn policy(engine: EngineHandle) -> DifficultyPolicy {
    DifficultyPolicy::seeded(engine, DifficultyLevel::Hard, 1)
}

fn analysis() -> SessionController {
    SessionController::new(Mode::Analysis, policy(first_legal("First")))
}

fn uci(session: &SessionController, text: &str) -> Move {
    session.position().parse_uci(text).unwrap()
}

fn play(session: &mut SessionController, moves: &[&str]) {
    for text in moves {
        let mv = uci(session, text);
        session.human_move(mv).unwrap();
    }
}

#[test]
fn test_human_plays_e4() {
    let mut session = SessionController::new(
        Mode::Play { human: Color::White },
        policy(first_legal("First")),
    );
    let e4 = uci(&session, "e2e4");
    let update = session.human_move(e4).unwrap();

    let tree = session.tree();
    assert_eq!(tree.node(tree.root()).children().len(), 1);
    assert_eq!(session.position().side_to_move, Color::Black);
    assert_eq!(tree.path_from_root(), vec![e4]);
    assert_eq!(update.highlights, vec![Square::E2, Square::E4]);
    assert_eq!(session.state(), SessionState::Active);
}

#[test]
fn test_move_intent_gets_an_automated_reply() {
    let mut session = SessionController::new(
        Mode::Play { human: Color::White },
        policy(first_legal("First")),
    );
    let e4 = uci(&session, "e2e4");
    let update = session.handle(Intent::Move(e4)).unwrap();
    assert_eq!(session.tree().depth(), 2);
    assert_eq!(session.position().side_to_move, Color::White);
    assert!(matches!(update.notices[0], Notice::EngineMoved(_)));
}

#[test]
fn test_turn_is_enforced_and_engine_opens_as_white() {
    let mut session = SessionController::new(
        Mode::Play { human: Color::Black },
        policy(first_legal("First")),
    );
    let e4 = uci(&session, "e2e4");
    assert_eq!(session.human_move(e4), Err(SessionError::NotPlayersTurn));

    session.start().unwrap();
    assert_eq!(session.tree().depth(), 1);
    assert_eq!(session.position().side_to_move, Color::Black);
    assert_eq!(session.automated_move(), Err(SessionError::NotPlayersTurn));
}

#[test]
fn test_illegal_move_keeps_state() {
    let mut session = analysis();
    let before = session.position().clone();
    let bogus = Move::new(Square::E2, Square::E5);
    assert_eq!(
        session.human_move(bogus),
        Err(SessionError::InvalidMove { mv: bogus })
    );
    assert_eq!(session.position(), &before);
    assert_eq!(session.tree().depth(), 0);
}

#[test]
fn test_undo_undo_redo_follows_main_line() {
    let mut session = analysis();
    play(&mut session, &["e2e4", "e7e5", "g1f3"]);
    session.undo().unwrap();
    session.undo().unwrap();
    assert_eq!(session.tree().depth(), 1);

    session.redo().unwrap();
    assert_eq!(session.tree().depth(), 2);
    let e5 = Move::new(Square::E7, Square::E5);
    assert_eq!(session.tree().path_from_root()[1], e5);
    assert_eq!(session.position().piece_at(Square::E5).map(|p| p.kind), Some(PieceKind::Pawn));
    assert_eq!(session.position().side_to_move, Color::White);
}

#[test]
fn test_navigation_replays_the_board() {
    let mut session = analysis();
    play(&mut session, &["d2d4", "d7d5", "c2c4"]);
    let end = session.position().clone();
    session.rewind_to_start().unwrap();
    assert_eq!(session.position(), &Position::startpos());
    assert!(session.snapshot().highlights.is_empty());
    session.fast_forward_to_end().unwrap();
    assert_eq!(session.position(), &end);
}

#[test]
fn test_new_move_after_undo_prunes() {
    let mut session = analysis();
    play(&mut session, &["e2e4", "e7e5", "g1f3"]);
    session.undo().unwrap();
    session.undo().unwrap();
    let c5 = uci(&session, "c7c5");
    let update = session.human_move(c5).unwrap();
    assert!(update.notices.contains(&Notice::FuturePruned { discarded: 2 }));
    assert_eq!(session.move_list(), vec!["e4", "c5"]);
}

#[test]
fn test_keep_mode_does_not_prune() {
    let mut session = analysis();
    session.set_branch_mode(BranchMode::Keep);
    play(&mut session, &["e2e4", "e7e5"]);
    session.undo().unwrap();
    let update = session.human_move(uci(&session, "c7c5")).unwrap();
    assert!(update.notices.is_empty());
    assert_eq!(session.move_list(), vec!["e4", "e5"]);
}

#[test]
fn test_checkmate_is_terminal() {
    let mut session = analysis();
    play(&mut session, &["f2f3", "e7e5", "g2g4"]);
    let update = session.human_move(uci(&session, "d8h4")).unwrap();
    let mate = Outcome::Checkmate { winner: Color::Black };
    assert_eq!(session.state(), SessionState::Terminal(mate));
    assert!(update.notices.contains(&Notice::GameOver(mate)));
    assert_eq!(session.record().headers.result, "0-1");

    let any = Move::new(Square::E1, Square::F2);
    assert_eq!(session.human_move(any), Err(SessionError::GameOver { outcome: mate }));

    session.undo().unwrap();
    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(session.record().headers.result, "*");
}

#[test]
fn test_clear_board_keeps_both_kings() {
    let mut session = analysis();
    session.handle(Intent::Setup(SetupEdit::ClearNonKings)).unwrap();
    assert!(session.setup_mode());

    let mut pos = session.position().clone();
    assert!(!setup::enforce_king_invariant(&mut pos));
    let pieces: Vec<_> = pos.occupied().collect();
    assert_eq!(
        pieces,
        vec![
            (Square::E1, Piece::new(Color::White, PieceKind::King)),
            (Square::E8, Piece::new(Color::Black, PieceKind::King)),
        ]
    );
    assert_eq!(session.tree().node(session.tree().cursor()).mv, Some(Move::NULL));
}

#[test]
fn test_setup_edits_undo_like_moves() {
    let mut session = analysis();
    session
        .apply_setup_edit(SetupEdit::Remove { square: Square::D1 })
        .unwrap();
    assert_eq!(session.position().piece_at(Square::D1), None);
    assert_eq!(session.position().side_to_move, Color::White);

    session.undo().unwrap();
    assert!(session.position().piece_at(Square::D1).is_some());
    session.redo().unwrap();
    assert_eq!(session.position().piece_at(Square::D1), None);
}

#[test]
fn test_place_on_king_is_refused() {
    let mut session = analysis();
    let err = session
        .apply_setup_edit(SetupEdit::Place {
            square: Square::E1,
            piece: Piece::new(Color::Black, PieceKind::Queen),
        })
        .unwrap_err();
    assert_eq!(err, SessionError::CannotReplaceKing { square: Square::E1 });
    assert_eq!(session.tree().depth(), 0);
}

#[test]
fn test_removed_king_is_repaired() {
    let mut session = analysis();
    let update = session
        .apply_setup_edit(SetupEdit::Remove { square: Square::E1 })
        .unwrap();
    assert!(update.notices.contains(&Notice::KingsRepaired));
    assert_eq!(session.position().king_square(Color::White), Some(Square::E1));
    assert_eq!(session.state(), SessionState::Active);
}

#[test]
fn test_unrepairable_king_ends_the_game() {
    let mut session = analysis();
    session.load_fen("4k3/8/8/8/8/8/8/3KR3 w - - 0 1").unwrap();
    let update = session
        .apply_setup_edit(SetupEdit::Remove { square: Square::D1 })
        .unwrap();
    let outcome = Outcome::MissingKing {
        winner: Some(Color::Black),
    };
    assert!(update.notices.contains(&Notice::MissingKing(Color::White)));
    assert!(update.notices.contains(&Notice::GameOver(outcome)));
    assert_eq!(session.state(), SessionState::Terminal(outcome));
    assert_eq!(session.hint(), Err(SessionError::MissingKing));
}

#[test]
fn test_king_capture_is_terminal_and_sticky() {
    let mut session = analysis();
    session.load_fen("4k3/8/8/8/8/8/4r3/4K3 b - - 0 1").unwrap();
    let update = session.human_move(Move::new(Square::E2, Square::E1)).unwrap();
    let outcome = Outcome::KingCaptured { winner: Color::Black };
    assert!(update.notices.contains(&Notice::GameOver(outcome)));
    assert_eq!(session.state(), SessionState::Terminal(outcome));
    // The board is left as it was.
    assert_eq!(session.tree().depth(), 0);
    assert!(session.position().piece_at(Square::E1).is_some());
    session.undo().unwrap();
    assert_eq!(session.state(), SessionState::Terminal(outcome));
}

#[test]
fn test_moves_onto_a_king_that_cannot_reach_it_are_invalid() {
    let mut session = SessionController::new(
        Mode::Play { human: Color::White },
        policy(first_legal("First")),
    );
    for (from, to) in [(Square::A1, Square::E8), (Square::D1, Square::E1), (Square::E4, Square::E8)] {
        let mv = Move::new(from, to);
        assert_eq!(session.human_move(mv), Err(SessionError::InvalidMove { mv }));
        assert_eq!(session.state(), SessionState::Active);
    }
    assert_eq!(session.tree().depth(), 0);
    assert_eq!(session.position(), &Position::startpos());
}

#[test]
fn test_clicks_take_a_king_left_open_by_setup() {
    let mut session = analysis();
    let rook = Piece::new(Color::White, PieceKind::Rook);
    session
        .handle(Intent::Setup(SetupEdit::Place { square: Square::E7, piece: rook }))
        .unwrap();
    assert!(session.position().legal_moves().is_empty());
    assert_eq!(session.state(), SessionState::Active);

    let picked = session.handle(Intent::SelectSquare(Square::E7)).unwrap();
    assert!(picked.highlights.contains(&Square::E8));
    let update = session.handle(Intent::SelectSquare(Square::E8)).unwrap();

    let outcome = Outcome::KingCaptured { winner: Color::White };
    assert!(update.notices.contains(&Notice::GameOver(outcome)));
    assert_eq!(session.state(), SessionState::Terminal(outcome));
    assert_eq!(session.record().headers.result, "1-0");
}

#[test]
fn test_engine_takes_a_king_left_open_by_setup() {
    let oracle = crate::test_support::FirstLegal::new("First");
    let calls = oracle.calls.clone();
    let mut session = SessionController::new(
        Mode::Play { human: Color::Black },
        policy(EngineHandle::new(oracle)),
    );
    let rook = Piece::new(Color::White, PieceKind::Rook);
    session
        .apply_setup_edit(SetupEdit::Place { square: Square::E7, piece: rook })
        .unwrap();
    session.reply_if_due().unwrap();

    assert_eq!(
        session.state(),
        SessionState::Terminal(Outcome::KingCaptured { winner: Color::White })
    );
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[test]
fn test_go_to_follows_the_current_line() {
    let mut session = analysis();
    play(&mut session, &["e2e4", "e7e5", "g1f3", "b8c6"]);

    session.handle(Intent::GoTo(2)).unwrap();
    assert_eq!(session.tree().depth(), 2);
    assert_eq!(session.position().side_to_move, Color::White);
    assert_eq!(
        session.position().piece_at(Square::E5),
        Some(Piece::new(Color::Black, PieceKind::Pawn))
    );
    assert_eq!(session.position().piece_at(Square::F3), None);

    // Past the cursor the line continues along the main line.
    session.go_to(4).unwrap();
    assert_eq!(session.tree().depth(), 4);
    session.go_to(0).unwrap();
    assert_eq!(session.position(), &Position::startpos());

    assert_eq!(session.go_to(5), Err(SessionError::NoSuchPly { ply: 5 }));
    assert_eq!(session.tree().depth(), 0);
}

#[test]
fn test_replaced_moves_leave_the_arena() {
    let mut session = analysis();
    play(&mut session, &["e2e4", "e7e5", "g1f3", "b8c6"]);
    session.go_to(1).unwrap();
    play(&mut session, &["c7c5"]);

    assert_eq!(session.tree().main_line_san(&Position::startpos()), vec!["e4", "c5"]);
    assert_eq!(session.tree().arena_len(), 3);
    session.undo().unwrap();
    assert_eq!(session.tree().depth(), 1);
}

#[test]
fn test_resign_until_cursor_moves() {
    let mut session = analysis();
    play(&mut session, &["e2e4"]);
    session.resign().unwrap();
    assert_eq!(
        session.state(),
        SessionState::Terminal(Outcome::Resigned { winner: Color::White })
    );
    assert!(session.resign().is_err());
    session.undo().unwrap();
    assert_eq!(session.state(), SessionState::Active);
}

#[test]
fn test_human_resigns_in_play_mode() {
    let mut session = SessionController::new(
        Mode::Play { human: Color::White },
        policy(first_legal("First")),
    );
    session.resign().unwrap();
    assert_eq!(session.record().headers.result, "0-1");
}

#[test]
fn test_load_fen() {
    let mut session = analysis();
    play(&mut session, &["e2e4"]);
    let before = session.position().clone();
    assert!(matches!(
        session.load_fen("not a position"),
        Err(SessionError::InvalidPositionText { .. })
    ));
    assert_eq!(session.position(), &before);

    let update = session.load_fen("8/8/8/8/8/8/8/8 w - - 0 1").unwrap();
    assert!(update.notices.contains(&Notice::KingsRepaired));
    assert_eq!(session.tree().depth(), 0);
    assert_eq!(session.position().king_square(Color::Black), Some(Square::E8));

    session.reset().unwrap();
    assert_eq!(session.position().to_fen(), STARTING_FEN);
}

#[test]
fn test_click_to_move() {
    let mut session = SessionController::new(
        Mode::Play { human: Color::White },
        policy(first_legal("First")),
    );
    // Opponent pieces cannot be picked.
    session.select_square(Square::E7).unwrap();
    assert_eq!(session.selected(), None);

    let update = session.select_square(Square::E2).unwrap();
    let mut highlights = update.highlights;
    highlights.sort_by_key(|sq| *sq as usize);
    assert_eq!(highlights, vec![Square::E2, Square::E3, Square::E4]);
    session.select_square(Square::E4).unwrap();
    // Human move plus the automated reply.
    assert_eq!(session.tree().depth(), 2);
    assert_eq!(session.selected(), None);
}

#[test]
fn test_click_to_illegal_square_clears_selection() {
    let mut session = analysis();
    session.select_square(Square::E2).unwrap();
    assert!(matches!(
        session.select_square(Square::E5),
        Err(SessionError::InvalidMove { .. })
    ));
    assert_eq!(session.selected(), None);
}

#[test]
fn test_promotion_waits_for_a_piece() {
    let mut session = analysis();
    session.load_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    assert_eq!(session.promote(PieceKind::Queen), Err(SessionError::NoPendingPromotion));

    session.select_square(Square::A7).unwrap();
    let update = session.select_square(Square::A8).unwrap();
    assert!(update.promotion_pending);
    session.handle(Intent::Promote(PieceKind::Knight)).unwrap();
    assert_eq!(
        session.position().piece_at(Square::A8),
        Some(Piece::new(Color::White, PieceKind::Knight))
    );
}

#[test]
fn test_promotion_without_piece_defaults_to_queen() {
    let mut session = analysis();
    session.load_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    session.human_move(Move::new(Square::A7, Square::A8)).unwrap();
    assert_eq!(
        session.position().piece_at(Square::A8),
        Some(Piece::new(Color::White, PieceKind::Queen))
    );
}

#[test]
fn test_setup_mode_click_relocates() {
    let mut session = analysis();
    assert!(session.toggle_setup_mode());
    session.select_square(Square::B1).unwrap();
    session.select_square(Square::C3).unwrap();
    assert_eq!(
        session.position().piece_at(Square::C3),
        Some(Piece::new(Color::White, PieceKind::Knight))
    );
    assert_eq!(
        session.tree().node(session.tree().cursor()).edit,
        Some(SetupEdit::Relocate {
            from: Square::B1,
            to: Square::C3
        })
    );

    session.select_square(Square::E1).unwrap();
    assert_eq!(
        session.select_square(Square::E4),
        Err(SessionError::CannotMoveKing { square: Square::E1 })
    );
}

#[test]
fn test_hint_highlights_without_moving() {
    let mut session = analysis();
    let expected = Position::startpos().legal_moves()[0];
    let update = session.hint().unwrap();
    assert_eq!(update.notices, vec![Notice::Hint(expected)]);
    assert_eq!(update.highlights, vec![expected.from, expected.to]);
    assert_eq!(session.tree().depth(), 0);
}

#[test]
fn test_analyse_reports_a_line() {
    let mut session = analysis();
    let update = session.analyse().unwrap();
    match &update.notices[..] {
        [Notice::Line { engine, moves }] => {
            assert_eq!(engine, "First");
            assert_eq!(moves.len(), 1);
        }
        other => panic!("unexpected notices {other:?}"),
    }
}

#[test]
fn test_engine_fault_keeps_navigation() {
    let mut session = SessionController::new(
        Mode::Play { human: Color::White },
        policy(EngineHandle::new(Broken)),
    );
    let e4 = uci(&session, "e2e4");
    let update = session.handle(Intent::Move(e4)).unwrap();
    assert!(matches!(update.notices.last(), Some(Notice::EngineFault(_))));
    assert!(session.engine_fault().is_some());
    assert!(matches!(
        session.hint(),
        Err(SessionError::EngineUnavailable { .. })
    ));

    session.undo().unwrap();
    assert_eq!(session.tree().depth(), 0);

    session.set_engine(first_legal("Backup"));
    assert!(session.engine_fault().is_none());
    session.redo().unwrap();
    session.reply_if_due().unwrap();
    assert_eq!(session.tree().depth(), 2);
}

#[test]
fn test_autoplay_plays_both_sides() {
    let mut session = SessionController::new(
        Mode::Play { human: Color::White },
        policy(first_legal("First")),
    );
    // Off: nothing happens.
    session.autoplay_step().unwrap();
    assert_eq!(session.tree().depth(), 0);

    assert!(session.toggle_autoplay());
    for _ in 0..3 {
        session.autoplay_step().unwrap();
    }
    assert_eq!(session.tree().depth(), 3);
}

#[test]
fn test_autoplay_stops_on_dead_positions() {
    let mut session = analysis();
    session.load_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    session.toggle_autoplay();
    let update = session.autoplay_step().unwrap();
    assert!(update.notices.contains(&Notice::GameOver(Outcome::InsufficientMaterial)));
    assert!(update.notices.contains(&Notice::AutoplayStopped));
    assert!(!session.autoplay());
    assert_eq!(session.state(), SessionState::Active);
}

#[test]
fn test_autoplay_stops_at_mate() {
    let mut session = analysis();
    session
        .load_fen("r1bqkbnr/pppp1Qpp/2n5/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 1")
        .unwrap();
    session.toggle_autoplay();
    let update = session.autoplay_step().unwrap();
    assert_eq!(update.notices, vec![Notice::AutoplayStopped]);
    assert!(!session.autoplay());
}

#[test]
fn test_speed_is_clamped() {
    let mut session = analysis();
    assert_eq!(session.autoplay_interval(), Duration::from_millis(200));
    session.handle(Intent::SetSpeed(0)).unwrap();
    assert_eq!(session.speed(), 1);
    session.set_speed(42);
    assert_eq!(session.speed(), 10);
    assert_eq!(session.autoplay_interval(), Duration::from_millis(100));
}

#[test]
fn test_set_difficulty() {
    let mut session = analysis();
    session
        .handle(Intent::SetDifficulty(DifficultyLevel::Easy))
        .unwrap();
    assert_eq!(session.difficulty(), DifficultyLevel::Easy);
}

#[test]
fn test_record_round_trips_into_a_session() {
    let mut session = analysis();
    play(&mut session, &["e2e4", "c7c5"]);
    let record = session.record();
    let resumed =
        SessionController::from_record(Mode::Analysis, policy(first_legal("First")), record)
            .unwrap();
    assert_eq!(resumed.position(), session.position());
    assert_eq!(resumed.move_list(), vec!["e4", "c5"]);
}
