//! End-to-end flows through the public session API
//!
//! These drive real built-in engines:
//! - A human game against the classical searcher
//! - Saving, reloading and continuing in analysis
//! - A short engine match assembled from the default config

use std::time::Duration;

use chess_core::{Color, Position, Square};
use classical_engine::ClassicalEngine;
use random_engine::RandomEngine;
use session::pgn::{read_pgn, save_game, to_pgn_string};
use session::{
    AnalysisStart, AppConfig, DifficultyLevel, DifficultyPolicy, DualEngineOrchestrator, EngineHandle,
    EngineRegistry, Intent, MatchConfig, MatchEvent, Mode, Notice, Outcome, SessionController,
    SetupEdit,
};

fn shallow_classical() -> DifficultyPolicy {
    let engine = EngineHandle::new(ClassicalEngine::with_max_depth(2));
    DifficultyPolicy::seeded(engine, DifficultyLevel::Hard, 11)
}

fn scratch_dir(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("session-flow-{tag}-{}", std::process::id()))
}

// =============================================================================
// Human against engine
// =============================================================================

#[test]
fn test_human_game_with_takeback_and_new_branch() {
    let mut session = SessionController::new(Mode::Play { human: Color::White }, shallow_classical());

    let e4 = session.position().parse_uci("e2e4").unwrap();
    let update = session.handle(Intent::Move(e4)).unwrap();
    assert!(matches!(update.notices.first(), Some(Notice::EngineMoved(_))));
    assert_eq!(session.tree().depth(), 2);
    assert_eq!(session.position().side_to_move, Color::White);

    session.handle(Intent::Undo).unwrap();
    session.handle(Intent::Undo).unwrap();
    assert_eq!(session.position(), &Position::startpos());

    let d4 = session.position().parse_uci("d2d4").unwrap();
    let update = session.human_move(d4).unwrap();
    assert!(update.notices.contains(&Notice::FuturePruned { discarded: 2 }));
    assert_eq!(session.tree().path_from_root(), vec![d4]);
    assert_eq!(session.move_list(), vec!["d4".to_string()]);
}

#[test]
fn test_clicks_drive_a_move_and_reply() {
    let mut session = SessionController::new(Mode::Play { human: Color::White }, shallow_classical());

    let picked = session.handle(Intent::SelectSquare(Square::G1)).unwrap();
    assert!(picked.highlights.contains(&Square::F3));
    session.handle(Intent::SelectSquare(Square::F3)).unwrap();

    assert_eq!(session.tree().depth(), 2);
    assert_eq!(session.move_list()[0], "Nf3");
}

// =============================================================================
// Save, reload, analyse
// =============================================================================

#[test]
fn test_saved_game_reopens_in_analysis_at_the_same_position() {
    let mut session = SessionController::new(Mode::Analysis, shallow_classical());
    for text in ["e2e4", "e7e5", "g1f3"] {
        let mv = session.position().parse_uci(text).unwrap();
        session.human_move(mv).unwrap();
    }
    session.apply_setup_edit(SetupEdit::Remove { square: Square::A8 }).unwrap();
    let expected = session.position().clone();

    let dir = scratch_dir("reopen");
    let path = save_game(&session.record(), &dir).unwrap();

    let start = AnalysisStart::from_input(path.to_str().unwrap()).unwrap();
    let record = start.into_record(&mut rand::thread_rng()).unwrap();
    std::fs::remove_dir_all(&dir).ok();

    let reopened = SessionController::from_record(Mode::Analysis, shallow_classical(), record).unwrap();
    assert_eq!(reopened.position(), &expected);
    assert_eq!(reopened.tree().depth(), 4);
    assert_eq!(reopened.position().piece_at(Square::A8), None);
    assert_eq!(reopened.position().side_to_move, Color::Black);
}

#[test]
fn test_analysis_line_is_reported_in_standard_notation() {
    let mut session = SessionController::new(Mode::Analysis, shallow_classical());
    let update = session.handle(Intent::Analyse).unwrap();
    match update.notices.as_slice() {
        [Notice::Line { moves, .. }] => assert!(!moves.is_empty()),
        other => panic!("expected a line, got {other:?}"),
    }
    assert_eq!(session.tree().depth(), 0);
}

#[test]
fn test_fools_mate_ends_the_session() {
    let mut session = SessionController::new(Mode::Analysis, shallow_classical());
    for text in ["f2f3", "e7e5", "g2g4", "d8h4"] {
        let mv = session.position().parse_uci(text).unwrap();
        session.human_move(mv).unwrap();
    }
    assert!(session.is_terminal());

    let text = to_pgn_string(&session.record());
    assert!(text.trim_end().ends_with("0-1"), "{text}");
    let record = read_pgn(&text).unwrap();
    assert_eq!(record.headers.result, "0-1");
    assert!(record.position().unwrap().is_checkmate());
}

// =============================================================================
// Engine match from configuration
// =============================================================================

#[test]
fn test_default_registry_runs_a_capped_match() {
    let config = AppConfig::default();
    let registry = EngineRegistry::from_config(&config.engines).unwrap();
    assert!(registry.get("random").is_some());

    let a = DifficultyPolicy::seeded(registry.get("Random").unwrap(), DifficultyLevel::TrivialRandom, 1);
    let b = DifficultyPolicy::seeded(
        EngineHandle::new(RandomEngine::seeded(5)),
        DifficultyLevel::Hard,
        2,
    );
    let orch = DualEngineOrchestrator::start(
        a,
        b,
        Position::startpos(),
        MatchConfig {
            max_plies: 12,
            move_delay: Duration::ZERO,
        },
    )
    .unwrap();

    let mut last = None;
    while let Ok(event) = orch.events().recv_timeout(Duration::from_secs(10)) {
        let done = matches!(event, MatchEvent::Finished(_) | MatchEvent::EngineFailed { .. });
        last = Some(event);
        if done {
            break;
        }
    }
    let record = orch.finish();
    registry.shutdown();

    match last {
        Some(MatchEvent::Finished(outcome)) => {
            assert_eq!(record.headers.result, outcome.result());
            if outcome == Outcome::MoveLimit {
                assert_eq!(record.tree.depth(), 12);
            }
        }
        other => panic!("match did not finish: {other:?}"),
    }
    let reread = read_pgn(&to_pgn_string(&record)).unwrap();
    assert_eq!(reread.tree.main_line(), record.tree.main_line());
}
