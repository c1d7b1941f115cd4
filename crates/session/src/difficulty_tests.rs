use super::*;
use std::collections::HashMap;
use std::sync::atomic::Ordering;

use chess_core::Square;

use crate::test_support::{first_legal, Broken, FirstLegal, FixedLine};

#[test]
fn test_trivial_is_uniform_and_never_asks_the_oracle() {
    let oracle = FirstLegal::new("Counter");
    let calls = oracle.calls.clone();
    let mut policy = DifficultyPolicy::seeded(
        EngineHandle::new(oracle),
        DifficultyLevel::TrivialRandom,
        7,
    );
    let pos = Position::startpos();
    let legal = pos.legal_moves();

    let samples = 4000;
    let mut counts: HashMap<Move, usize> = HashMap::new();
    for _ in 0..samples {
        *counts.entry(policy.select_move(&pos).unwrap()).or_default() += 1;
    }

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(counts.len(), legal.len());
    let expected = samples / legal.len();
    for mv in legal {
        let seen = counts[&mv];
        assert!(
            seen > expected * 6 / 10 && seen < expected * 14 / 10,
            "{mv} chosen {seen} times, expected about {expected}"
        );
    }
}

#[test]
fn test_hard_and_maximum_always_follow_the_oracle() {
    let pos = Position::startpos();
    let oracle_move = pos.legal_moves()[0];
    for level in [DifficultyLevel::Hard, DifficultyLevel::Maximum] {
        let mut policy = DifficultyPolicy::seeded(first_legal("First"), level, 11);
        for _ in 0..200 {
            assert_eq!(policy.select_move(&pos).unwrap(), oracle_move);
        }
    }
}

#[test]
fn test_easy_mixes_roughly_thirty_percent_oracle() {
    let oracle = FirstLegal::new("Counter");
    let calls = oracle.calls.clone();
    let mut policy = DifficultyPolicy::seeded(EngineHandle::new(oracle), DifficultyLevel::Easy, 3);
    let pos = Position::startpos();
    for _ in 0..1000 {
        policy.select_move(&pos).unwrap();
    }
    let asked = calls.load(Ordering::SeqCst);
    assert!((200..400).contains(&asked), "oracle asked {asked} times");
}

#[test]
fn test_select_move_does_not_touch_position() {
    let pos = Position::startpos();
    let before = pos.clone();
    let mut policy = DifficultyPolicy::seeded(first_legal("First"), DifficultyLevel::Medium, 1);
    policy.select_move(&pos).unwrap();
    assert_eq!(pos, before);
}

#[test]
fn test_no_legal_moves() {
    let mated =
        Position::from_fen("r1bqkbnr/pppp1Qpp/2n5/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 1")
            .unwrap();
    let mut policy = DifficultyPolicy::seeded(first_legal("First"), DifficultyLevel::Hard, 1);
    assert_eq!(policy.select_move(&mated), Err(SessionError::NoLegalMoves));
}

#[test]
fn test_open_king_is_taken_at_any_level() {
    let edited = Position::from_fen("4k3/4R3/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    for level in DifficultyLevel::ALL {
        let oracle = FirstLegal::new("Counter");
        let calls = oracle.calls.clone();
        let mut policy = DifficultyPolicy::seeded(EngineHandle::new(oracle), level, 5);
        assert_eq!(
            policy.select_move(&edited),
            Ok(Move::new(Square::E7, Square::E8)),
            "{level}"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

#[test]
fn test_broken_oracle_is_unavailable() {
    let mut policy =
        DifficultyPolicy::seeded(EngineHandle::new(Broken), DifficultyLevel::Maximum, 1);
    let err = policy.select_move(&Position::startpos()).unwrap_err();
    assert!(matches!(err, SessionError::EngineUnavailable { .. }));
}

#[test]
fn test_illegal_oracle_move_is_refused() {
    let pos = Position::startpos();
    let bogus = Move::new(chess_core::Square::E2, chess_core::Square::E5);
    let mut policy = DifficultyPolicy::seeded(
        EngineHandle::new(FixedLine(vec![bogus])),
        DifficultyLevel::Hard,
        1,
    );
    assert!(matches!(
        policy.select_move(&pos),
        Err(SessionError::EngineUnavailable { .. })
    ));
}

#[test]
fn test_hint_and_analyse() {
    let pos = Position::startpos();
    let e4 = pos.parse_uci("e2e4").unwrap();
    let e5 = Move::new(chess_core::Square::E7, chess_core::Square::E5);
    let policy = DifficultyPolicy::seeded(
        EngineHandle::new(FixedLine(vec![e4, e5])),
        DifficultyLevel::TrivialRandom,
        1,
    );
    let limits = || SearchLimits::time(Duration::from_millis(100));
    assert_eq!(policy.hint(&pos, limits()).unwrap(), e4);
    assert_eq!(policy.analyse(&pos, limits()).unwrap(), vec![e4, e5]);

    let silent = DifficultyPolicy::seeded(
        EngineHandle::new(FixedLine(Vec::new())),
        DifficultyLevel::Hard,
        1,
    );
    assert_eq!(silent.hint(&pos, limits()), Err(SessionError::NoPrincipalVariation));
}

#[test]
fn test_level_names() {
    assert_eq!("medium".parse::<DifficultyLevel>(), Ok(DifficultyLevel::Medium));
    assert_eq!("Impossible".parse::<DifficultyLevel>(), Ok(DifficultyLevel::Maximum));
    assert_eq!(
        "super duper easy".parse::<DifficultyLevel>(),
        Ok(DifficultyLevel::TrivialRandom)
    );
    assert!("brutal".parse::<DifficultyLevel>().is_err());
    assert_eq!(DifficultyLevel::default(), DifficultyLevel::Medium);
    assert_eq!(DifficultyLevel::Maximum.to_string(), "Impossible");
}

#[test]
fn test_level_from_toml() {
    #[derive(Deserialize)]
    struct Wrapper {
        level: DifficultyLevel,
    }
    let parsed: Wrapper = toml::from_str("level = \"trivial\"").unwrap();
    assert_eq!(parsed.level, DifficultyLevel::TrivialRandom);
    let parsed: Wrapper = toml::from_str("level = \"Impossible\"").unwrap();
    assert_eq!(parsed.level, DifficultyLevel::Maximum);
}

#[test]
fn test_oracle_table() {
    assert!(DifficultyLevel::TrivialRandom.oracle_limits().is_none());
    assert_eq!(DifficultyLevel::Medium.oracle_limits().unwrap().depth, 5);
    assert_eq!(
        DifficultyLevel::Maximum.oracle_limits().unwrap().move_time,
        Some(Duration::from_millis(100))
    );
    assert_eq!(DifficultyLevel::Easy.random_probability(), 0.7);
}
