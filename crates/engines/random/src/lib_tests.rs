use super::*;

#[test]
fn random_engine_returns_legal_move() {
    let mut engine = RandomEngine::new();
    let pos = Position::startpos();

    let result = engine.search(&pos, SearchLimits::depth(1)).unwrap();

    let best = result.best_move.unwrap();
    assert!(pos.legal_moves().contains(&best));
    assert_eq!(result.pv, vec![best]);
}

#[test]
fn random_engine_is_reproducible_when_seeded() {
    let pos = Position::startpos();
    let mut a = RandomEngine::seeded(7);
    let mut b = RandomEngine::seeded(7);
    for _ in 0..10 {
        assert_eq!(
            a.play(&pos, SearchLimits::depth(1)).unwrap(),
            b.play(&pos, SearchLimits::depth(1)).unwrap()
        );
    }
}

#[test]
fn random_engine_handles_checkmate() {
    let mut engine = RandomEngine::new();
    let pos =
        Position::from_fen("r1bqkbnr/pppp1Qpp/2n5/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 1")
            .unwrap();

    let result = engine.search(&pos, SearchLimits::depth(1)).unwrap();

    assert!(result.best_move.is_none());
    assert!(engine.analyse(&pos, SearchLimits::depth(1)).unwrap().is_empty());
}

#[test]
fn random_engine_handles_stalemate() {
    let mut engine = RandomEngine::new();
    let pos = Position::from_fen("k7/8/1Q6/8/8/8/8/1K6 b - - 0 1").unwrap();

    let result = engine.search(&pos, SearchLimits::depth(1)).unwrap();

    assert!(result.best_move.is_none());
}

#[test]
fn random_engine_rejects_board_without_kings() {
    let mut engine = RandomEngine::new();
    let pos = Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 1").unwrap();
    assert!(engine.search(&pos, SearchLimits::depth(1)).is_err());
}
