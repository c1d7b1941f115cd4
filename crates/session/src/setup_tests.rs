use super::*;

fn pos(fen: &str) -> Position {
    Position::from_fen(fen).unwrap()
}

fn white(kind: PieceKind) -> Piece {
    Piece::new(Color::White, kind)
}

#[test]
fn test_clear_keeps_kings_on_their_squares() {
    let mut board = Position::startpos();
    let report = clear_non_kings(&mut board);

    assert!(!report.kings_repaired);
    assert!(report.missing_kings.is_empty());
    assert_eq!(board.occupied().count(), 2);
    assert_eq!(board.king_square(Color::White), Some(Square::E1));
    assert_eq!(board.king_square(Color::Black), Some(Square::E8));
    assert_eq!(board.castling, chess_core::CastlingRights::NONE);

    assert!(!enforce_king_invariant(&mut board));
    assert_eq!(board.pieces(Color::White, PieceKind::King), vec![Square::E1]);
    assert_eq!(board.pieces(Color::Black, PieceKind::King), vec![Square::E8]);
}

#[test]
fn test_king_invariant_is_idempotent() {
    let boards = [
        "8/8/8/8/8/8/8/8 w - - 0 1",
        "k6k/8/8/8/8/8/8/K6K w - - 0 1",
        "4q3/8/8/8/3K4/8/8/4n3 w - - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    ];
    for fen in boards {
        let mut once = pos(fen);
        enforce_king_invariant(&mut once);
        let mut twice = once.clone();
        assert!(!enforce_king_invariant(&mut twice), "{fen}");
        assert_eq!(once, twice, "{fen}");
    }
}

#[test]
fn test_extra_kings_are_collapsed_to_home() {
    let mut board = pos("k6k/8/8/8/8/8/8/K6K w - - 0 1");
    assert!(enforce_king_invariant(&mut board));
    assert_eq!(board.pieces(Color::White, PieceKind::King), vec![Square::E1]);
    assert_eq!(board.pieces(Color::Black, PieceKind::King), vec![Square::E8]);
}

#[test]
fn test_king_stays_missing_when_home_is_taken() {
    // White king gone, a black queen sits on e1.
    let mut board = pos("4k3/8/8/8/8/8/8/4q3 w - - 0 1");
    let report = settle(&mut board);
    assert!(!report.kings_repaired);
    assert_eq!(report.missing_kings, vec![Color::White]);
}

#[test]
fn test_place_refuses_to_overwrite_king() {
    let mut board = Position::startpos();
    let before = board.clone();
    assert_eq!(
        place_piece(&mut board, Square::E1, white(PieceKind::Queen)),
        Err(SessionError::CannotReplaceKing { square: Square::E1 })
    );
    assert_eq!(board, before);

    place_piece(&mut board, Square::E4, white(PieceKind::Queen)).unwrap();
    assert_eq!(board.piece_at(Square::E4), Some(white(PieceKind::Queen)));
}

#[test]
fn test_placing_second_king_triggers_repair() {
    let mut board = Position::startpos();
    let report = place_piece(&mut board, Square::D4, white(PieceKind::King)).unwrap();
    assert!(report.kings_repaired);
    assert_eq!(board.pieces(Color::White, PieceKind::King), vec![Square::E1]);
    assert_eq!(board.piece_at(Square::D4), None);
}

#[test]
fn test_removed_king_comes_back_home() {
    let mut board = pos("4k3/8/8/8/3K4/8/8/8 w - - 0 1");
    let report = remove_piece(&mut board, Square::D4).unwrap();
    assert!(report.kings_repaired);
    assert_eq!(board.king_square(Color::White), Some(Square::E1));
    assert_eq!(
        remove_piece(&mut board, Square::A1),
        Err(SessionError::EmptySquare { square: Square::A1 })
    );
}

#[test]
fn test_relocate_rules() {
    let mut board = Position::startpos();
    assert_eq!(
        relocate_piece(&mut board, Square::E1, Square::E4),
        Err(SessionError::CannotMoveKing { square: Square::E1 })
    );
    assert_eq!(
        relocate_piece(&mut board, Square::D1, Square::E8),
        Err(SessionError::CannotReplaceKing { square: Square::E8 })
    );
    relocate_piece(&mut board, Square::H1, Square::H4).unwrap();
    assert_eq!(board.piece_at(Square::H4), Some(white(PieceKind::Rook)));
    assert!(!board.castling.wk);
    assert!(board.castling.wq);
}

#[test]
fn test_edit_text_form() {
    let edits = [
        SetupEdit::Place {
            square: Square::E4,
            piece: Piece::new(Color::Black, PieceKind::Knight),
        },
        SetupEdit::Remove { square: Square::A7 },
        SetupEdit::Relocate {
            from: Square::B1,
            to: Square::C3,
        },
        SetupEdit::ClearNonKings,
        SetupEdit::RepairKings,
    ];
    for edit in edits {
        assert_eq!(SetupEdit::parse(&edit.to_string()), Some(edit));
    }
    assert_eq!(SetupEdit::Remove { square: Square::A7 }.to_string(), "remove a7");
    assert_eq!(SetupEdit::parse("place e4 x"), None);
    assert_eq!(SetupEdit::parse("teleport"), None);
}
