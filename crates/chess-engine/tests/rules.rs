//! End-to-end rule scenarios played through the public API.

use chess_core::{Color, Piece, PieceKind, Square};
use chess_engine::{
    apply_move, is_checkmate, is_in_check, legal_moves, undo, Board, CastlingPiece, Game,
    MoveError, Phase, Position,
};

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap()
}

fn play(board: &mut Board, from: &str, to: &str) {
    apply_move(board, sq(from), sq(to)).unwrap();
}

#[test]
fn en_passant_offered_from_both_sides() {
    let mut board = Board::from_fen("4k3/8/8/8/3p1p2/8/4P3/4K3 w - - 0 1").unwrap();
    play(&mut board, "e2", "e4");
    assert_eq!(board.position().en_passant(), Some(sq("e3")));

    assert!(legal_moves(board.position(), sq("d4")).contains(sq("e3")));
    assert!(legal_moves(board.position(), sq("f4")).contains(sq("e3")));

    play(&mut board, "f4", "e3");
    assert_eq!(board.piece_at(sq("e4")), None);
    assert_eq!(
        board.piece_at(sq("e3")),
        Some(Piece::new(Color::Black, PieceKind::Pawn))
    );
}

#[test]
fn en_passant_expires_after_one_move() {
    let mut board = Board::from_fen("4k3/p7/8/8/3p4/8/4P3/4K3 w - - 0 1").unwrap();
    play(&mut board, "e2", "e4");
    play(&mut board, "a7", "a6");
    play(&mut board, "e1", "f1");
    assert!(!legal_moves(board.position(), sq("d4")).contains(sq("e3")));
}

#[test]
fn back_rank_mate_and_escape() {
    let mated = Position::from_fen("3R2k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
    assert_eq!(is_in_check(&mated, Color::Black), Ok(true));
    assert_eq!(is_checkmate(&mated, Color::Black), Ok(true));

    let luft = Position::from_fen("3R2k1/5pp1/7p/8/8/8/8/6K1 b - - 0 1").unwrap();
    assert_eq!(is_checkmate(&luft, Color::Black), Ok(false));
    assert!(legal_moves(&luft, sq("g8")).contains(sq("h7")));
}

#[test]
fn kingside_rook_move_leaves_queenside_castling() {
    let mut board = Board::from_fen("r3k2r/p7/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let king = legal_moves(board.position(), Square::E1);
    assert!(king.contains(Square::G1) && king.contains(Square::C1));

    play(&mut board, "h1", "g1");
    play(&mut board, "a7", "a6");
    play(&mut board, "g1", "h1");
    play(&mut board, "a6", "a5");

    let king = legal_moves(board.position(), Square::E1);
    assert!(!king.contains(Square::G1));
    assert!(king.contains(Square::C1));
    assert!(board
        .position()
        .castling()
        .has_moved(CastlingPiece::WhiteKingsideRook));
}

#[test]
fn undo_restores_castling_flags() {
    let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let before = board.position().clone();
    play(&mut board, "e1", "f1");
    assert!(board.position().castling().has_moved(CastlingPiece::WhiteKing));

    assert!(undo(&mut board));
    assert_eq!(board.position(), &before);
    assert!(legal_moves(board.position(), Square::E1).contains(Square::G1));
}

#[test]
fn opponent_pieces_cannot_be_moved() {
    let mut board = Board::new_game();
    assert!(legal_moves(board.position(), sq("e7")).is_empty());
    assert_eq!(
        apply_move(&mut board, sq("e7"), sq("e5")),
        Err(MoveError::IllegalMove {
            from: sq("e7"),
            to: sq("e5")
        })
    );
}

#[test]
fn short_game_to_checkmate() {
    let mut game = Game::new();
    for mv in ["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"] {
        game.play_uci(mv).unwrap();
    }
    assert_eq!(game.phase(), Phase::GameOver { winner: Color::White });
    assert_eq!(game.move_log().len(), 7);
    assert!(game.move_log()[6].is_capture());
}

#[test]
fn promotion_then_checkmate() {
    // The new queen mates along the eighth rank.
    let mut game = Game::from_fen("6k1/1P3ppp/8/8/8/8/8/6K1 w - - 0 1").unwrap();
    game.play_uci("b7b8").unwrap();
    assert_eq!(game.phase(), Phase::AwaitingPromotion { square: sq("b8") });

    game.promote(PieceKind::Queen).unwrap();
    assert_eq!(game.winner(), Some(Color::White));
}

#[test]
fn underpromotion_choice_matters() {
    let mut game = Game::from_fen("6k1/1P3ppp/8/8/8/8/8/6K1 w - - 0 1").unwrap();
    game.play_uci("b7b8r").unwrap();
    assert_eq!(game.winner(), Some(Color::White));

    assert!(game.undo());
    game.play_uci("b7b8n").unwrap();
    assert_eq!(game.phase(), Phase::AwaitingSelection);
    assert_eq!(game.side_to_move(), Color::Black);
}
