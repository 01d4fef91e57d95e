//! Property tests over random legal games.

use chess_core::{Color, PieceKind, Square};
use chess_engine::{
    apply_move, is_in_check, legal_moves, promote, undo, Board, Position,
};
use proptest::prelude::*;

/// Every legal (from, to) pair for the side to move.
fn all_moves(position: &Position) -> Vec<(Square, Square)> {
    position
        .pieces_of(position.side_to_move())
        .flat_map(|(from, _)| {
            legal_moves(position, from)
                .squares()
                .map(move |to| (from, to))
        })
        .collect()
}

/// Plays one move picked by `choice`, promoting to a queen when needed.
/// Returns `false` once the side to move has no legal moves.
fn step(board: &mut Board, choice: usize) -> bool {
    let moves = all_moves(board.position());
    if moves.is_empty() {
        return false;
    }
    let (from, to) = moves[choice % moves.len()];
    apply_move(board, from, to).unwrap();
    if let Some(square) = board.position().pending_promotion() {
        promote(board, square, PieceKind::Queen).unwrap();
    }
    true
}

fn random_game(choices: &[usize]) -> Board {
    let mut board = Board::new_game();
    for &choice in choices {
        if !step(&mut board, choice) {
            break;
        }
    }
    board
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn undo_restores_every_position(choices in prop::collection::vec(any::<usize>(), 0..60)) {
        let mut board = Board::new_game();
        let mut seen = vec![board.position().clone()];
        for &choice in &choices {
            if !step(&mut board, choice) {
                break;
            }
            seen.push(board.position().clone());
        }
        while let Some(expected) = seen.pop() {
            prop_assert_eq!(board.position(), &expected);
            if seen.is_empty() {
                prop_assert!(!undo(&mut board));
            } else {
                prop_assert!(undo(&mut board));
            }
        }
    }

    #[test]
    fn legal_moves_is_pure(choices in prop::collection::vec(any::<usize>(), 0..60)) {
        let board = random_game(&choices);
        let position = board.position();
        let before = position.clone();
        for sq in Square::all() {
            let first = legal_moves(position, sq);
            let second = legal_moves(position, sq);
            prop_assert_eq!(first, second);
        }
        prop_assert_eq!(position, &before);
    }

    #[test]
    fn side_not_to_move_has_no_moves(choices in prop::collection::vec(any::<usize>(), 0..60)) {
        let board = random_game(&choices);
        let position = board.position();
        let waiting = position.side_to_move().opposite();
        for (sq, _) in position.pieces_of(waiting) {
            prop_assert!(legal_moves(position, sq).is_empty());
        }
    }

    #[test]
    fn mover_never_left_in_check(choices in prop::collection::vec(any::<usize>(), 1..60)) {
        let mut board = Board::new_game();
        for &choice in &choices {
            let mover = board.position().side_to_move();
            if !step(&mut board, choice) {
                break;
            }
            prop_assert_eq!(is_in_check(board.position(), mover), Ok(false));
        }
    }

    #[test]
    fn fen_export_reimports(choices in prop::collection::vec(any::<usize>(), 0..60)) {
        let board = random_game(&choices);
        let fen = board.to_fen();
        let reparsed = Position::from_fen(&fen).unwrap();
        prop_assert_eq!(reparsed.to_fen(), fen);
    }

    #[test]
    fn both_kings_survive(choices in prop::collection::vec(any::<usize>(), 0..60)) {
        let board = random_game(&choices);
        for color in Color::ALL {
            prop_assert!(board.position().king_square(color).is_some());
        }
    }

    #[test]
    fn clocks_near_the_limit_keep_counting(
        halfmove in (u32::MAX - 8)..=u32::MAX,
        fullmove in (u32::MAX - 8)..=u32::MAX,
        choices in prop::collection::vec(any::<usize>(), 1..40),
    ) {
        let fen = format!("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - {} {}", halfmove, fullmove);
        let mut board = Board::from_fen(&fen).unwrap();
        let start = board.position().clone();
        let mut played = 0;
        for &choice in &choices {
            let before = board.position().clone();
            if !step(&mut board, choice) {
                break;
            }
            played += 1;
            let after = board.position();
            prop_assert!(
                after.halfmove_clock() == 0 || after.halfmove_clock() >= before.halfmove_clock()
            );
            prop_assert!(after.fullmove_number() >= before.fullmove_number());
        }
        for _ in 0..played {
            prop_assert!(undo(&mut board));
        }
        prop_assert_eq!(board.position(), &start);
    }
}
