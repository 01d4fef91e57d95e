//! Legality filtering and checkmate detection.
//!
//! A raw move is legal if, once played on a scratch copy of the position,
//! the mover's king is not attacked. Castling additionally requires that the
//! king is not in check now and does not pass through an attacked square.

use super::{is_in_check, is_square_attacked, raw_moves, NoKingError};
use crate::executor::perform;
use crate::position::CastleSquares;
use crate::{Bitboard, Position};
use chess_core::{CastleSide, Color, PieceKind, Square};

/// Returns the legal destinations for the piece on `from`.
///
/// Empty when the square is empty, when the piece does not belong to the
/// side to move, or while a promotion is pending.
pub fn legal_moves(position: &Position, from: Square) -> Bitboard {
    match position.piece_at(from) {
        Some(piece)
            if piece.color == position.side_to_move() && position.pending_promotion().is_none() =>
        {
            legal_destinations(position, from)
        }
        _ => Bitboard::EMPTY,
    }
}

/// Returns the legal destinations for the piece on `from`, whoever's turn
/// it is.
pub fn legal_destinations(position: &Position, from: Square) -> Bitboard {
    let Some(piece) = position.piece_at(from) else {
        return Bitboard::EMPTY;
    };
    let color = piece.color;

    raw_moves(position, from)
        .squares()
        .filter(|&to| {
            if piece.kind == PieceKind::King {
                if let Some(side) = CastleSquares::from_king_move(color, from, to) {
                    if !castling_path_safe(position, color, side) {
                        return false;
                    }
                }
            }
            let mut scratch = position.snapshot();
            perform(&mut scratch, from, to);
            !king_exposed(&scratch, color)
        })
        .collect()
}

/// The king may not castle out of check or across an attacked square.
/// Landing on an attacked square is caught by the general king-safety test.
fn castling_path_safe(position: &Position, color: Color, side: CastleSide) -> bool {
    let squares = CastleSquares::new(color, side);
    let enemy = color.opposite();
    !is_square_attacked(position, squares.king_from, enemy)
        && !is_square_attacked(position, squares.rook_to, enemy)
}

/// A side without a king has nothing to protect.
fn king_exposed(position: &Position, color: Color) -> bool {
    is_in_check(position, color).unwrap_or(false)
}

/// True if any piece of `color` has at least one legal destination.
pub fn has_legal_move(position: &Position, color: Color) -> bool {
    position
        .pieces_of(color)
        .any(|(from, _)| legal_destinations(position, from).is_not_empty())
}

/// True if `color` is in check and no piece of that color has a legal move.
///
/// Fails when the position has no king of that color.
pub fn is_checkmate(position: &Position, color: Color) -> Result<bool, NoKingError> {
    if !is_in_check(position, color)? {
        return Ok(false);
    }
    Ok(!has_legal_move(position, color))
}
