//! Attack detection.
//!
//! A square is attacked by a side if any piece of that side could move onto
//! it by its raw movement rule, with two adjustments: pawns attack only their
//! forward diagonals (never the push squares), and castling never attacks.

use super::{generate, pawn_attacks, Castling};
use crate::{Bitboard, Position};
use chess_core::{Color, PieceKind, Square};
use thiserror::Error;

/// The position has no king of the given color to test.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("no {0} king on the board")]
pub struct NoKingError(pub Color);

/// Returns the squares attacked by the piece on `from`.
pub fn attacks_from(position: &Position, from: Square) -> Bitboard {
    match position.piece_at(from) {
        None => Bitboard::EMPTY,
        Some(piece) if piece.kind == PieceKind::Pawn => pawn_attacks(from, piece.color),
        Some(_) => generate(position, from, Castling::Exclude),
    }
}

/// True if any piece of color `by` attacks `square`.
pub fn is_square_attacked(position: &Position, square: Square, by: Color) -> bool {
    position
        .pieces_of(by)
        .any(|(from, _)| attacks_from(position, from).contains(square))
}

/// Returns the squares holding `by` pieces that attack `square`.
pub fn attackers_of(position: &Position, square: Square, by: Color) -> Bitboard {
    position
        .pieces_of(by)
        .filter(|&(from, _)| attacks_from(position, from).contains(square))
        .map(|(from, _)| from)
        .collect()
}

/// True if the king of `color` is attacked by the other side.
///
/// Fails when the position has no such king.
pub fn is_in_check(position: &Position, color: Color) -> Result<bool, NoKingError> {
    let king = position.king_square(color).ok_or(NoKingError(color))?;
    Ok(is_square_attacked(position, king, color.opposite()))
}
