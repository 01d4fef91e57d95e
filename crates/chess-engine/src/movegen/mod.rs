//! Move generation.
//!
//! Raw (pseudo-legal) destinations for a single piece: every square its
//! movement rule reaches, ignoring whether the move would leave its own king
//! in check. King safety is the job of [`legal`].
//!
//! Generation is pure: it reads a [`Position`] and never mutates it.

pub mod attacks;
pub mod legal;

use crate::position::CastleSquares;
use crate::{Bitboard, Position};
use chess_core::{CastleSide, Color, Movement, Piece, PieceKind, Square};

pub use attacks::{attackers_of, attacks_from, is_in_check, is_square_attacked, NoKingError};
pub use legal::{has_legal_move, is_checkmate, legal_destinations, legal_moves};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Whether king generation offers castling candidates.
///
/// Attack detection always excludes them: castling never attacks a square,
/// and including it would make attack detection depend on itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Castling {
    Include,
    Exclude,
}

/// Returns the raw move set for the piece on `from`, castling included.
///
/// An empty square yields an empty set.
pub fn raw_moves(position: &Position, from: Square) -> Bitboard {
    generate(position, from, Castling::Include)
}

/// Returns the raw move set for the piece on `from`.
pub fn generate(position: &Position, from: Square, castling: Castling) -> Bitboard {
    let Some(piece) = position.piece_at(from) else {
        return Bitboard::EMPTY;
    };
    let color = piece.color;

    match piece.entry().movement {
        Movement::Pawn => pawn_moves(position, from, color),
        Movement::Leaper => leaper_moves(position, from, color, &KNIGHT_OFFSETS),
        Movement::Slider => slider_moves(position, from, color, slider_directions(piece.kind)),
        Movement::Royal => {
            let mut moves = leaper_moves(position, from, color, &KING_OFFSETS);
            if castling == Castling::Include {
                moves |= castling_candidates(position, from, color);
            }
            moves
        }
    }
}

fn slider_directions(kind: PieceKind) -> &'static [(i8, i8)] {
    match kind {
        PieceKind::Bishop => &BISHOP_DIRECTIONS,
        PieceKind::Rook => &ROOK_DIRECTIONS,
        _ => &QUEEN_DIRECTIONS,
    }
}

#[inline]
fn is_friendly(position: &Position, sq: Square, color: Color) -> bool {
    position.piece_at(sq).is_some_and(|p| p.color == color)
}

fn pawn_moves(position: &Position, from: Square, color: Color) -> Bitboard {
    let dir = color.pawn_direction();
    let mut moves = Bitboard::EMPTY;

    if let Some(one) = from.offset(0, dir).filter(|&sq| position.piece_at(sq).is_none()) {
        moves.set(one);

        let unmoved = !position.has_moved(from) && from.rank_index() == color.pawn_rank() as i8;
        if unmoved {
            if let Some(two) = from
                .offset(0, 2 * dir)
                .filter(|&sq| position.piece_at(sq).is_none())
            {
                moves.set(two);
            }
        }
    }

    for df in [-1, 1] {
        let Some(target) = from.offset(df, dir) else {
            continue;
        };
        match position.piece_at(target) {
            Some(victim) if victim.color != color => moves.set(target),
            None if is_en_passant_capture(position, from, target, color) => moves.set(target),
            _ => {}
        }
    }

    moves
}

/// True if a `color` pawn on `from` may capture en passant onto `target`.
fn is_en_passant_capture(position: &Position, from: Square, target: Square, color: Color) -> bool {
    if position.en_passant() != Some(target) {
        return false;
    }
    // The target is the square the enemy pawn skipped; the pawn itself
    // stands beside the capturer.
    let enemy = color.opposite();
    let expected_rank = enemy.pawn_rank() as i8 + enemy.pawn_direction();
    let victim = Piece::new(enemy, PieceKind::Pawn);
    target.rank_index() == expected_rank
        && position.piece_at_coords(target.file_index(), from.rank_index()) == Some(victim)
}

/// Squares a pawn of `color` on `from` attacks, whether or not occupied.
pub fn pawn_attacks(from: Square, color: Color) -> Bitboard {
    [-1, 1]
        .into_iter()
        .filter_map(|df| from.offset(df, color.pawn_direction()))
        .collect()
}

fn leaper_moves(position: &Position, from: Square, color: Color, offsets: &[(i8, i8)]) -> Bitboard {
    offsets
        .iter()
        .filter_map(|&(df, dr)| from.offset(df, dr))
        .filter(|&sq| !is_friendly(position, sq, color))
        .collect()
}

fn slider_moves(position: &Position, from: Square, color: Color, directions: &[(i8, i8)]) -> Bitboard {
    let mut moves = Bitboard::EMPTY;
    for &(df, dr) in directions {
        let mut current = from;
        while let Some(next) = current.offset(df, dr) {
            match position.piece_at(next) {
                None => moves.set(next),
                Some(blocker) => {
                    if blocker.color != color {
                        moves.set(next);
                    }
                    break;
                }
            }
            current = next;
        }
    }
    moves
}

/// Castling destinations offered from the flags and emptiness alone.
///
/// Whether the king is in check or crosses an attacked square is decided
/// by the legality filter.
fn castling_candidates(position: &Position, from: Square, color: Color) -> Bitboard {
    CastleSide::ALL
        .into_iter()
        .filter_map(|side| {
            let squares = CastleSquares::new(color, side);
            let open = squares.king_from == from
                && position.castling_pieces_in_place(color, side)
                && squares.between().all(|sq| position.piece_at(sq).is_none());
            open.then_some(squares.king_to)
        })
        .collect()
}
