//! Move execution.
//!
//! Applies a validated move to a [`Board`]: the piece itself, the rook that
//! travels with a castling king, the pawn taken en passant, and the clocks.
//! A pawn reaching its last rank stops the turn until [`promote`] is called.

use chess_core::{CastleSide, Move, Piece, PieceKind, Square};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::movegen::legal_moves;
use crate::position::CastleSquares;
use crate::{Board, Position};

/// Errors from [`apply_move`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece on {0}")]
    NoPieceAtSource(Square),

    #[error("illegal move: {from} to {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("a promotion is pending on {0}")]
    PromotionPending(Square),
}

/// Errors from [`promote`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PromotionError {
    #[error("no promotion is pending on {0}")]
    NotPending(Square),

    #[error("cannot promote to {0}")]
    InvalidKind(PieceKind),
}

/// What happened when a move was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    pub captured: Option<Piece>,
    pub castle: Option<CastleSide>,
    pub en_passant: bool,
    /// Filled in once the pending promotion is resolved.
    pub promotion: Option<PieceKind>,
    pub timestamp: DateTime<Utc>,
}

impl MoveRecord {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// True if the mover is a pawn that still has to be promoted.
    pub fn needs_promotion(&self) -> bool {
        self.piece.kind == PieceKind::Pawn
            && self.to.rank_index() == self.piece.color.promotion_rank() as i8
            && self.promotion.is_none()
    }

    /// The move in coordinate form.
    pub fn to_move(&self) -> Move {
        Move {
            from: self.from,
            to: self.to,
            promotion: self.promotion,
        }
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.castle {
            Some(CastleSide::Kingside) => return write!(f, "O-O"),
            Some(CastleSide::Queenside) => return write!(f, "O-O-O"),
            None => {}
        }
        let sep = if self.is_capture() { 'x' } else { '-' };
        write!(f, "{} {}{}{}", self.piece.identity(), self.from, sep, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "={}", kind.letter().to_ascii_uppercase())?;
        }
        if self.en_passant {
            write!(f, " e.p.")?;
        }
        Ok(())
    }
}

/// Side effects of moving pieces, before turn bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct MoveEffects {
    pub captured: Option<Piece>,
    pub castle: Option<CastleSide>,
    pub en_passant: bool,
}

/// Moves the pieces for `from` to `to` without validating anything.
///
/// Shared by the executor and the legality filter's scratch boards, so both
/// see exactly the same resulting placement.
pub(crate) fn perform(position: &mut Position, from: Square, to: Square) -> MoveEffects {
    let mut effects = MoveEffects::default();
    let Some(piece) = position.piece_at(from) else {
        return effects;
    };

    match piece.kind {
        PieceKind::Pawn
            if position.en_passant() == Some(to)
                && from.file_index() != to.file_index()
                && position.piece_at(to).is_none() =>
        {
            if let Some(victim) = Square::from_coords(to.file_index(), from.rank_index()) {
                effects.captured = position.piece_at(victim);
                effects.en_passant = true;
                position.remove(victim);
            }
        }
        PieceKind::King => {
            if let Some(side) = CastleSquares::from_king_move(piece.color, from, to) {
                let squares = CastleSquares::new(piece.color, side);
                position.relocate(squares.rook_from, squares.rook_to);
                effects.castle = Some(side);
            }
        }
        _ => {}
    }

    let captured = position.relocate(from, to);
    effects.captured = effects.captured.or(captured);
    effects
}

/// Applies a move for the side to move.
///
/// The move must be in [`legal_moves`] for `from`. On success the board has
/// one more undo point; on failure it is untouched.
pub fn apply_move(board: &mut Board, from: Square, to: Square) -> Result<MoveRecord, MoveError> {
    let position = board.position();
    if let Some(pending) = position.pending_promotion() {
        return Err(MoveError::PromotionPending(pending));
    }
    let piece = position.piece_at(from).ok_or(MoveError::NoPieceAtSource(from))?;
    if !legal_moves(position, from).contains(to) {
        return Err(MoveError::IllegalMove { from, to });
    }

    board.push_undo_point();
    let position = board.position_mut();
    let effects = perform(position, from, to);

    if piece.kind == PieceKind::Pawn || effects.captured.is_some() {
        position.halfmove_clock = 0;
    } else {
        position.halfmove_clock = position.halfmove_clock.saturating_add(1);
    }

    let record = MoveRecord {
        piece,
        from,
        to,
        captured: effects.captured,
        castle: effects.castle,
        en_passant: effects.en_passant,
        promotion: None,
        timestamp: Utc::now(),
    };

    if record.needs_promotion() {
        position.pending_promotion = Some(to);
    } else {
        end_turn(position);
    }

    tracing::debug!(
        piece = piece.identity(),
        %from,
        %to,
        captured = ?effects.captured.map(Piece::identity),
        "move applied"
    );
    Ok(record)
}

/// Replaces the pawn awaiting promotion on `square` and ends the turn.
pub fn promote(board: &mut Board, square: Square, kind: PieceKind) -> Result<(), PromotionError> {
    let position = board.position_mut();
    if position.pending_promotion() != Some(square) {
        return Err(PromotionError::NotPending(square));
    }
    if !kind.is_promotion_target() {
        return Err(PromotionError::InvalidKind(kind));
    }

    let color = position.side_to_move();
    // Written directly so the square keeps its moved bit.
    position.grid[square.index() as usize] = Some(Piece::new(color, kind));
    position.pending_promotion = None;
    end_turn(position);

    tracing::debug!(%square, kind = %kind, "pawn promoted");
    Ok(())
}

/// Restores the position before the last applied move.
///
/// Returns `false` if there is nothing to undo.
pub fn undo(board: &mut Board) -> bool {
    let undone = board.pop_undo_point();
    if undone {
        tracing::debug!(depth = board.undo_depth(), "move undone");
    }
    undone
}

fn end_turn(position: &mut Position) {
    if position.side_to_move == chess_core::Color::Black {
        position.fullmove_number = position.fullmove_number.saturating_add(1);
    }
    position.side_to_move = position.side_to_move.opposite();
}
