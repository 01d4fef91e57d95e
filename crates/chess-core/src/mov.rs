//! Coordinate-notation moves.
//!
//! This is the interchange form used at the external-engine boundary
//! ("e2e4", "e7e8q"). It carries no legality information; the engine
//! validates every move against the current position.

use crate::{PieceKind, Square};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when parsing coordinate notation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("invalid move length: {0:?}")]
    InvalidLength(String),

    #[error("invalid square in move: {0:?}")]
    InvalidSquare(String),

    #[error("invalid promotion piece '{0}'")]
    InvalidPromotion(char),
}

/// A move as a pair of squares with an optional promotion choice.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl Move {
    /// Creates a move without promotion.
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    /// Creates a promoting move.
    #[inline]
    pub const fn with_promotion(from: Square, to: Square, kind: PieceKind) -> Self {
        Move {
            from,
            to,
            promotion: Some(kind),
        }
    }

    /// Returns the coordinate notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        match self.promotion {
            Some(kind) => format!("{}{}{}", self.from, self.to, kind.letter()),
            None => format!("{}{}", self.from, self.to),
        }
    }

    /// Parses a move from coordinate notation.
    pub fn from_uci(s: &str) -> Result<Self, MoveParseError> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return Err(MoveParseError::InvalidLength(s.to_string()));
        }
        let from = Square::from_algebraic(&s[0..2])
            .ok_or_else(|| MoveParseError::InvalidSquare(s.to_string()))?;
        let to = Square::from_algebraic(&s[2..4])
            .ok_or_else(|| MoveParseError::InvalidSquare(s.to_string()))?;

        match s.chars().nth(4) {
            Some(c) => match PieceKind::from_letter(c) {
                Some(kind) if kind.is_promotion_target() => {
                    Ok(Move::with_promotion(from, to, kind))
                }
                _ => Err(MoveParseError::InvalidPromotion(c)),
            },
            None => Ok(Move::new(from, to)),
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}
