//! Live board state with an undo stack.

use chess_core::{FenError, Piece, Square};

use crate::Position;

/// The authoritative board for one game: the current [`Position`] plus a
/// stack of earlier snapshots.
///
/// Every applied move pushes a snapshot first, so each pop undoes exactly
/// one move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    position: Position,
    history: Vec<Position>,
}

impl Board {
    /// Creates a board with the standard starting placement.
    pub fn new_game() -> Self {
        Self::from_position(Position::startpos())
    }

    /// Creates a board from an arbitrary position with empty history.
    pub fn from_position(position: Position) -> Self {
        Board {
            position,
            history: Vec::new(),
        }
    }

    /// Creates a board from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub(crate) fn position_mut(&mut self) -> &mut Position {
        &mut self.position
    }

    /// Returns the piece at the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.position.piece_at(sq)
    }

    /// Returns an independent copy of the current position.
    pub fn snapshot(&self) -> Position {
        self.position.snapshot()
    }

    /// Saves the current position on the undo stack.
    pub fn push_undo_point(&mut self) {
        self.history.push(self.position.snapshot());
    }

    /// Restores the most recent saved position.
    ///
    /// Returns `false` without touching anything when the stack is empty.
    pub fn pop_undo_point(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.position = previous;
                true
            }
            None => false,
        }
    }

    /// Number of saved positions.
    #[inline]
    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    /// Converts the current position to a FEN string.
    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new_game()
    }
}
