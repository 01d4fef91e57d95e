//! Chess piece representation and the static piece catalog.

use crate::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from catalog lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown piece identity: {0:?}")]
    UnknownPiece(String),
}

/// The six types of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    /// All piece kinds in order.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Kinds a pawn may promote to.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// Returns the index of this kind (0-5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the lowercase letter used in FEN and coordinate notation.
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    /// Parses a piece letter, case-insensitively.
    pub const fn from_letter(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Returns true if a pawn may promote to this kind.
    pub fn is_promotion_target(self) -> bool {
        Self::PROMOTIONS.contains(&self)
    }

    /// Returns the movement class of this kind.
    pub const fn movement(self) -> Movement {
        match self {
            PieceKind::Pawn => Movement::Pawn,
            PieceKind::Knight => Movement::Leaper,
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => Movement::Slider,
            PieceKind::King => Movement::Royal,
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        };
        write!(f, "{}", name)
    }
}

/// How a piece kind moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    /// Pushes forward, captures diagonally.
    Pawn,
    /// Jumps to fixed offsets.
    Leaper,
    /// Slides along rays until blocked.
    Slider,
    /// Single steps plus castling.
    Royal,
}

/// A colored piece, e.g. the white king.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Piece { color, kind }
    }

    /// Looks up a piece by its two-character identity ("WK", "BP", ...).
    pub fn lookup(identity: &str) -> Result<Piece, CatalogError> {
        CATALOG
            .iter()
            .find(|entry| entry.identity == identity)
            .map(|entry| entry.piece)
            .ok_or_else(|| CatalogError::UnknownPiece(identity.to_string()))
    }

    /// Returns the two-character identity of this piece.
    pub fn identity(self) -> &'static str {
        self.entry().identity
    }

    /// Returns this piece's catalog entry.
    pub fn entry(self) -> &'static CatalogEntry {
        &CATALOG[self.color.index() * 6 + self.kind.index()]
    }

    /// Returns the FEN character (uppercase for White).
    pub const fn to_fen_char(self) -> char {
        let c = self.kind.letter();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a FEN character.
    pub const fn from_fen_char(c: char) -> Option<Piece> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        match PieceKind::from_letter(c) {
            Some(kind) => Some(Piece { color, kind }),
            None => None,
        }
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.color, self.kind)
    }
}

/// One row of the piece catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub identity: &'static str,
    pub name: &'static str,
    pub piece: Piece,
    pub movement: Movement,
}

const fn entry(identity: &'static str, name: &'static str, color: Color, kind: PieceKind) -> CatalogEntry {
    CatalogEntry {
        identity,
        name,
        piece: Piece::new(color, kind),
        movement: kind.movement(),
    }
}

// Ordered by color, then by `PieceKind` index; `Piece::entry` relies on it.
static CATALOG: [CatalogEntry; 12] = [
    entry("WP", "White Pawn", Color::White, PieceKind::Pawn),
    entry("WN", "White Knight", Color::White, PieceKind::Knight),
    entry("WB", "White Bishop", Color::White, PieceKind::Bishop),
    entry("WR", "White Rook", Color::White, PieceKind::Rook),
    entry("WQ", "White Queen", Color::White, PieceKind::Queen),
    entry("WK", "White King", Color::White, PieceKind::King),
    entry("BP", "Black Pawn", Color::Black, PieceKind::Pawn),
    entry("BN", "Black Knight", Color::Black, PieceKind::Knight),
    entry("BB", "Black Bishop", Color::Black, PieceKind::Bishop),
    entry("BR", "Black Rook", Color::Black, PieceKind::Rook),
    entry("BQ", "Black Queen", Color::Black, PieceKind::Queen),
    entry("BK", "Black King", Color::Black, PieceKind::King),
];

/// The twelve piece identities.
pub fn catalog() -> &'static [CatalogEntry; 12] {
    &CATALOG
}
