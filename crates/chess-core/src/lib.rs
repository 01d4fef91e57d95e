//! Core types for chess.
//!
//! This crate provides the value types shared by the rules engine and its
//! collaborators:
//! - [`Piece`], [`PieceKind`] and [`Color`], plus the static piece [`catalog`]
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] in coordinate notation for the external-engine boundary
//! - FEN parsing and serialization

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{CastleSide, Fen, FenError};
pub use mov::{Move, MoveParseError};
pub use piece::{catalog, CatalogEntry, CatalogError, Movement, Piece, PieceKind};
pub use square::{File, Rank, Square};
