//! Chess rules engine.
//!
//! This crate provides:
//! - [`Position`] - one snapshot of board state, including the per-piece
//!   "has moved" mask and castling flags
//! - [`Board`] - the live position plus an undo stack
//! - Move generation, attack detection and legality filtering ([`movegen`])
//! - Move execution with castling, en passant and two-step promotion
//!   ([`executor`])
//! - [`Game`] - a turn-level session with selection, promotion and
//!   game-over states
//! - [`MoveSuggester`] - the boundary to external engines
//!
//! # Example
//!
//! ```
//! use chess_engine::Game;
//! use chess_core::Square;
//!
//! let mut game = Game::new();
//! game.play_uci("e2e4").unwrap();
//!
//! let d4 = Square::from_algebraic("d4").unwrap();
//! assert!(game.legal_moves(d4).is_empty());
//! assert_eq!(
//!     game.to_fen(),
//!     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
//! );
//! ```

mod bitboard;
mod board;
pub mod executor;
mod game;
pub mod movegen;
mod position;
pub mod suggest;

pub use bitboard::Bitboard;
pub use board::Board;
pub use executor::{apply_move, promote, undo, MoveError, MoveRecord, PromotionError};
pub use game::{Game, GameError, Phase};
pub use movegen::{
    attackers_of, attacks_from, has_legal_move, is_checkmate, is_in_check, is_square_attacked,
    legal_destinations, legal_moves, raw_moves, NoKingError,
};
pub use position::{CastleSquares, CastlingPiece, CastlingRights, Position};
pub use suggest::{parse_bestmove, MoveSuggester, SuggestError};
