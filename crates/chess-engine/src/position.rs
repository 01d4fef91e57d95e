//! A single snapshot of board state.

use chess_core::{CastleSide, Color, Fen, FenError, File, Piece, PieceKind, Rank, Square};
use std::fmt;

use crate::Bitboard;

/// A piece whose first move forfeits castling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CastlingPiece {
    WhiteKing = 0,
    BlackKing = 1,
    WhiteQueensideRook = 2,
    WhiteKingsideRook = 3,
    BlackQueensideRook = 4,
    BlackKingsideRook = 5,
}

impl CastlingPiece {
    pub const fn king(color: Color) -> Self {
        match color {
            Color::White => CastlingPiece::WhiteKing,
            Color::Black => CastlingPiece::BlackKing,
        }
    }

    pub const fn rook(color: Color, side: CastleSide) -> Self {
        match (color, side) {
            (Color::White, CastleSide::Queenside) => CastlingPiece::WhiteQueensideRook,
            (Color::White, CastleSide::Kingside) => CastlingPiece::WhiteKingsideRook,
            (Color::Black, CastleSide::Queenside) => CastlingPiece::BlackQueensideRook,
            (Color::Black, CastleSide::Kingside) => CastlingPiece::BlackKingsideRook,
        }
    }

    /// The square this piece starts the game on.
    pub const fn origin(self) -> Square {
        match self {
            CastlingPiece::WhiteKing => Square::E1,
            CastlingPiece::BlackKing => Square::E8,
            CastlingPiece::WhiteQueensideRook => Square::A1,
            CastlingPiece::WhiteKingsideRook => Square::H1,
            CastlingPiece::BlackQueensideRook => Square::A8,
            CastlingPiece::BlackKingsideRook => Square::H8,
        }
    }

    #[inline]
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Per-king and per-rook "has moved" flags.
///
/// A flag only ever goes from unset to set during play; restoring an older
/// snapshot is the only way to clear one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    /// Nothing has moved yet.
    pub const UNTOUCHED: CastlingRights = CastlingRights(0);
    /// Every king and rook has moved; no castling for either side.
    pub const FORFEITED: CastlingRights = CastlingRights(0b11_1111);

    #[inline]
    pub const fn has_moved(self, piece: CastlingPiece) -> bool {
        self.0 & piece.bit() != 0
    }

    #[inline]
    pub fn mark_moved(&mut self, piece: CastlingPiece) {
        self.0 |= piece.bit();
    }

    /// True if neither the king nor the rook of that wing has moved.
    #[inline]
    pub const fn can_castle(self, color: Color, side: CastleSide) -> bool {
        !self.has_moved(CastlingPiece::king(color))
            && !self.has_moved(CastlingPiece::rook(color, side))
    }
}

/// Squares involved in one castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastleSquares {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
}

impl CastleSquares {
    pub fn new(color: Color, side: CastleSide) -> Self {
        let rank = match color {
            Color::White => Rank::R1,
            Color::Black => Rank::R8,
        };
        let at = |file: File| Square::new(file, rank);
        match side {
            CastleSide::Kingside => CastleSquares {
                king_from: at(File::E),
                king_to: at(File::G),
                rook_from: at(File::H),
                rook_to: at(File::F),
            },
            CastleSide::Queenside => CastleSquares {
                king_from: at(File::E),
                king_to: at(File::C),
                rook_from: at(File::A),
                rook_to: at(File::D),
            },
        }
    }

    /// Squares strictly between king and rook; all must be empty to castle.
    pub fn between(&self) -> impl Iterator<Item = Square> {
        let rank = self.king_from.rank_index();
        let (lo, hi) = if self.rook_from < self.king_from {
            (self.rook_from.file_index(), self.king_from.file_index())
        } else {
            (self.king_from.file_index(), self.rook_from.file_index())
        };
        ((lo + 1)..hi).filter_map(move |file| Square::from_coords(file, rank))
    }

    /// Identifies a castling move from the king's from/to squares.
    pub fn from_king_move(color: Color, from: Square, to: Square) -> Option<CastleSide> {
        CastleSide::ALL.into_iter().find(|&side| {
            let squares = CastleSquares::new(color, side);
            squares.king_from == from && squares.king_to == to
        })
    }
}

/// One snapshot of board state.
///
/// Cloning a position is a full deep copy; that is what the undo stack and
/// the legality filter's scratch boards are made of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub(crate) grid: [Option<Piece>; 64],
    /// Squares whose occupant has moved since it was placed.
    pub(crate) moved: Bitboard,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) last_move: Option<(Square, Square)>,
    pub(crate) side_to_move: Color,
    /// Square of a pawn that reached its last rank and awaits promotion.
    pub(crate) pending_promotion: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
}

impl Position {
    /// Creates an empty board, White to move, no castling.
    pub fn empty() -> Self {
        Position {
            grid: [None; 64],
            moved: Bitboard::EMPTY,
            castling: CastlingRights::FORFEITED,
            en_passant: None,
            last_move: None,
            side_to_move: Color::White,
            pending_promotion: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen_record(&Fen::default())
    }

    /// Creates a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_fen_record(&Fen::parse(fen)?))
    }

    /// Creates a position from decoded FEN fields.
    ///
    /// Pawns off their starting rank count as moved. Castling availability
    /// that FEN withholds becomes a set "has moved" flag on the rook, or on
    /// the king when both wings are gone.
    pub fn from_fen_record(fen: &Fen) -> Self {
        let mut position = Position::empty();
        position.grid = fen.placement;
        position.side_to_move = fen.side_to_move;
        position.en_passant = fen.en_passant;
        position.halfmove_clock = fen.halfmove_clock;
        position.fullmove_number = fen.fullmove_number;

        position.moved = position
            .pieces()
            .filter(|(sq, piece)| {
                piece.kind == PieceKind::Pawn && sq.rank_index() != piece.color.pawn_rank() as i8
            })
            .map(|(sq, _)| sq)
            .collect();

        let mut castling = CastlingRights::UNTOUCHED;
        for color in Color::ALL {
            let mut any = false;
            for side in CastleSide::ALL {
                if fen.can_castle(color, side) {
                    any = true;
                } else {
                    castling.mark_moved(CastlingPiece::rook(color, side));
                }
            }
            if !any {
                castling.mark_moved(CastlingPiece::king(color));
            }
        }
        position.castling = castling;
        position
    }

    /// Exports the position as decoded FEN fields.
    pub fn to_fen_record(&self) -> Fen {
        let mut castling = Vec::new();
        for color in Color::ALL {
            for side in CastleSide::ALL {
                if self.castling_pieces_in_place(color, side) {
                    castling.push((color, side));
                }
            }
        }
        Fen {
            placement: self.grid,
            side_to_move: self.side_to_move,
            castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        self.to_fen_record().to_string()
    }

    /// True if castling rights are intact and both pieces stand on their origins.
    pub(crate) fn castling_pieces_in_place(&self, color: Color, side: CastleSide) -> bool {
        let squares = CastleSquares::new(color, side);
        self.castling.can_castle(color, side)
            && self.piece_at(squares.king_from) == Some(Piece::new(color, PieceKind::King))
            && self.piece_at(squares.rook_from) == Some(Piece::new(color, PieceKind::Rook))
    }

    /// Returns the piece at the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.grid[sq.index() as usize]
    }

    /// Returns the piece at signed coordinates; `None` off the board.
    #[inline]
    pub fn piece_at_coords(&self, file: i8, rank: i8) -> Option<Piece> {
        Square::from_coords(file, rank).and_then(|sq| self.piece_at(sq))
    }

    /// Puts a piece on a square, replacing whatever was there.
    ///
    /// The placed piece counts as unmoved. Clears the en-passant target.
    pub fn place(&mut self, sq: Square, piece: Piece) {
        self.grid[sq.index() as usize] = Some(piece);
        self.moved.clear(sq);
        self.en_passant = None;
    }

    /// Empties a square.
    pub fn remove(&mut self, sq: Square) {
        self.grid[sq.index() as usize] = None;
        self.moved.clear(sq);
    }

    /// Moves the piece on `from` to `to`, returning whatever was captured on `to`.
    ///
    /// Applies the bookkeeping every move carries: castling flags for kings
    /// and origin-square rooks (including a rook captured on its origin),
    /// the en-passant target after a double step, the moved mask, and the
    /// last-move record. Does nothing if `from` is empty.
    pub(crate) fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.piece_at(from)?;
        let captured = self.piece_at(to);

        match piece.kind {
            PieceKind::King => self.castling.mark_moved(CastlingPiece::king(piece.color)),
            PieceKind::Rook => self.forfeit_rook_at(piece.color, from),
            _ => {}
        }
        if let Some(victim) = captured.filter(|p| p.kind == PieceKind::Rook) {
            self.forfeit_rook_at(victim.color, to);
        }

        self.en_passant = if piece.kind == PieceKind::Pawn
            && (to.rank_index() - from.rank_index()).abs() == 2
        {
            Square::from_coords(from.file_index(), (from.rank_index() + to.rank_index()) / 2)
        } else {
            None
        };

        self.grid[to.index() as usize] = Some(piece);
        self.grid[from.index() as usize] = None;
        self.moved.clear(from);
        self.moved.set(to);
        self.last_move = Some((from, to));
        captured
    }

    fn forfeit_rook_at(&mut self, color: Color, sq: Square) {
        for side in CastleSide::ALL {
            let rook = CastlingPiece::rook(color, side);
            if rook.origin() == sq {
                self.castling.mark_moved(rook);
            }
        }
    }

    /// Returns an independent deep copy.
    #[inline]
    pub fn snapshot(&self) -> Position {
        self.clone()
    }

    /// Iterates over all occupied squares.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// Iterates over the squares holding pieces of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    /// Locates the king of the given color.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceKind::King);
        self.pieces()
            .find(|&(_, piece)| piece == king)
            .map(|(sq, _)| sq)
    }

    /// True if the occupant of `sq` has moved since it was placed.
    #[inline]
    pub fn has_moved(&self, sq: Square) -> bool {
        self.moved.contains(sq)
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// The last move played, for highlighting only.
    #[inline]
    pub fn last_move(&self) -> Option<(Square, Square)> {
        self.last_move
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn pending_promotion(&self) -> Option<Square> {
        self.pending_promotion
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                match self.piece_at_coords(file, rank) {
                    Some(piece) => write!(f, " {}", piece.to_fen_char())?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
