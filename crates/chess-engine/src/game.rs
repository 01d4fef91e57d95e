//! Turn-level game session.
//!
//! [`Game`] wraps a [`Board`] with the interaction flow a front end needs:
//! pick a piece, pick a destination, pick a promotion piece when a pawn
//! arrives, and stop once the side to move is checkmated.

use crate::executor::{self, MoveError, MoveRecord, PromotionError};
use crate::movegen::{self, NoKingError};
use crate::suggest::{parse_bestmove, MoveSuggester, SuggestError};
use crate::{Bitboard, Board, Position};
use chess_core::{Color, FenError, Move, MoveParseError, PieceKind, Square};
use serde::Serialize;
use thiserror::Error;

/// Where the session is in the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    AwaitingSelection,
    AwaitingDestination { from: Square },
    AwaitingPromotion { square: Square },
    GameOver { winner: Color },
}

/// Error type for game operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("game is over, {0} won")]
    GameOver(Color),

    #[error("no piece of the side to move on {0}")]
    InvalidSelection(Square),

    #[error("no piece is selected")]
    NothingSelected,

    #[error("no promotion is pending")]
    NoPromotionPending,

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Promotion(#[from] PromotionError),

    #[error(transparent)]
    Parse(#[from] MoveParseError),

    #[error(transparent)]
    NoKing(#[from] NoKingError),

    #[error(transparent)]
    Suggest(#[from] SuggestError),
}

/// A chess game in progress.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    phase: Phase,
    log: Vec<MoveRecord>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_board(Board::new_game())
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_board(Board::from_fen(fen)?))
    }

    /// Creates a game from an existing board. A board that is already
    /// checkmate starts out finished.
    pub fn from_board(board: Board) -> Self {
        let mut game = Game {
            board,
            phase: Phase::AwaitingSelection,
            log: Vec::new(),
        };
        game.refresh_phase();
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn position(&self) -> &Position {
        self.board.position()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn side_to_move(&self) -> Color {
        self.position().side_to_move()
    }

    /// The currently selected square, if any.
    pub fn selected(&self) -> Option<Square> {
        match self.phase {
            Phase::AwaitingDestination { from } => Some(from),
            _ => None,
        }
    }

    /// The winner, once the game is over.
    pub fn winner(&self) -> Option<Color> {
        match self.phase {
            Phase::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    /// Applied moves, oldest first.
    pub fn move_log(&self) -> &[MoveRecord] {
        &self.log
    }

    /// Legal destinations for the piece on `from`.
    pub fn legal_moves(&self, from: Square) -> Bitboard {
        movegen::legal_moves(self.position(), from)
    }

    /// True if the side to move is in check.
    pub fn is_check(&self) -> Result<bool, NoKingError> {
        movegen::is_in_check(self.position(), self.side_to_move())
    }

    /// True if the side to move is checkmated.
    pub fn is_checkmate(&self) -> Result<bool, NoKingError> {
        movegen::is_checkmate(self.position(), self.side_to_move())
    }

    pub fn to_fen(&self) -> String {
        self.board.to_fen()
    }

    /// Selects a piece of the side to move and returns its legal destinations.
    ///
    /// Selecting again replaces the previous selection.
    pub fn select(&mut self, square: Square) -> Result<Bitboard, GameError> {
        self.ensure_playing()?;
        let owned = self
            .position()
            .piece_at(square)
            .is_some_and(|piece| piece.color == self.side_to_move());
        if !owned {
            return Err(GameError::InvalidSelection(square));
        }
        self.phase = Phase::AwaitingDestination { from: square };
        Ok(self.legal_moves(square))
    }

    /// Drops the current selection, if any.
    pub fn deselect(&mut self) {
        if let Phase::AwaitingDestination { .. } = self.phase {
            self.phase = Phase::AwaitingSelection;
        }
    }

    /// Moves the selected piece to `to`.
    ///
    /// A rejected destination clears the selection.
    pub fn move_to(&mut self, to: Square) -> Result<MoveRecord, GameError> {
        let Some(from) = self.selected() else {
            self.ensure_playing()?;
            return Err(GameError::NothingSelected);
        };
        let result = self.play(from, to);
        if result.is_err() {
            self.deselect();
        }
        result
    }

    /// Plays a move from `from` to `to` for the side to move.
    pub fn play(&mut self, from: Square, to: Square) -> Result<MoveRecord, GameError> {
        self.ensure_playing()?;
        let record = executor::apply_move(&mut self.board, from, to)?;
        self.log.push(record.clone());
        self.refresh_phase();
        Ok(record)
    }

    /// Plays a move in coordinate notation (`e2e4`, `e7e8q`).
    ///
    /// A promotion letter resolves the promotion in the same call; without
    /// one the game waits in [`Phase::AwaitingPromotion`].
    pub fn play_uci(&mut self, uci: &str) -> Result<MoveRecord, GameError> {
        let mv = Move::from_uci(uci)?;
        let record = self.play(mv.from, mv.to)?;
        match mv.promotion {
            Some(kind) if record.needs_promotion() => self.promote(kind),
            _ => Ok(record),
        }
    }

    /// Resolves the pending promotion.
    pub fn promote(&mut self, kind: PieceKind) -> Result<MoveRecord, GameError> {
        let Phase::AwaitingPromotion { square } = self.phase else {
            self.ensure_playing()?;
            return Err(GameError::NoPromotionPending);
        };
        executor::promote(&mut self.board, square, kind)?;
        let record = self.log.last_mut().ok_or(GameError::NoPromotionPending)?;
        record.promotion = Some(kind);
        let record = record.clone();
        self.refresh_phase();
        Ok(record)
    }

    /// Takes back the last move, reopening a finished game.
    ///
    /// Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if !executor::undo(&mut self.board) {
            return false;
        }
        self.log.pop();
        self.refresh_phase();
        true
    }

    /// Asks `suggester` for a move and plays it.
    ///
    /// The reply may be a bare coordinate move or a UCI `bestmove` line.
    pub fn apply_suggestion<S>(&mut self, suggester: &mut S) -> Result<MoveRecord, GameError>
    where
        S: MoveSuggester + ?Sized,
    {
        self.ensure_playing()?;
        let reply = suggester.suggest(&self.to_fen())?;
        let uci = match parse_bestmove(&reply) {
            Some(uci) => uci,
            None if reply.trim_start().starts_with("bestmove") => {
                return Err(SuggestError::NoMove.into());
            }
            None => reply.trim(),
        };
        if uci.is_empty() {
            return Err(SuggestError::BadReply(reply.clone()).into());
        }
        tracing::debug!(reply = uci, "applying suggestion");
        self.play_uci(uci)
    }

    fn ensure_playing(&self) -> Result<(), GameError> {
        match self.phase {
            Phase::GameOver { winner } => Err(GameError::GameOver(winner)),
            _ => Ok(()),
        }
    }

    /// Recomputes the phase from the board after it changed.
    fn refresh_phase(&mut self) {
        let position = self.board.position();
        if let Some(square) = position.pending_promotion() {
            self.phase = Phase::AwaitingPromotion { square };
            return;
        }

        let side = position.side_to_move();
        self.phase = match movegen::is_checkmate(position, side) {
            Ok(true) => {
                let winner = side.opposite();
                tracing::info!(%winner, fen = %position.to_fen(), "checkmate");
                Phase::GameOver { winner }
            }
            _ => Phase::AwaitingSelection,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Piece;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn new_game() {
        let game = Game::new();
        assert_eq!(game.phase(), Phase::AwaitingSelection);
        assert!(game.move_log().is_empty());
        assert_eq!(game.is_check(), Ok(false));
        assert!(!game.is_over());
    }

    #[test]
    fn select_then_move() {
        let mut game = Game::new();
        let targets = game.select(sq("g1")).unwrap();
        assert_eq!(targets.count(), 2);
        assert_eq!(game.phase(), Phase::AwaitingDestination { from: sq("g1") });

        let record = game.move_to(sq("f3")).unwrap();
        assert_eq!(record.piece, Piece::new(Color::White, PieceKind::Knight));
        assert_eq!(game.phase(), Phase::AwaitingSelection);
        assert_eq!(game.side_to_move(), Color::Black);
    }

    #[test]
    fn selecting_opponent_piece_fails() {
        let mut game = Game::new();
        assert_eq!(
            game.select(sq("e7")),
            Err(GameError::InvalidSelection(sq("e7")))
        );
        assert_eq!(
            game.select(sq("e4")),
            Err(GameError::InvalidSelection(sq("e4")))
        );
        assert_eq!(game.phase(), Phase::AwaitingSelection);
    }

    #[test]
    fn bad_destination_clears_selection() {
        let mut game = Game::new();
        game.select(sq("e2")).unwrap();
        assert!(matches!(
            game.move_to(sq("e5")),
            Err(GameError::Move(MoveError::IllegalMove { .. }))
        ));
        assert_eq!(game.selected(), None);
        assert_eq!(game.move_to(sq("e4")), Err(GameError::NothingSelected));
    }

    #[test]
    fn deselect() {
        let mut game = Game::new();
        game.select(sq("e2")).unwrap();
        game.deselect();
        assert_eq!(game.phase(), Phase::AwaitingSelection);
    }

    #[test]
    fn fools_mate_ends_the_game() {
        let mut game = Game::new();
        for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            game.play_uci(mv).unwrap();
        }
        assert_eq!(game.phase(), Phase::GameOver { winner: Color::Black });
        assert_eq!(game.is_checkmate(), Ok(true));
        assert_eq!(
            game.play_uci("e2e4"),
            Err(GameError::GameOver(Color::Black))
        );
        assert_eq!(
            game.select(sq("e2")),
            Err(GameError::GameOver(Color::Black))
        );
    }

    #[test]
    fn undo_reopens_finished_game() {
        let mut game = Game::new();
        for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            game.play_uci(mv).unwrap();
        }
        assert!(game.undo());
        assert_eq!(game.phase(), Phase::AwaitingSelection);
        assert_eq!(game.side_to_move(), Color::Black);
        assert_eq!(game.move_log().len(), 3);
    }

    #[test]
    fn promotion_flow() {
        let mut game = Game::from_fen("8/4P3/8/8/8/8/8/k3K3 w - - 0 1").unwrap();
        game.play(sq("e7"), sq("e8")).unwrap();
        assert_eq!(game.phase(), Phase::AwaitingPromotion { square: sq("e8") });
        assert!(game.legal_moves(sq("e1")).is_empty());
        assert!(matches!(
            game.play(sq("e1"), sq("e2")),
            Err(GameError::Move(MoveError::PromotionPending(_)))
        ));

        let record = game.promote(PieceKind::Queen).unwrap();
        assert_eq!(record.promotion, Some(PieceKind::Queen));
        assert_eq!(game.move_log()[0].promotion, Some(PieceKind::Queen));
        assert_eq!(game.phase(), Phase::AwaitingSelection);
        assert_eq!(game.side_to_move(), Color::Black);
    }

    #[test]
    fn promotion_in_one_uci_move() {
        let mut game = Game::from_fen("8/4P3/8/8/8/8/8/k3K3 w - - 0 1").unwrap();
        let record = game.play_uci("e7e8n").unwrap();
        assert_eq!(record.to_move().to_uci(), "e7e8n");
        assert_eq!(
            game.position().piece_at(sq("e8")),
            Some(Piece::new(Color::White, PieceKind::Knight))
        );
    }

    #[test]
    fn promote_without_pending() {
        let mut game = Game::new();
        assert_eq!(
            game.promote(PieceKind::Queen),
            Err(GameError::NoPromotionPending)
        );
    }

    #[test]
    fn invalid_uci() {
        let mut game = Game::new();
        assert!(matches!(game.play_uci("e2"), Err(GameError::Parse(_))));
    }

    #[test]
    fn mated_position_starts_finished() {
        let game = Game::from_fen("3R2k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert_eq!(game.winner(), Some(Color::White));
    }

    #[test]
    fn suggestion_is_validated() {
        let mut game = Game::new();
        let mut engine = |_: &str| Ok::<_, SuggestError>("bestmove e2e4 ponder e7e5".to_string());
        let record = game.apply_suggestion(&mut engine).unwrap();
        assert_eq!(record.to_move().to_uci(), "e2e4");

        let mut cheater = |_: &str| Ok::<_, SuggestError>("e2e4".to_string());
        assert!(matches!(
            game.apply_suggestion(&mut cheater),
            Err(GameError::Move(_))
        ));
    }

    #[test]
    fn suggester_failure_propagates() {
        let mut game = Game::new();
        let mut broken = |_: &str| Err::<String, _>(SuggestError::NoMove);
        assert_eq!(
            game.apply_suggestion(&mut broken),
            Err(GameError::Suggest(SuggestError::NoMove))
        );
    }

    #[test]
    fn unavailable_suggester_leaves_game_untouched() {
        let mut game = Game::new();
        let mut offline =
            |_: &str| Err::<String, _>(SuggestError::Unavailable("engine not running".to_string()));
        assert_eq!(
            game.apply_suggestion(&mut offline),
            Err(GameError::Suggest(SuggestError::Unavailable(
                "engine not running".to_string()
            )))
        );
        assert!(game.move_log().is_empty());
        assert_eq!(game.board().undo_depth(), 0);
        assert_eq!(game.side_to_move(), Color::White);
    }

    #[test]
    fn null_bestmove_is_no_move() {
        let mut game = Game::new();
        let mut resigned = |_: &str| Ok::<_, SuggestError>("bestmove (none)".to_string());
        assert_eq!(
            game.apply_suggestion(&mut resigned),
            Err(GameError::Suggest(SuggestError::NoMove))
        );

        let mut silent = |_: &str| Ok::<_, SuggestError>("   ".to_string());
        assert_eq!(
            game.apply_suggestion(&mut silent),
            Err(GameError::Suggest(SuggestError::BadReply("   ".to_string())))
        );
    }
}
