//! Line-oriented play session.
//!
//! Reads commands from any [`BufRead`] and writes replies to any [`Write`],
//! so the same loop drives stdin/stdout and the tests.

use chess_core::{Move, PieceKind, Square};
use chess_engine::{Bitboard, Game, GameError, Phase, Position};
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A coordinate move such as `e2e4` or `e7e8q`.
    Move(String),
    Select(Square),
    To(Square),
    Deselect,
    Moves(Square),
    Promote(PieceKind),
    Undo,
    Board,
    Fen,
    Log,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0} (try 'help')")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("invalid promotion piece: {0} (use q, r, b or n)")]
    InvalidPiece(String),
}

fn square_arg(name: &'static str, arg: Option<&str>) -> Result<Square, CommandError> {
    let arg = arg.ok_or(CommandError::MissingArgument(name))?;
    Square::from_algebraic(arg).ok_or_else(|| CommandError::InvalidSquare(arg.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Unknown(String::new()));
        };
        let arg = words.next();

        match head.to_ascii_lowercase().as_str() {
            "select" | "sel" => Ok(Command::Select(square_arg("select", arg)?)),
            "to" => Ok(Command::To(square_arg("to", arg)?)),
            "deselect" => Ok(Command::Deselect),
            "moves" => Ok(Command::Moves(square_arg("moves", arg)?)),
            "promote" => {
                let arg = arg.ok_or(CommandError::MissingArgument("promote"))?;
                let mut chars = arg.chars();
                match (chars.next().and_then(PieceKind::from_letter), chars.next()) {
                    (Some(kind), None) if kind.is_promotion_target() => Ok(Command::Promote(kind)),
                    _ => Err(CommandError::InvalidPiece(arg.to_string())),
                }
            }
            "undo" => Ok(Command::Undo),
            "board" => Ok(Command::Board),
            "fen" => Ok(Command::Fen),
            "log" => Ok(Command::Log),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            mv if Move::from_uci(mv).is_ok() => Ok(Command::Move(mv.to_string())),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

const HELP: &str = "\
commands:
  e2e4, e7e8q      play a move in coordinate notation
  select <sq>      pick a piece and list where it can go
  to <sq>          move the selected piece
  deselect         drop the selection
  moves <sq>       list legal destinations of a piece
  promote <q|r|b|n> choose the promotion piece
  undo             take back the last move
  board, fen, log  show the position or the move list
  quit";

/// Renders the board, marking `highlights` with `*` (empty) or `x` (capture).
pub fn render(position: &Position, highlights: Bitboard) -> String {
    let mut out = String::new();
    for rank in (0..8).rev() {
        out.push_str(&format!("{} ", rank + 1));
        for file in 0..8 {
            let Some(sq) = Square::from_coords(file, rank) else {
                continue;
            };
            let c = match (position.piece_at(sq), highlights.contains(sq)) {
                (None, false) => '.',
                (None, true) => '*',
                (Some(_), true) => 'x',
                (Some(piece), false) => piece.to_fen_char(),
            };
            out.push(' ');
            out.push(c);
        }
        out.push('\n');
    }
    out.push_str("   a b c d e f g h");
    out
}

fn list(squares: Bitboard) -> String {
    if squares.is_empty() {
        return "no legal moves".to_string();
    }
    squares
        .squares()
        .map(|sq| sq.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A game plus the front end's display settings.
pub struct Session {
    game: Game,
    show_legal_moves: bool,
}

impl Session {
    pub fn new(game: Game, show_legal_moves: bool) -> Self {
        Session {
            game,
            show_legal_moves,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Describes whose turn it is, or how the game ended.
    pub fn status(&self) -> String {
        match self.game.phase() {
            Phase::GameOver { winner } => format!("checkmate, {} wins", winner),
            Phase::AwaitingPromotion { square } => {
                format!("promote the pawn on {} (q, r, b or n)", square)
            }
            _ => {
                let side = self.game.side_to_move();
                match self.game.is_check() {
                    Ok(true) => format!("{} to move, in check", side),
                    _ => format!("{} to move", side),
                }
            }
        }
    }

    fn board_view(&self, highlights: Bitboard) -> String {
        let highlights = if self.show_legal_moves {
            highlights
        } else {
            Bitboard::EMPTY
        };
        format!("{}\n{}", render(self.game.position(), highlights), self.status())
    }

    /// Runs one command. Returns `None` when the session should end.
    pub fn execute(&mut self, command: Command) -> Result<Option<String>, GameError> {
        let reply = match command {
            Command::Move(uci) => {
                let record = self.game.play_uci(&uci)?;
                format!("{}\n{}", record, self.board_view(Bitboard::EMPTY))
            }
            Command::Select(sq) => {
                let targets = self.game.select(sq)?;
                format!("{}: {}\n{}", sq, list(targets), self.board_view(targets))
            }
            Command::To(sq) => {
                let record = self.game.move_to(sq)?;
                format!("{}\n{}", record, self.board_view(Bitboard::EMPTY))
            }
            Command::Deselect => {
                self.game.deselect();
                self.status()
            }
            Command::Moves(sq) => list(self.game.legal_moves(sq)),
            Command::Promote(kind) => {
                let record = self.game.promote(kind)?;
                format!("{}\n{}", record, self.board_view(Bitboard::EMPTY))
            }
            Command::Undo => {
                if self.game.undo() {
                    self.board_view(Bitboard::EMPTY)
                } else {
                    "nothing to undo".to_string()
                }
            }
            Command::Board => self.board_view(Bitboard::EMPTY),
            Command::Fen => self.game.to_fen(),
            Command::Log => {
                let lines: Vec<String> = self
                    .game
                    .move_log()
                    .iter()
                    .enumerate()
                    .map(|(i, record)| format!("{:>3}. {}", i + 1, record))
                    .collect();
                if lines.is_empty() {
                    "no moves yet".to_string()
                } else {
                    lines.join("\n")
                }
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(None),
        };
        Ok(Some(reply))
    }

    /// Reads commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        writeln!(output, "{}", self.board_view(Bitboard::EMPTY))?;
        write!(output, "> ")?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if !line.is_empty() {
                match line.parse::<Command>() {
                    Err(e) => writeln!(output, "error: {}", e)?,
                    Ok(command) => match self.execute(command) {
                        Ok(Some(reply)) => writeln!(output, "{}", reply)?,
                        Ok(None) => break,
                        Err(e) => {
                            tracing::debug!(error = %e, input = line, "command rejected");
                            writeln!(output, "error: {}", e)?
                        }
                    },
                }
            }
            write!(output, "> ")?;
            output.flush()?;
        }
        Ok(())
    }
}
