//! Boundary to external move suggesters.
//!
//! An external engine is a black box: it receives the position as FEN and
//! answers with a coordinate move such as `e2e4` or `e7e8q`. The answer is
//! untrusted and goes through the same validation as a human move.

use thiserror::Error;

/// Errors a suggester can report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SuggestError {
    #[error("suggester unavailable: {0}")]
    Unavailable(String),

    #[error("suggester has no move for this position")]
    NoMove,

    #[error("unreadable reply: {0:?}")]
    BadReply(String),
}

/// Something that proposes a move for a position.
pub trait MoveSuggester {
    /// Returns a coordinate move for the side to move in `fen`.
    fn suggest(&mut self, fen: &str) -> Result<String, SuggestError>;
}

impl<F> MoveSuggester for F
where
    F: FnMut(&str) -> Result<String, SuggestError>,
{
    fn suggest(&mut self, fen: &str) -> Result<String, SuggestError> {
        self(fen)
    }
}

/// Extracts the move from a UCI `bestmove` line.
///
/// Returns `None` for other lines and for the null answers `(none)` and
/// `0000`.
pub fn parse_bestmove(line: &str) -> Option<&str> {
    let mut parts = line.split_whitespace();
    if parts.next()? != "bestmove" {
        return None;
    }
    parts
        .next()
        .filter(|mv| *mv != "(none)" && *mv != "0000")
}
