//! chess-play - play chess in the terminal.
//!
//! Reads coordinate moves and commands from stdin, prints the board after
//! each move, and stops at checkmate until a move is taken back.

mod config;
mod session;

use anyhow::Context;
use chess_engine::Game;
use clap::Parser;
use config::PlayConfig;
use session::Session;
use std::io;
use std::path::PathBuf;

/// Play chess in the terminal.
#[derive(Parser)]
#[command(name = "chess-play")]
#[command(about = "Two-player chess in the terminal")]
struct Args {
    /// Configuration file (defaults to chess-play.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start from this FEN instead of the configured position
    #[arg(long)]
    fen: Option<String>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(PlayConfig::default_path);
    let mut config = PlayConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    if let Some(fen) = args.fen {
        config.start_fen = Some(fen);
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    let level: tracing::Level = config
        .log_level
        .parse()
        .with_context(|| format!("invalid log level {:?}", config.log_level))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let game = match &config.start_fen {
        Some(fen) => Game::from_fen(fen).with_context(|| format!("invalid start FEN {:?}", fen))?,
        None => Game::new(),
    };
    tracing::info!(fen = %game.to_fen(), "starting game");

    let mut session = Session::new(game, config.show_legal_moves);
    session.run(io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}
