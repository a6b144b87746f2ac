use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use snake::game::SnakeGame;
use snake::logging::init_file_logging;
use snake::session::Session;
use snake::term::TerminalFrontend;

/// Grid snake in the terminal. Arrow keys or WASD to steer, CTRL+C to quit.
#[derive(Parser, Debug)]
#[command(name = "snake", version, about)]
struct Args {
    /// Seed for food placement, for repeatable games
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (level from RUST_LOG, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_file_logging(path)?;
    }

    let session = Session::new(args.seed);
    let frontend = TerminalFrontend::new(session.board())?;
    let mut game = SnakeGame::new(session, frontend);

    // The main game loop takes care of the end-of-game delay
    let res = game.play();
    game.frontend_mut().restore()?;

    let exit = res?;
    info!(?exit, "bye");
    Ok(())
}
