//! Terminal front end for the tic-tac-toe engine.

use std::io;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod session;
mod settings;

use session::Session;

fn main() -> anyhow::Result<()> {
    // Initialize tracing; logs go to stderr so they don't interleave with the board
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = settings::config_from_env()?;

    info!(
        board_size = config.board_size,
        k_in_row = config.k_in_row,
        first_player = %config.first_player,
        mode = ?config.mode,
        "Starting tic-tac-toe..."
    );

    let mut session = Session::new(config)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    session.run(&mut stdin.lock(), &mut stdout.lock())?;

    Ok(())
}
