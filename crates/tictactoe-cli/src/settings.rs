//! Game settings read from the environment.
//!
//! | variable | default |
//! |---|---|
//! | `TTT_BOARD_SIZE` | `3` |
//! | `TTT_K_IN_ROW` | 3 for 3x3 and 4x4, 4 for 7x7 |
//! | `TTT_FIRST_PLAYER` | `X` |
//! | `TTT_MODE` | `hvc` |

use anyhow::Context;
use tictactoe_core::config::default_k_in_row;
use tictactoe_core::{GameConfig, GameMode, Player};

pub fn config_from_env() -> anyhow::Result<GameConfig> {
    config_from_lookup(|key| std::env::var(key).ok())
}

/// Build a config from any key/value source
pub fn config_from_lookup<F>(lookup: F) -> anyhow::Result<GameConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let board_size: usize = match lookup("TTT_BOARD_SIZE") {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("TTT_BOARD_SIZE must be a number, got '{}'", raw))?,
        None => 3,
    };

    let k_in_row: usize = match lookup("TTT_K_IN_ROW") {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("TTT_K_IN_ROW must be a number, got '{}'", raw))?,
        None => default_k_in_row(board_size)?,
    };

    let first_player: Player = match lookup("TTT_FIRST_PLAYER") {
        Some(raw) => raw.parse()?,
        None => Player::X,
    };

    let mode: GameMode = match lookup("TTT_MODE") {
        Some(raw) => raw.parse()?,
        None => GameMode::HumanVsComputer,
    };

    let config = GameConfig::new(board_size, k_in_row, first_player, mode)
        .context("invalid game settings")?;
    Ok(config)
}
