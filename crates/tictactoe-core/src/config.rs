//! Game configuration and validation.
//!
//! A [`GameConfig`] is built once per game and carried unchanged inside every
//! state produced for that game. Construction is the only place where board
//! size and win length are checked.

use crate::board::Player;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Board sizes the engine accepts
pub const SUPPORTED_BOARD_SIZES: [usize; 3] = [3, 4, 7];

/// Shortest line that counts as a win
pub const MIN_K_IN_ROW: usize = 3;

/// Errors raised while building a configuration
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("unsupported board size {0} (expected one of 3, 4, 7)")]
    UnsupportedBoardSize(usize),

    #[error("invalid k-in-row {k} for a {board_size}x{board_size} board (expected {min}..={board_size})", min = MIN_K_IN_ROW)]
    InvalidKInRow { k: usize, board_size: usize },

    #[error("unknown game mode '{0}'")]
    UnknownMode(String),

    #[error("unknown player mark '{0}'")]
    UnknownPlayer(String),

    #[error("a {size}x{size} board needs {expected} cells, got {cells}", expected = size * size)]
    CellCount { size: usize, cells: usize },
}

/// Who controls each mark. Informational only; the engine rules ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    HumanVsHuman,
    HumanVsComputer,
    ComputerVsComputer,
}

impl GameMode {
    /// Whether `player` is driven by the search opponent.
    ///
    /// In human-vs-computer games the human plays the first mark.
    pub fn is_computer(self, player: Player, first_player: Player) -> bool {
        match self {
            GameMode::HumanVsHuman => false,
            GameMode::HumanVsComputer => player != first_player,
            GameMode::ComputerVsComputer => true,
        }
    }
}

impl FromStr for GameMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hvh" | "human-vs-human" => Ok(GameMode::HumanVsHuman),
            "hvc" | "human-vs-computer" => Ok(GameMode::HumanVsComputer),
            "cvc" | "computer-vs-computer" => Ok(GameMode::ComputerVsComputer),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

/// Immutable settings for one game.
///
/// Deserialization goes through [`GameConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig")]
pub struct GameConfig {
    /// Side length of the square board (3, 4 or 7)
    pub board_size: usize,
    /// Consecutive marks needed to win
    pub k_in_row: usize,
    /// Mark that moves first
    pub first_player: Player,
    /// Who controls each mark
    pub mode: GameMode,
}

impl GameConfig {
    /// Create a validated configuration
    pub fn new(
        board_size: usize,
        k_in_row: usize,
        first_player: Player,
        mode: GameMode,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            board_size,
            k_in_row,
            first_player,
            mode,
        };
        config.validate()?;
        Ok(config)
    }

    /// Configuration with the usual win length for the board size and `X` first
    pub fn for_board_size(board_size: usize, mode: GameMode) -> Result<Self, ConfigError> {
        let k_in_row = default_k_in_row(board_size)?;
        Self::new(board_size, k_in_row, Player::X, mode)
    }

    /// Check board size and win length
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SUPPORTED_BOARD_SIZES.contains(&self.board_size) {
            return Err(ConfigError::UnsupportedBoardSize(self.board_size));
        }
        if self.k_in_row < MIN_K_IN_ROW || self.k_in_row > self.board_size {
            return Err(ConfigError::InvalidKInRow {
                k: self.k_in_row,
                board_size: self.board_size,
            });
        }
        Ok(())
    }

    /// Number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.board_size * self.board_size
    }
}

/// Unchecked wire form of [`GameConfig`]
#[derive(Deserialize)]
struct RawGameConfig {
    board_size: usize,
    k_in_row: usize,
    first_player: Player,
    mode: GameMode,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = ConfigError;

    fn try_from(raw: RawGameConfig) -> Result<Self, Self::Error> {
        GameConfig::new(raw.board_size, raw.k_in_row, raw.first_player, raw.mode)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: 3,
            k_in_row: 3,
            first_player: Player::X,
            mode: GameMode::HumanVsComputer,
        }
    }
}

/// Usual win length: 3 on 3x3 and 4x4, 4 on 7x7
pub fn default_k_in_row(board_size: usize) -> Result<usize, ConfigError> {
    match board_size {
        3 | 4 => Ok(3),
        7 => Ok(4),
        other => Err(ConfigError::UnsupportedBoardSize(other)),
    }
}
