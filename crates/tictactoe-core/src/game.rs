//! Core game state machine.
//!
//! This module contains the `GameState` struct and the transition function
//! that turns one state plus a move into the next state. States are values:
//! every accepted move produces a brand-new `GameState` and leaves the
//! previous one untouched.

use crate::actions::Move;
use crate::board::{Board, Player};
use crate::config::{ConfigError, GameConfig};
use crate::rules;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use thiserror::Error;
use tracing::{debug, info};

/// Game status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Moves are still being accepted
    Playing,
    /// A player completed a line
    Won,
    /// The board filled up with no line
    Draw,
}

/// Errors that can occur when applying moves or querying results
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Game is over")]
    GameOver,

    #[error("Not your turn: {expected} to move, got {got}")]
    NotYourTurn { expected: Player, got: Player },

    #[error("Position {position} is out of range (valid positions are 0..{cells})")]
    OutOfRange { position: usize, cells: usize },

    #[error("Position {position} is already occupied by {occupant}")]
    Occupied { position: usize, occupant: Player },

    #[error("Game is still in progress")]
    NotFinished,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The complete game state.
///
/// A deserialized state is rejected unless its board matches its config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameState")]
pub struct GameState {
    /// Current board
    pub board: Board,
    /// Mark that moves next
    pub current_player: Player,
    /// Every accepted move, oldest first
    pub move_history: Vec<Move>,
    /// Playing, won or drawn
    pub status: GameStatus,
    /// Set only when the game is won
    pub winner: Option<Player>,
    /// Cells of the winning line, set only when the game is won
    pub winning_line: Option<Vec<usize>>,
    /// Settings this game was created with
    pub config: GameConfig,
    /// When the initial state was created
    pub start_time: DateTime<Utc>,
    /// When the game reached a terminal status
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RawGameState {
    board: Board,
    current_player: Player,
    move_history: Vec<Move>,
    status: GameStatus,
    winner: Option<Player>,
    winning_line: Option<Vec<usize>>,
    config: GameConfig,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
}

impl TryFrom<RawGameState> for GameState {
    type Error = ConfigError;

    fn try_from(raw: RawGameState) -> Result<Self, Self::Error> {
        if raw.board.size() != raw.config.board_size || raw.board.len() != raw.config.cell_count()
        {
            return Err(ConfigError::CellCount {
                size: raw.config.board_size,
                cells: raw.board.len(),
            });
        }

        Ok(Self {
            board: raw.board,
            current_player: raw.current_player,
            move_history: raw.move_history,
            status: raw.status,
            winner: raw.winner,
            winning_line: raw.winning_line,
            config: raw.config,
            start_time: raw.start_time,
            end_time: raw.end_time,
        })
    }
}

impl GameState {
    /// Create the initial state for a game
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            board: Board::new(config.board_size),
            current_player: config.first_player,
            move_history: Vec::new(),
            status: GameStatus::Playing,
            winner: None,
            winning_line: None,
            config,
            start_time: Utc::now(),
            end_time: None,
        })
    }

    /// Build a state by playing `positions` in order from the initial state,
    /// alternating marks starting with the configured first player.
    pub fn replay(config: GameConfig, positions: &[usize]) -> Result<Self, GameError> {
        let mut state = Self::new(config)?;
        for &position in positions {
            state = state.play(position)?;
        }
        Ok(state)
    }

    /// Check if the game is finished
    pub fn is_terminal(&self) -> bool {
        self.status != GameStatus::Playing
    }

    /// Winning mark of a finished game, `None` for a draw.
    ///
    /// Fails with [`GameError::NotFinished`] while the game is still playing.
    pub fn get_winner(&self) -> Result<Option<Player>, GameError> {
        if !self.is_terminal() {
            return Err(GameError::NotFinished);
        }
        Ok(self.winner)
    }

    /// Index sequences of all winning lines (empty if there are none)
    pub fn winning_lines(&self) -> Vec<Vec<usize>> {
        self.winning_line.iter().cloned().collect()
    }

    /// Empty cells in ascending order while playing; nothing once finished
    pub fn legal_moves(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.empty_positions()
    }

    /// Number of moves played so far
    pub fn move_count(&self) -> usize {
        self.move_history.len()
    }

    /// Most recent move, if any
    pub fn last_move(&self) -> Option<&Move> {
        self.move_history.last()
    }

    /// Wall-clock length of a finished game
    pub fn duration(&self) -> Option<Duration> {
        self.end_time.map(|end| end - self.start_time)
    }

    /// Place the current player's mark at `position`
    pub fn play(&self, position: usize) -> Result<GameState, GameError> {
        self.apply_move(Move::new(self.current_player, position))
    }

    /// Apply a move and return the resulting state.
    ///
    /// Rejects moves on a finished game, out of turn, out of range, or onto an
    /// occupied cell. `self` is never modified.
    pub fn apply_move(&self, mv: Move) -> Result<GameState, GameError> {
        if let Err(e) = self.validate_move(&mv) {
            debug!(position = mv.position, player = %mv.player, "rejected move: {}", e);
            return Err(e);
        }

        let board = self.board.with_mark(mv.position, mv.player);
        let line = rules::find_winning_line(&board, self.config.k_in_row);

        let status = if line.is_some() {
            GameStatus::Won
        } else if board.is_full() {
            GameStatus::Draw
        } else {
            GameStatus::Playing
        };

        let mut move_history = self.move_history.clone();
        move_history.push(mv);

        let end_time = if status == GameStatus::Playing {
            None
        } else {
            Some(Utc::now())
        };

        let (winner, winning_line) = match line {
            Some(line) => (Some(line.player), Some(line.cells)),
            None => (None, None),
        };

        match status {
            GameStatus::Won => info!(
                winner = ?winner,
                line = ?winning_line,
                moves = move_history.len(),
                "game won"
            ),
            GameStatus::Draw => info!(moves = move_history.len(), "game drawn"),
            GameStatus::Playing => {
                debug!(player = %mv.player, position = mv.position, "move applied")
            }
        }

        Ok(GameState {
            board,
            current_player: mv.player.other(),
            move_history,
            status,
            winner,
            winning_line,
            config: self.config,
            start_time: self.start_time,
            end_time,
        })
    }

    /// Lenient variant of [`apply_move`](Self::apply_move).
    ///
    /// An invalid move yields `Cow::Borrowed(self)`, the very same state,
    /// instead of an error.
    pub fn apply_move_or_keep(&self, mv: Move) -> Cow<'_, GameState> {
        match self.apply_move(mv) {
            Ok(next) => Cow::Owned(next),
            Err(_) => Cow::Borrowed(self),
        }
    }

    fn validate_move(&self, mv: &Move) -> Result<(), GameError> {
        if self.is_terminal() {
            return Err(GameError::GameOver);
        }

        if mv.player != self.current_player {
            return Err(GameError::NotYourTurn {
                expected: self.current_player,
                got: mv.player,
            });
        }

        if !self.board.contains(mv.position) {
            return Err(GameError::OutOfRange {
                position: mv.position,
                cells: self.board.len(),
            });
        }

        if let Some(occupant) = self.board.get(mv.position) {
            return Err(GameError::Occupied {
                position: mv.position,
                occupant,
            });
        }

        Ok(())
    }
}
