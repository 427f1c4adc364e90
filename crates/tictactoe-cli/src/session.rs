//! Interactive game session.

use std::io::{BufRead, Write};
use thiserror::Error;
use tictactoe_core::{Board, ComputerPlayer, ConfigError, GameConfig, GameState, GameStatus};
use tracing::{info, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Expected a cell index or 'row col', got '{0}'")]
    Unparseable(String),

    #[error("Row and column must be below {0}")]
    OffBoard(usize),

    #[error("Input closed before the game ended")]
    Closed,
}

/// Parse a human move: either a raw cell index (`4`) or a zero-based `row col` pair (`1 1`).
///
/// Range checks on raw indices are left to the engine.
pub fn parse_position(line: &str, board: &Board) -> Result<usize, InputError> {
    let parts: Vec<&str> = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|p| !p.is_empty())
        .collect();
    let parse = |s: &str| {
        s.parse::<usize>()
            .map_err(|_| InputError::Unparseable(line.trim().to_string()))
    };

    match parts.as_slice() {
        [index] => parse(index),
        [row, col] => {
            let (row, col) = (parse(row)?, parse(col)?);
            board
                .index_of(row, col)
                .ok_or(InputError::OffBoard(board.size()))
        }
        _ => Err(InputError::Unparseable(line.trim().to_string())),
    }
}

/// One game driven from a line-based input and rendered to an output
pub struct Session {
    state: GameState,
    bot: ComputerPlayer,
}

impl Session {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            state: GameState::new(config)?,
            bot: ComputerPlayer::new(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Play until the game ends. Illegal or unreadable human moves re-prompt.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> anyhow::Result<&GameState> {
        let config = self.state.config;

        while !self.state.is_terminal() {
            write!(output, "\n{}", self.state.board)?;
            let player = self.state.current_player;

            let position = if config.mode.is_computer(player, config.first_player) {
                let Some(position) = self.bot.calculate_next_move(&self.state) else {
                    break;
                };
                let (row, col) = self.state.board.coords(position);
                writeln!(
                    output,
                    "Computer ({}) plays {} (row {}, col {})",
                    player, position, row, col
                )?;
                position
            } else {
                write!(output, "Player {}, your move: ", player)?;
                output.flush()?;
                match read_position(input, &self.state.board)? {
                    Ok(position) => position,
                    Err(e) => {
                        writeln!(output, "{}", e)?;
                        continue;
                    }
                }
            };

            match self.state.play(position) {
                Ok(next) => self.state = next,
                Err(e) => {
                    warn!(%player, position, "illegal move: {}", e);
                    writeln!(output, "Illegal move: {}", e)?;
                }
            }
        }

        write!(output, "\n{}", self.state.board)?;
        writeln!(output, "{}", result_message(&self.state))?;
        info!(
            status = ?self.state.status,
            moves = self.state.move_count(),
            "Game finished"
        );

        Ok(&self.state)
    }
}

/// Read one line; the outer error is fatal, the inner one re-prompts
fn read_position<R: BufRead>(
    input: &mut R,
    board: &Board,
) -> anyhow::Result<Result<usize, InputError>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(InputError::Closed.into());
    }
    Ok(parse_position(&line, board))
}

fn result_message(state: &GameState) -> String {
    match (state.status, state.winner, &state.winning_line) {
        (GameStatus::Won, Some(winner), Some(line)) => {
            format!("{} wins with {:?}", winner, line)
        }
        (GameStatus::Draw, _, _) => "It's a draw".to_string(),
        _ => "Game abandoned".to_string(),
    }
}
