//! k-in-a-row tic-tac-toe game engine
//!
//! This crate provides the core game logic, including:
//! - Square boards of size 3, 4 or 7 with a configurable win length
//! - Win detection across rows, columns and both diagonals
//! - An immutable game state machine with full rule enforcement
//! - A minimax computer opponent with alpha-beta pruning
//!
//! # Architecture
//!
//! The game engine is designed to be platform-agnostic. It can be compiled to:
//! - Native Rust for terminal play and tests
//! - WebAssembly for the browser UI (feature `wasm`)
//!
//! # Modules
//!
//! - [`board`]: Player marks and the row-major board
//! - [`rules`]: Win-line detection
//! - [`config`]: Validated game configuration
//! - [`actions`]: Moves submitted by players
//! - [`game`]: Game state machine
//! - [`bot`]: Computer opponent

pub mod actions;
pub mod board;
pub mod bot;
pub mod config;
pub mod game;
pub mod rules;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::Move;
pub use board::{Board, Cell, Player};
pub use bot::{ComputerPlayer, SearchDepth, SearchReport};
pub use config::{ConfigError, GameConfig, GameMode, SUPPORTED_BOARD_SIZES};
pub use game::{GameError, GameState, GameStatus};
pub use rules::{find_winning_line, Direction, WinningLine};
