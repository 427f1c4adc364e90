//! Moves that players submit to the engine.

use crate::board::Player;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single placement. Once recorded in a game's history it never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Mark being placed
    pub player: Player,
    /// Row-major board index
    pub position: usize,
    /// When the move was made
    pub timestamp: DateTime<Utc>,
}

impl Move {
    /// Create a move stamped with the current time
    pub fn new(player: Player, position: usize) -> Self {
        Self::at(player, position, Utc::now())
    }

    /// Create a move with an explicit timestamp
    pub fn at(player: Player, position: usize, timestamp: DateTime<Utc>) -> Self {
        Self {
            player,
            position,
            timestamp,
        }
    }
}
