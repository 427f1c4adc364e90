//! Board representation for the k-in-a-row game.
//!
//! This module contains:
//! - The two player marks
//! - The square, row-major board of cells
//! - Index/coordinate conversion and occupancy queries

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two marks a player places on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Both marks, `X` first
    pub const ALL: [Player; 2] = [Player::X, Player::O];

    /// The opposing mark
    pub fn other(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Single character used when rendering the board
    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Player {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "X" | "x" => Ok(Player::X),
            "O" | "o" => Ok(Player::O),
            other => Err(ConfigError::UnknownPlayer(other.to_string())),
        }
    }
}

/// A cell either holds a mark or is empty
pub type Cell = Option<Player>;

/// Square game board stored row-major.
///
/// Index 0 is the top-left cell; `row = index / size`, `col = index % size`.
/// The cell count is always `size * size`, including after deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board with `size * size` cells
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Build a board from an existing row-major cell vector.
    ///
    /// Returns `None` if the number of cells is not `size * size`.
    pub fn from_cells(size: usize, cells: Vec<Cell>) -> Option<Self> {
        if cells.len() != size * size {
            return None;
        }
        Some(Self { size, cells })
    }

    /// Side length of the board
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Contents of a cell, `None` for an empty or out-of-range index
    pub fn get(&self, index: usize) -> Cell {
        self.cells.get(index).copied().flatten()
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.cells.len()
    }

    /// Convert a (row, col) pair into a cell index
    pub fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.size && col < self.size {
            Some(row * self.size + col)
        } else {
            None
        }
    }

    /// Convert a cell index into its (row, col) pair
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }

    /// True once every cell holds a mark
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Number of cells holding a mark
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Indices of empty cells in ascending order
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Return a copy of this board with `player` placed at `index`.
    ///
    /// The receiver is left untouched. Callers validate the index first.
    pub fn with_mark(&self, index: usize, player: Player) -> Board {
        let mut next = self.clone();
        next.set(index, Some(player));
        next
    }

    /// Overwrite a cell in place. Only used on private scratch copies.
    pub(crate) fn set(&mut self, index: usize, cell: Cell) {
        if let Some(slot) = self.cells.get_mut(index) {
            *slot = cell;
        }
    }
}

#[derive(Deserialize)]
struct RawBoard {
    size: usize,
    cells: Vec<Cell>,
}

impl TryFrom<RawBoard> for Board {
    type Error = ConfigError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        let cells = raw.cells.len();
        Board::from_cells(raw.size, raw.cells).ok_or(ConfigError::CellCount {
            size: raw.size,
            cells,
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            if row > 0 {
                let width = self.size * 4 - 1;
                writeln!(f, "{}", "-".repeat(width))?;
            }
            let line: Vec<String> = (0..self.size)
                .map(|col| match self.get(row * self.size + col) {
                    Some(p) => format!(" {} ", p),
                    None => "   ".to_string(),
                })
                .collect();
            writeln!(f, "{}", line.join("|"))?;
        }
        Ok(())
    }
}
