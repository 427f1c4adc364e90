//! Win detection for k-in-a-row on a square board.
//!
//! Every occupied cell is tried as the start of a line in each of the four
//! canonical directions. A line whose end cell falls off the board is skipped,
//! so runs never wrap around an edge.

use crate::board::{Board, Player};
use serde::{Deserialize, Serialize};

/// Scan directions as (row delta, column delta)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Horizontal,
    Vertical,
    Diagonal,
    AntiDiagonal,
}

impl Direction {
    /// All directions in scan order
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::Diagonal,
        Direction::AntiDiagonal,
    ];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::Diagonal => (1, 1),
            Direction::AntiDiagonal => (1, -1),
        }
    }
}

/// A completed line: the mark that owns it and its cells from start to end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningLine {
    pub player: Player,
    pub cells: Vec<usize>,
}

/// Step `steps` cells from `start` along `direction`, or `None` if that leaves the board
fn offset(size: usize, start: usize, direction: Direction, steps: usize) -> Option<usize> {
    let (dr, dc) = direction.delta();
    let row = (start / size) as isize + dr * steps as isize;
    let col = (start % size) as isize + dc * steps as isize;
    let size = size as isize;

    if row < 0 || row >= size || col < 0 || col >= size {
        return None;
    }
    Some((row * size + col) as usize)
}

/// End cell of a run of `k` cells starting at `start`, if it fits on the board
pub fn line_end(size: usize, start: usize, direction: Direction, k: usize) -> Option<usize> {
    if k == 0 {
        return None;
    }
    offset(size, start, direction, k - 1)
}

/// Cells of the run of `k` starting at `start`, if it fits on the board
fn line_cells(size: usize, start: usize, direction: Direction, k: usize) -> Option<Vec<usize>> {
    line_end(size, start, direction, k)?;
    (0..k).map(|step| offset(size, start, direction, step)).collect()
}

/// Find the first line of `k` identical marks.
///
/// Cells are scanned in row-major order and directions in [`Direction::ALL`]
/// order; only the first line found is reported.
pub fn find_winning_line(board: &Board, k: usize) -> Option<WinningLine> {
    let size = board.size();

    for start in 0..board.len() {
        let Some(player) = board.get(start) else {
            continue;
        };

        for direction in Direction::ALL {
            let Some(cells) = line_cells(size, start, direction, k) else {
                continue;
            };
            if cells.iter().all(|&i| board.get(i) == Some(player)) {
                return Some(WinningLine { player, cells });
            }
        }
    }

    None
}

/// Whether the mark at `position` lies on a run of at least `k` identical marks.
///
/// Only lines through `position` are inspected. After a single placement this
/// agrees with [`find_winning_line`] on whether the game has just been won.
pub fn completes_line(board: &Board, k: usize, position: usize) -> bool {
    let Some(player) = board.get(position) else {
        return false;
    };
    let size = board.size();

    Direction::ALL.iter().any(|&direction| {
        let (dr, dc) = direction.delta();
        let count_along = |sign: isize| {
            let mut count = 0;
            let (mut row, mut col) = ((position / size) as isize, (position % size) as isize);
            loop {
                row += dr * sign;
                col += dc * sign;
                if row < 0 || row >= size as isize || col < 0 || col >= size as isize {
                    break;
                }
                if board.get(row as usize * size + col as usize) != Some(player) {
                    break;
                }
                count += 1;
            }
            count
        };

        1 + count_along(1) + count_along(-1) >= k
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(size: usize, marks: &[(usize, Player)]) -> Board {
        marks
            .iter()
            .fold(Board::new(size), |b, &(i, p)| b.with_mark(i, p))
    }

    #[test]
    fn test_empty_board_has_no_winner() {
        for size in [3, 4, 7] {
            assert_eq!(find_winning_line(&Board::new(size), 3), None);
        }
    }

    #[test]
    fn test_horizontal_line() {
        let board = board_from(3, &[(0, Player::X), (1, Player::X), (2, Player::X)]);
        let line = find_winning_line(&board, 3).unwrap();
        assert_eq!(line.player, Player::X);
        assert_eq!(line.cells, vec![0, 1, 2]);
    }

    #[test]
    fn test_vertical_line() {
        let board = board_from(3, &[(1, Player::O), (4, Player::O), (7, Player::O)]);
        let line = find_winning_line(&board, 3).unwrap();
        assert_eq!(line.player, Player::O);
        assert_eq!(line.cells, vec![1, 4, 7]);
    }

    #[test]
    fn test_diagonals() {
        let diag = board_from(3, &[(0, Player::X), (4, Player::X), (8, Player::X)]);
        assert_eq!(find_winning_line(&diag, 3).unwrap().cells, vec![0, 4, 8]);

        let anti = board_from(3, &[(2, Player::O), (4, Player::O), (6, Player::O)]);
        assert_eq!(find_winning_line(&anti, 3).unwrap().cells, vec![2, 4, 6]);
    }

    #[test]
    fn test_no_wrap_around_edges() {
        // Cells 2, 3, 4 are consecutive indices but span two rows
        let board = board_from(3, &[(2, Player::X), (3, Player::X), (4, Player::X)]);
        assert_eq!(find_winning_line(&board, 3), None);

        // On 4x4, 3 -> 6 -> 9 is an anti-diagonal but 2 -> 3 -> 4 wraps
        let wrap = board_from(4, &[(2, Player::O), (3, Player::O), (4, Player::O)]);
        assert_eq!(find_winning_line(&wrap, 3), None);
        let anti = board_from(4, &[(3, Player::O), (6, Player::O), (9, Player::O)]);
        assert_eq!(find_winning_line(&anti, 3).unwrap().cells, vec![3, 6, 9]);
    }

    #[test]
    fn test_mixed_marks_do_not_win() {
        let board = board_from(3, &[(0, Player::X), (1, Player::O), (2, Player::X)]);
        assert_eq!(find_winning_line(&board, 3), None);
    }

    #[test]
    fn test_k_shorter_than_board() {
        // 4 in a row on 7x7, away from the edges
        let marks: Vec<_> = [16, 24, 32, 40].iter().map(|&i| (i, Player::X)).collect();
        let board = board_from(7, &marks);
        let line = find_winning_line(&board, 4).unwrap();
        assert_eq!(line.cells, vec![16, 24, 32, 40]);
        assert_eq!(line.player, Player::X);

        // Three is not enough when k = 4
        let short = board_from(7, &marks[..3]);
        assert_eq!(find_winning_line(&short, 4), None);
    }

    #[test]
    fn test_first_line_in_scan_order() {
        // Row 0 and column 0 both complete; row-major start 0, horizontal first
        let board = board_from(
            3,
            &[
                (0, Player::X),
                (1, Player::X),
                (2, Player::X),
                (3, Player::X),
                (6, Player::X),
            ],
        );
        assert_eq!(find_winning_line(&board, 3).unwrap().cells, vec![0, 1, 2]);
    }

    #[test]
    fn test_line_end_bounds() {
        assert_eq!(line_end(3, 0, Direction::Horizontal, 3), Some(2));
        assert_eq!(line_end(3, 1, Direction::Horizontal, 3), None);
        assert_eq!(line_end(3, 2, Direction::AntiDiagonal, 3), Some(6));
        assert_eq!(line_end(3, 0, Direction::AntiDiagonal, 3), None);
        assert_eq!(line_end(7, 48, Direction::Vertical, 4), None);
    }

    #[test]
    fn test_completes_line_matches_full_scan() {
        let board = board_from(4, &[(5, Player::X), (10, Player::X), (15, Player::X)]);
        assert!(completes_line(&board, 3, 10));
        assert!(completes_line(&board, 3, 15));
        assert!(!completes_line(&board, 4, 10));
        assert!(!completes_line(&board, 3, 0));
        assert!(find_winning_line(&board, 3).is_some());
    }

    #[test]
    fn test_detection_is_pure() {
        let board = board_from(3, &[(0, Player::X), (4, Player::X), (8, Player::X)]);
        let before = board.clone();
        let _ = find_winning_line(&board, 3);
        let _ = completes_line(&board, 3, 4);
        assert_eq!(board, before);
    }
}
