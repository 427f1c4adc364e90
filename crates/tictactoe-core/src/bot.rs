//! Computer opponent.
//!
//! The computer player searches the remaining game tree with minimax and
//! alpha-beta pruning. Leaf scores favour quick wins and slow losses:
//! a win scores `10 - depth`, a loss `-10 + depth`, a draw or a position at
//! the depth cutoff scores `0`.
//!
//! On 3x3 the search is exhaustive. Larger boards shrink the depth limit as
//! the number of empty cells grows, see [`SearchDepth::Adaptive`].

use crate::board::{Board, Player};
use crate::game::GameState;
use crate::rules;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Score of a win found right after the root move
pub const WIN_SCORE: i32 = 10;

/// Depth limit used when the remaining tree is small enough to search fully
pub const EXHAUSTIVE_DEPTH: u32 = 15;

const INFINITY: i32 = i32::MAX;

/// How deep the search may look
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchDepth {
    /// Exhaustive with few empty cells, shallower as the board opens up
    #[default]
    Adaptive,
    /// Always use the given number of plies
    Fixed(u32),
}

impl SearchDepth {
    /// Depth limit for a position with `empty_cells` legal moves
    pub fn limit(self, empty_cells: usize) -> u32 {
        match self {
            SearchDepth::Fixed(depth) => depth,
            SearchDepth::Adaptive => match empty_cells {
                0..=10 => EXHAUSTIVE_DEPTH,
                11..=16 => 6,
                17..=25 => 4,
                _ => 3,
            },
        }
    }
}

/// Outcome of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReport {
    /// Recommended board index
    pub position: usize,
    /// Minimax score of that move from the searching player's view
    pub score: i32,
    /// Depth limit that was applied
    pub depth_limit: u32,
    /// Positions visited
    pub nodes: u64,
}

/// A computer player that recommends moves for whoever is to move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputerPlayer {
    pub depth: SearchDepth,
}

/// Scratch state for one search
struct Search {
    board: Board,
    k: usize,
    player: Player,
    depth_limit: u32,
    nodes: u64,
}

impl Search {
    /// Score the position reached after `last` was played, `depth` plies below the root move
    fn minimax(
        &mut self,
        last: usize,
        depth: u32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes += 1;

        if rules::completes_line(&self.board, self.k, last) {
            let depth = depth as i32;
            return if self.board.get(last) == Some(self.player) {
                WIN_SCORE - depth
            } else {
                -WIN_SCORE + depth
            };
        }
        if self.board.is_full() || depth >= self.depth_limit {
            return 0;
        }

        let mover = if maximizing {
            self.player
        } else {
            self.player.other()
        };
        let mut best = if maximizing { -INFINITY } else { INFINITY };

        for position in 0..self.board.len() {
            if self.board.get(position).is_some() {
                continue;
            }

            self.board.set(position, Some(mover));
            let score = self.minimax(position, depth + 1, !maximizing, alpha, beta);
            self.board.set(position, None);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if alpha >= beta {
                break;
            }
        }

        best
    }

    /// Score every root move; the first move with the highest score wins
    fn best_root_move(&mut self, legal: &[usize]) -> Option<(usize, i32)> {
        let mut best: Option<(usize, i32)> = None;
        let mut alpha = -INFINITY;

        for &position in legal {
            let score = self.score_root_move(position, alpha);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((position, score));
            }
            alpha = alpha.max(score);
        }

        best
    }

    fn score_root_move(&mut self, position: usize, alpha: i32) -> i32 {
        self.board.set(position, Some(self.player));
        let score = self.minimax(position, 0, false, alpha, INFINITY);
        self.board.set(position, None);
        score
    }

    /// Cells where `player` would complete a line right now
    fn immediate_wins(&mut self, legal: &[usize], player: Player) -> Vec<usize> {
        let mut wins = Vec::new();
        for &position in legal {
            self.board.set(position, Some(player));
            if rules::completes_line(&self.board, self.k, position) {
                wins.push(position);
            }
            self.board.set(position, None);
        }
        wins
    }
}

impl ComputerPlayer {
    /// Computer player with the adaptive depth policy
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_depth(depth: SearchDepth) -> Self {
        Self { depth }
    }

    /// Best move for `state.current_player`, or `None` if no cell is free.
    ///
    /// The state is only read. Calling this on a finished game is not
    /// meaningful and returns `None`.
    pub fn calculate_next_move(&self, state: &GameState) -> Option<usize> {
        self.analyze(state).map(|report| report.position)
    }

    /// Run the search and report the chosen move with its score
    pub fn analyze(&self, state: &GameState) -> Option<SearchReport> {
        let legal = state.legal_moves();
        let mut search = Search {
            board: state.board.clone(),
            k: state.config.k_in_row,
            player: state.current_player,
            depth_limit: self.depth.limit(legal.len()),
            nodes: 0,
        };

        let (position, score) = match legal.as_slice() {
            [] => return None,
            [only] => {
                let score = search.score_root_move(*only, -INFINITY);
                (*only, score)
            }
            _ => shortcut(&mut search, &legal).or_else(|| search.best_root_move(&legal))?,
        };

        let report = SearchReport {
            position,
            score,
            depth_limit: search.depth_limit,
            nodes: search.nodes,
        };
        debug!(
            player = %state.current_player,
            position = report.position,
            score = report.score,
            depth_limit = report.depth_limit,
            nodes = report.nodes,
            "computer move"
        );
        Some(report)
    }
}

/// Immediate win, or the block of a single threat.
///
/// Full minimax picks the same move in both cases: an immediate win has the
/// top score and the first one in index order is taken; with exactly one
/// opponent threat every other move loses at the next ply, so the block is
/// the unique best move as long as the search looks at least one ply ahead.
fn shortcut(search: &mut Search, legal: &[usize]) -> Option<(usize, i32)> {
    if let Some(&win) = search.immediate_wins(legal, search.player).first() {
        return Some((win, WIN_SCORE));
    }

    if search.depth_limit == 0 {
        return None;
    }
    match search.immediate_wins(legal, search.player.other()).as_slice() {
        [block] => {
            let score = search.score_root_move(*block, -INFINITY);
            Some((*block, score))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, GameMode};

    fn config(size: usize, first: Player) -> GameConfig {
        GameConfig::for_board_size(size, GameMode::ComputerVsComputer)
            .map(|c| GameConfig {
                first_player: first,
                ..c
            })
            .unwrap()
    }

    /// Full search without the win/block shortcuts
    fn plain_search(state: &GameState, depth: SearchDepth) -> Option<(usize, i32)> {
        let legal = state.legal_moves();
        let mut search = Search {
            board: state.board.clone(),
            k: state.config.k_in_row,
            player: state.current_player,
            depth_limit: depth.limit(legal.len()),
            nodes: 0,
        };
        search.best_root_move(&legal)
    }

    #[test]
    fn test_takes_the_win() {
        // O O . / X X . / . . .  with O to move
        let state = GameState::replay(config(3, Player::O), &[0, 3, 1, 4]).unwrap();
        assert_eq!(state.current_player, Player::O);

        let bot = ComputerPlayer::new();
        assert_eq!(bot.calculate_next_move(&state), Some(2));
    }

    #[test]
    fn test_blocks_the_threat() {
        // X X . / O . . / . . .  with O to move
        let state = GameState::replay(config(3, Player::X), &[0, 3, 1]).unwrap();
        assert_eq!(state.current_player, Player::O);

        let bot = ComputerPlayer::new();
        assert_eq!(bot.calculate_next_move(&state), Some(2));
    }

    #[test]
    fn test_win_preferred_over_block() {
        // X X . / O O . / X . .  with O to move: 5 wins, 2 only blocks
        let state = GameState::replay(config(3, Player::X), &[0, 3, 1, 4, 6]).unwrap();
        let report = ComputerPlayer::new().analyze(&state).unwrap();
        assert_eq!(report.position, 5);
        assert_eq!(report.score, WIN_SCORE);
    }

    #[test]
    fn test_single_legal_move() {
        // X O X / X O O / O X .
        let state =
            GameState::replay(config(3, Player::X), &[0, 1, 2, 4, 3, 5, 7, 6]).unwrap();
        assert_eq!(state.legal_moves(), vec![8]);
        assert_eq!(ComputerPlayer::new().calculate_next_move(&state), Some(8));
    }

    #[test]
    fn test_no_move_on_finished_game() {
        let state = GameState::replay(config(3, Player::X), &[0, 3, 1, 4, 2]).unwrap();
        assert!(state.is_terminal());
        assert_eq!(ComputerPlayer::new().calculate_next_move(&state), None);
    }

    #[test]
    fn test_search_does_not_mutate_state() {
        let state = GameState::replay(config(3, Player::X), &[4]).unwrap();
        let before = state.clone();
        let _ = ComputerPlayer::new().analyze(&state);
        assert_eq!(state, before);
    }

    #[test]
    fn test_self_play_3x3_is_a_draw() {
        let bot = ComputerPlayer::new();
        for first in Player::ALL {
            let mut state = GameState::new(config(3, first)).unwrap();
            while !state.is_terminal() {
                let position = bot.calculate_next_move(&state).unwrap();
                state = state.play(position).unwrap();
            }
            assert_eq!(state.get_winner(), Ok(None), "perfect play must draw");
        }
    }

    #[test]
    fn test_shortcuts_match_plain_minimax() {
        let bot = ComputerPlayer::new();
        let cfg = config(3, Player::X);
        for a in 0..9 {
            for b in (0..9).filter(|&b| b != a) {
                for c in (0..9).filter(|&c| c != a && c != b) {
                    let state = GameState::replay(cfg, &[a, b, c]).unwrap();
                    let expected = plain_search(&state, SearchDepth::Adaptive).map(|(p, _)| p);
                    assert_eq!(
                        bot.calculate_next_move(&state),
                        expected,
                        "moves {:?}",
                        [a, b, c]
                    );
                }
            }
        }
    }

    #[test]
    fn test_prefers_faster_win() {
        // X . X / O O . / . . .  with X to move: 1 wins now
        let state = GameState::replay(config(3, Player::X), &[0, 3, 2, 4]).unwrap();
        let (position, score) = plain_search(&state, SearchDepth::Adaptive).unwrap();
        assert_eq!(position, 1);
        assert_eq!(score, WIN_SCORE);
    }

    #[test]
    fn test_blocks_on_4x4() {
        // X holds 0 and 4, so 8 completes column 0 and beats blocking O at 7
        let state = GameState::replay(config(4, Player::X), &[4, 5, 0, 6]).unwrap();
        assert_eq!(state.current_player, Player::X);
        assert_eq!(ComputerPlayer::new().calculate_next_move(&state), Some(8));

        // X has no win; O threatens 7 only, since 4 is X
        let state = GameState::replay(config(4, Player::X), &[4, 5, 15, 6]).unwrap();
        assert_eq!(ComputerPlayer::new().calculate_next_move(&state), Some(7));
    }

    #[test]
    fn test_7x7_win_and_block() {
        let cfg = config(7, Player::X);
        // X on 0, 1, 2 and O on 14, 15, 16
        let state = GameState::replay(cfg, &[0, 14, 1, 15, 2, 16]).unwrap();
        assert_eq!(ComputerPlayer::new().calculate_next_move(&state), Some(3));

        // O on 15, 16, 17 with 14 held by X leaves a single threat at 18
        let state = GameState::replay(cfg, &[14, 15, 0, 16, 48, 17]).unwrap();
        assert_eq!(ComputerPlayer::new().calculate_next_move(&state), Some(18));
    }

    #[test]
    fn test_depth_policy() {
        assert_eq!(SearchDepth::Adaptive.limit(9), EXHAUSTIVE_DEPTH);
        assert_eq!(SearchDepth::Adaptive.limit(16), 6);
        assert_eq!(SearchDepth::Adaptive.limit(25), 4);
        assert_eq!(SearchDepth::Adaptive.limit(49), 3);
        assert_eq!(SearchDepth::Fixed(2).limit(49), 2);
    }

    #[test]
    fn test_zero_depth_ignores_threats() {
        // X threatens 6, but without lookahead every move scores 0 and 1 comes first
        let state = GameState::replay(config(3, Player::X), &[7, 0, 8]).unwrap();
        let bot = ComputerPlayer::with_depth(SearchDepth::Fixed(0));
        let report = bot.analyze(&state).unwrap();
        assert_eq!(report.position, 1);
        assert_eq!(report.score, 0);

        // X to move: 6 completes the bottom row, found even without lookahead
        let state = GameState::replay(config(3, Player::X), &[8, 0, 7, 1]).unwrap();
        assert_eq!(bot.calculate_next_move(&state), Some(6));
    }

    #[test]
    fn test_one_ply_blocks_single_threat() {
        // O to move; X threatens 6 along the bottom row
        let state = GameState::replay(config(3, Player::X), &[7, 0, 8]).unwrap();
        let report = ComputerPlayer::with_depth(SearchDepth::Fixed(1))
            .analyze(&state)
            .unwrap();
        assert_eq!(report.position, 6);
        assert_eq!(report.depth_limit, 1);
    }

    #[test]
    fn test_report_counts_nodes() {
        let state = GameState::new(config(3, Player::X)).unwrap();
        let report = ComputerPlayer::new().analyze(&state).unwrap();
        assert!(report.nodes > 0);
        assert_eq!(report.score, 0);
        assert_eq!(report.depth_limit, EXHAUSTIVE_DEPTH);
    }
}
