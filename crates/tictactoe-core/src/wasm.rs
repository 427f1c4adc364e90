//! WebAssembly bindings for the game engine.
//!
//! This module exposes the engine to the browser UI through wasm-bindgen.
//! Moves use the strict policy; rejected moves come back as JS errors.

use wasm_bindgen::prelude::*;

use crate::board::Player;
use crate::bot::ComputerPlayer;
use crate::config::{GameConfig, GameMode};
use crate::game::{GameError, GameState};

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game.
    /// `first_player` is "X" or "O"; `mode` is "hvh", "hvc" or "cvc".
    #[wasm_bindgen(constructor)]
    pub fn new(
        board_size: usize,
        k_in_row: usize,
        first_player: &str,
        mode: &str,
    ) -> Result<WasmGame, JsValue> {
        let first_player: Player = first_player
            .parse()
            .map_err(|e| JsValue::from_str(&format!("Invalid player: {}", e)))?;
        let mode: GameMode = mode
            .parse()
            .map_err(|e| JsValue::from_str(&format!("Invalid mode: {}", e)))?;
        let config = GameConfig::new(board_size, k_in_row, first_player, mode)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;
        let state = GameState::new(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;

        Ok(WasmGame { state })
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.state).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the mark to move next
    #[wasm_bindgen(js_name = getCurrentPlayer)]
    pub fn get_current_player(&self) -> String {
        self.state.current_player.to_string()
    }

    /// Get the empty cells as a JSON array
    #[wasm_bindgen(js_name = getLegalMoves)]
    pub fn get_legal_moves(&self) -> String {
        serde_json::to_string(&self.state.legal_moves()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Place the current player's mark, returns the new state JSON or an error
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, position: usize) -> Result<String, JsValue> {
        let next = self
            .state
            .play(position)
            .map_err(|e| JsValue::from_str(&format!("Move failed: {}", e)))?;
        self.state = next;
        Ok(self.get_state())
    }

    /// Check if the game is finished
    #[wasm_bindgen(js_name = isTerminal)]
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Winner of a finished game ("X", "O"), `undefined` for a draw.
    /// Throws while the game is still running.
    #[wasm_bindgen(js_name = getWinner)]
    pub fn get_winner(&self) -> Result<Option<String>, JsValue> {
        winner_label(&self.state).map_err(|e| JsValue::from_str(&format!("No result yet: {}", e)))
    }

    /// Winning lines as a JSON array of index arrays
    #[wasm_bindgen(js_name = getWinningLines)]
    pub fn get_winning_lines(&self) -> String {
        serde_json::to_string(&self.state.winning_lines()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Whether the mark to move is computer-controlled in this game's mode
    #[wasm_bindgen(js_name = isComputerTurn)]
    pub fn is_computer_turn(&self) -> bool {
        self.state
            .config
            .mode
            .is_computer(self.state.current_player, self.state.config.first_player)
    }

    /// Get the computer's recommended move, -1 when no cell is free
    #[wasm_bindgen(js_name = getComputerMove)]
    pub fn get_computer_move(&self) -> i32 {
        ComputerPlayer::new()
            .calculate_next_move(&self.state)
            .map_or(-1, |p| p as i32)
    }
}

fn winner_label(state: &GameState) -> Result<Option<String>, GameError> {
    Ok(state.get_winner()?.map(|p| p.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic() -> GameConfig {
        GameConfig::for_board_size(3, GameMode::HumanVsHuman).unwrap()
    }

    #[test]
    fn test_winner_label_distinguishes_running_from_draw() {
        let running = GameState::replay(classic(), &[4]).unwrap();
        assert_eq!(winner_label(&running), Err(GameError::NotFinished));

        let draw = GameState::replay(classic(), &[0, 1, 2, 4, 3, 5, 7, 6, 8]).unwrap();
        assert_eq!(winner_label(&draw), Ok(None));

        let won = GameState::replay(classic(), &[0, 3, 1, 4, 2]).unwrap();
        assert_eq!(winner_label(&won), Ok(Some("X".to_string())));
    }
}
