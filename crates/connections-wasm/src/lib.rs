//! WebAssembly Connections game
//!
//! Exposes the core engine to a web page as a synchronous command API. The
//! page owns the markup and calls back into [`ConnectionsGame`] on every
//! click; daily progress is kept in `localStorage`.

use connections_core::{Catalog, Game, GameConfig, GameError, Outcome, SelectionMode};
use wasm_bindgen::prelude::*;

mod clock;
mod storage;
mod view;

// WASM tests require wasm-pack test to run
#[cfg(all(test, target_arch = "wasm32"))]
mod tests;

pub use storage::LocalStorageStore;
pub use view::GameView;

// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Config for a mode name, with an optional mistake limit override
pub fn config_for(mode: &str, max_mistakes: Option<usize>) -> Result<GameConfig, GameError> {
    let mode: SelectionMode = mode.parse()?;
    let mut config = GameConfig::for_mode(mode);
    if let Some(max) = max_mistakes {
        config.max_mistakes = max;
    }
    config.validate()?;
    Ok(config)
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_error(e: GameError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn warn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(msg));
}

/// The main WASM game controller
#[wasm_bindgen]
pub struct ConnectionsGame {
    game: Game<LocalStorageStore>,
    /// Whether the page has been told progress is no longer saved
    fallback_reported: bool,
}

#[wasm_bindgen]
impl ConnectionsGame {
    /// Start a game: `mode` is "daily" or "random"
    #[wasm_bindgen(constructor)]
    pub fn new(mode: &str, max_mistakes: Option<usize>) -> Result<ConnectionsGame, JsValue> {
        let config = config_for(mode, max_mistakes).map_err(js_error)?;
        let catalog = Catalog::builtin().map_err(js_error)?;
        let game = Game::new(config, catalog, LocalStorageStore::open(), clock::now())
            .map_err(js_error)?;

        let mut game = ConnectionsGame {
            game,
            fallback_reported: false,
        };
        game.report_fallback();
        Ok(game)
    }

    /// Select or deselect a tile; returns the selection size
    #[wasm_bindgen]
    pub fn toggle_select(&mut self, item: &str) -> usize {
        self.game.toggle_select(item)
    }

    /// Drop the current selection
    #[wasm_bindgen]
    pub fn deselect_all(&mut self) {
        self.game.deselect_all();
    }

    /// Evaluate the selection.
    ///
    /// Returns `null` when fewer than three tiles are selected, otherwise
    /// `{result: "correct", group}` or `{result: "incorrect", mistakesRemaining}`.
    #[wasm_bindgen]
    pub fn submit_guess(&mut self) -> Result<JsValue, JsValue> {
        let result = self.game.submit_guess();
        self.report_fallback();
        match result {
            Some(result) => to_js(&result),
            None => Ok(JsValue::NULL),
        }
    }

    /// Re-order the remaining tiles
    #[wasm_bindgen]
    pub fn reshuffle(&mut self) {
        self.game.reshuffle();
    }

    /// Start over; daily mode only moves on after the rollover
    #[wasm_bindgen]
    pub fn replay(&mut self) -> bool {
        let started = self.game.replay(clock::now());
        self.report_fallback();
        started
    }

    /// Active tiles in display order
    #[wasm_bindgen]
    pub fn tiles(&self) -> Vec<String> {
        self.game.tiles().to_vec()
    }

    #[wasm_bindgen]
    pub fn selected(&self) -> Vec<String> {
        self.game.selected().to_vec()
    }

    /// Solved groups in discovery order
    #[wasm_bindgen]
    pub fn solved_groups(&self) -> Result<JsValue, JsValue> {
        let groups: Vec<_> = self.game.session().solved_groups().collect();
        to_js(&groups)
    }

    #[wasm_bindgen]
    pub fn mistakes(&self) -> usize {
        self.game.session().mistakes()
    }

    #[wasm_bindgen]
    pub fn max_mistakes(&self) -> usize {
        self.game.session().max_mistakes()
    }

    #[wasm_bindgen]
    pub fn is_terminal(&self) -> bool {
        self.game.is_terminal()
    }

    #[wasm_bindgen]
    pub fn is_win(&self) -> bool {
        self.game.outcome() == Outcome::Won
    }

    /// End-of-game summary with every group revealed, `null` while playing
    #[wasm_bindgen]
    pub fn results(&self) -> Result<JsValue, JsValue> {
        match self.game.results() {
            Some(summary) => to_js(&summary),
            None => Ok(JsValue::NULL),
        }
    }

    /// Seconds until the next daily puzzle; `undefined` in random mode
    #[wasm_bindgen]
    pub fn seconds_until_next_puzzle(&self) -> Option<f64> {
        self.game
            .time_until_next_puzzle(clock::now())
            .map(|left| left.as_secs() as f64)
    }

    #[wasm_bindgen]
    pub fn puzzle_number(&self) -> usize {
        self.game.puzzle_number()
    }

    /// Whether progress is being saved to `localStorage`
    #[wasm_bindgen]
    pub fn is_persistent(&self) -> bool {
        self.game.is_persistent()
    }

    /// Get current game state as JSON
    #[wasm_bindgen]
    pub fn state_json(&self) -> String {
        serde_json::to_string(&GameView::of(&self.game)).unwrap_or_default()
    }
}

impl ConnectionsGame {
    /// Warn once when a daily game can no longer save progress
    fn report_fallback(&mut self) {
        if self.fallback_reported
            || self.game.config().mode != SelectionMode::Daily
            || self.game.is_persistent()
        {
            return;
        }
        self.fallback_reported = true;
        warn("connections: progress will not be saved on this device");
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_mode_presets() {
        let daily = config_for("daily", None).unwrap();
        assert_eq!(daily.mode, SelectionMode::Daily);
        assert_eq!(daily.max_mistakes, 4);

        let random = config_for("Random", None).unwrap();
        assert_eq!(random.mode, SelectionMode::Random);
        assert_eq!(random.max_mistakes, 10);
    }

    #[test]
    fn test_max_mistakes_override() {
        assert_eq!(config_for("daily", Some(6)).unwrap().max_mistakes, 6);
        assert!(matches!(
            config_for("daily", Some(0)),
            Err(GameError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_unknown_mode() {
        assert!(config_for("hourly", None).is_err());
    }
}
