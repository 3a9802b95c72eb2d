//! Tests for the WASM bindings; `wasm-pack test --node` or `--headless --chrome`

use crate::{ConnectionsGame, LocalStorageStore};
use connections_core::PersistenceStore;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn test_random_game_starts_fresh() {
    let game = ConnectionsGame::new("random", None).unwrap();
    assert_eq!(game.tiles().len(), 16);
    assert_eq!(game.mistakes(), 0);
    assert_eq!(game.max_mistakes(), 10);
    assert!(!game.is_terminal());
    assert!(!game.is_persistent());
    assert!(game.seconds_until_next_puzzle().is_none());
}

#[wasm_bindgen_test]
fn test_unknown_mode_is_an_error() {
    assert!(ConnectionsGame::new("weekly", None).is_err());
}

#[wasm_bindgen_test]
fn test_selection_and_null_guess() {
    let mut game = ConnectionsGame::new("random", Some(2)).unwrap();
    let tiles = game.tiles();
    assert_eq!(game.toggle_select(&tiles[0]), 1);
    assert_eq!(game.toggle_select(&tiles[1]), 2);
    assert!(game.submit_guess().unwrap().is_null());
    assert_eq!(game.selected().len(), 2);

    game.deselect_all();
    assert!(game.selected().is_empty());
}

#[wasm_bindgen_test]
fn test_daily_game_reports_countdown() {
    let game = ConnectionsGame::new("daily", None).unwrap();
    let left = game.seconds_until_next_puzzle().unwrap();
    assert!(left <= 24.0 * 3600.0);
    assert!(game.results().unwrap().is_null());
}

#[wasm_bindgen_test]
fn test_state_json_lists_tiles() {
    let game = ConnectionsGame::new("random", None).unwrap();
    let json: serde_json::Value = serde_json::from_str(&game.state_json()).unwrap();
    assert_eq!(json["mode"], "random");
    assert_eq!(json["tiles"].as_array().unwrap().len(), 16);
}

#[wasm_bindgen_test]
fn test_local_storage_round_trip_or_unavailable() {
    let mut store = LocalStorageStore::open();
    if store.is_available() {
        store.save("connections-test", "{}").unwrap();
        assert_eq!(store.load("connections-test").unwrap().as_deref(), Some("{}"));
    } else {
        assert!(store.load("connections-test").is_err());
        assert!(store.save("connections-test", "{}").is_err());
    }
}
