//! Basic example of playing a Connections puzzle with the core engine

use chrono::NaiveDate;
use connections_core::{Catalog, Game, GameConfig, GuessResult, MemoryStore};

fn main() -> connections_core::Result<()> {
    let catalog = Catalog::builtin()?;
    println!("Catalog holds {} puzzles\n", catalog.len());

    let now = NaiveDate::from_ymd_opt(2025, 3, 14)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap_or_default();
    let mut game = Game::new(GameConfig::daily(), catalog, MemoryStore::new(), now)?;

    println!("Puzzle #{} ({})", game.puzzle_number(), game.storage_key().unwrap_or("-"));
    println!("Tiles: {}\n", game.tiles().join(" | "));

    // Solve every group straight from the answer key
    let groups = game.session().puzzle().groups.clone();
    for group in &groups {
        for item in &group.items {
            game.toggle_select(item);
        }
        match game.submit_guess() {
            Some(GuessResult::Correct { group }) => {
                println!("Found {} [{}]: {}", group.category, group.difficulty, group.items_label())
            }
            Some(GuessResult::Incorrect { mistakes_remaining }) => {
                println!("Wrong, {} mistakes left", mistakes_remaining)
            }
            None => println!("Nothing to submit"),
        }
    }

    if let Some(results) = game.results() {
        println!("\n{} {}", results.headline(), results.message());
    }
    Ok(())
}
