use connections_core::{Game, Group, Outcome, PersistenceStore, SelectionMode};
use serde::Serialize;

/// Snapshot of everything a page needs to draw the board
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub mode: SelectionMode,
    pub puzzle_number: usize,
    pub date: Option<String>,
    pub tiles: Vec<String>,
    pub selected: Vec<String>,
    pub solved_groups: Vec<Group>,
    pub mistakes: usize,
    pub max_mistakes: usize,
    pub outcome: Outcome,
    pub persistent: bool,
}

impl GameView {
    pub fn of<S: PersistenceStore>(game: &Game<S>) -> Self {
        let session = game.session();
        Self {
            mode: game.config().mode,
            puzzle_number: game.puzzle_number(),
            date: game.effective_date().map(|d| d.format("%Y-%m-%d").to_string()),
            tiles: game.tiles().to_vec(),
            selected: game.selected().to_vec(),
            solved_groups: session.solved_groups().cloned().collect(),
            mistakes: session.mistakes(),
            max_mistakes: session.max_mistakes(),
            outcome: session.outcome(),
            persistent: game.is_persistent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use connections_core::{Catalog, GameConfig, MemoryStore, SimpleRng};

    #[test]
    fn test_view_json_shape() {
        let now = NaiveDate::from_ymd_opt(2025, 2, 1)
            .unwrap()
            .and_hms_opt(11, 0, 0)
            .unwrap();
        let mut game = Game::with_rng(
            GameConfig::daily(),
            Catalog::builtin().unwrap(),
            MemoryStore::new(),
            now,
            SimpleRng::with_seed(3),
        )
        .unwrap();
        let first = game.tiles()[0].clone();
        game.toggle_select(&first);

        let json = serde_json::to_value(GameView::of(&game)).unwrap();
        assert_eq!(json["mode"], "daily");
        assert_eq!(json["date"], "2025-02-01");
        assert_eq!(json["tiles"].as_array().unwrap().len(), 16);
        assert_eq!(json["selected"][0], first.as_str());
        assert_eq!(json["outcome"], "inProgress");
        assert_eq!(json["maxMistakes"], 4);
        assert_eq!(json["persistent"], true);
        assert!(json["solvedGroups"].as_array().unwrap().is_empty());
    }
}
