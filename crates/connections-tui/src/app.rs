use crate::stats::{format_countdown, GameResult, StatsManager};
use crate::theme::Theme;
use chrono::NaiveDateTime;
use connections_core::{Game, GuessResult, PersistenceStore, SelectionMode};
use crossterm::event::{KeyCode, KeyEvent};
use std::time::Duration;
use tracing::info;

/// Tiles per row on the board
pub const COLUMNS: usize = 4;

/// Store type the app runs on: a file in daily mode, memory otherwise
pub type DynStore = Box<dyn PersistenceStore>;

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Current screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Normal gameplay
    Playing,
    /// End-of-game screen with every group revealed
    Results,
    /// Statistics screen
    Stats,
    /// How to play
    Help,
}

/// Wall-clock source, swappable in tests
pub type Clock = fn() -> NaiveDateTime;

pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// The main application state
pub struct App {
    /// Current game
    pub game: Game<DynStore>,
    /// Index of the tile under the cursor
    pub cursor: usize,
    /// Current screen state
    pub screen_state: ScreenState,
    /// Color theme
    pub theme: Theme,
    /// Message to display
    pub message: Option<String>,
    /// Message timer
    message_timer: u32,
    /// Ticks left of the wrong-guess shake
    pub shake_timer: u32,
    /// Statistics manager
    pub stats: StatsManager,
    /// Whether the current game has been recorded (to avoid double recording)
    game_recorded: bool,
    /// Whether the "new puzzle available" notice was already shown
    rollover_announced: bool,
    clock: Clock,
}

impl App {
    pub fn new(game: Game<DynStore>, stats: StatsManager) -> Self {
        Self::with_clock(game, stats, local_now)
    }

    pub fn with_clock(game: Game<DynStore>, stats: StatsManager, clock: Clock) -> Self {
        let mut app = Self {
            game,
            cursor: 0,
            screen_state: ScreenState::Playing,
            theme: Theme::dark(),
            message: None,
            message_timer: 0,
            shake_timer: 0,
            stats,
            game_recorded: false,
            rollover_announced: false,
            clock,
        };
        if !app.game.is_persistent() && app.game.config().mode == SelectionMode::Daily {
            app.show_message("Progress will not be saved on this device");
        }
        // A finished daily puzzle opens straight on its results
        if app.game.is_terminal() {
            app.finish_game();
        }
        app
    }

    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    /// Get the tick rate
    pub fn get_tick_rate(&self) -> Duration {
        Duration::from_millis(100)
    }

    /// Update timers (called every tick)
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }
        self.shake_timer = self.shake_timer.saturating_sub(1);

        if self.screen_state == ScreenState::Results && !self.rollover_announced {
            if let Some(left) = self.game.time_until_next_puzzle(self.now()) {
                if left.is_zero() {
                    self.rollover_announced = true;
                    self.show_message("A new puzzle is available! Press n");
                }
            }
        }
    }

    /// Seconds until the next daily puzzle, if playing the daily
    pub fn countdown(&self) -> Option<String> {
        self.game
            .time_until_next_puzzle(self.now())
            .map(|left| format_countdown(left.as_secs()))
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30; // ~3 seconds at 100ms poll
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match self.screen_state {
            ScreenState::Playing => self.handle_game_key(key),
            ScreenState::Results => self.handle_results_key(key),
            ScreenState::Stats | ScreenState::Help => self.handle_overlay_key(key),
        }
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return AppAction::Quit,

            // Navigation
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),

            KeyCode::Char(' ') => self.toggle_at_cursor(),
            KeyCode::Enter => self.submit(),

            KeyCode::Char('s') => {
                self.game.reshuffle();
                self.show_message("Shuffled");
            }
            KeyCode::Char('d') => {
                self.game.deselect_all();
            }
            KeyCode::Char('n') => self.replay(),
            KeyCode::Char('r') if self.game.is_terminal() => {
                self.screen_state = ScreenState::Results;
            }
            KeyCode::Char('i') => self.screen_state = ScreenState::Stats,
            KeyCode::Char('?') => self.screen_state = ScreenState::Help,
            KeyCode::Char('t') => {
                self.theme = self.theme.next();
                let msg = format!("Theme: {}", self.theme.name);
                self.show_message(&msg);
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_results_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,
            KeyCode::Char('n') => self.replay(),
            KeyCode::Char('i') => self.screen_state = ScreenState::Stats,
            KeyCode::Esc | KeyCode::Enter => self.screen_state = ScreenState::Playing,
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,
            _ => {
                self.screen_state = if self.game.is_terminal() {
                    ScreenState::Results
                } else {
                    ScreenState::Playing
                };
            }
        }
        AppAction::Continue
    }

    /// Move the cursor over the tile grid, clamped to the board
    fn move_cursor(&mut self, dr: isize, dc: isize) {
        let count = self.game.tiles().len();
        if count == 0 {
            return;
        }
        let rows = count.div_ceil(COLUMNS) as isize;
        let row = (self.cursor / COLUMNS) as isize;
        let col = (self.cursor % COLUMNS) as isize;

        let new_row = (row + dr).clamp(0, rows - 1);
        let new_col = (col + dc).clamp(0, COLUMNS as isize - 1);
        let target = (new_row * COLUMNS as isize + new_col) as usize;
        self.cursor = target.min(count - 1);
    }

    fn clamp_cursor(&mut self) {
        let count = self.game.tiles().len();
        self.cursor = self.cursor.min(count.saturating_sub(1));
    }

    /// Tile under the cursor, if any
    pub fn cursor_item(&self) -> Option<&str> {
        self.game.tiles().get(self.cursor).map(String::as_str)
    }

    fn toggle_at_cursor(&mut self) {
        let Some(item) = self.cursor_item().map(str::to_string) else {
            return;
        };
        let was_selected = self.game.session().is_selected(&item);
        let size = self.game.toggle_select(&item);
        if !was_selected && !self.game.session().is_selected(&item) && size == 3 {
            self.show_message("Three items already selected");
        }
    }

    fn submit(&mut self) {
        match self.game.submit_guess() {
            Some(GuessResult::Correct { group }) => {
                let msg = format!("{}: {}", group.category, group.items_label());
                self.show_message(&msg);
            }
            Some(GuessResult::Incorrect { mistakes_remaining }) => {
                self.shake_timer = 5;
                if mistakes_remaining > 0 {
                    let msg = format!(
                        "Not a group! {} {} left",
                        mistakes_remaining,
                        if mistakes_remaining == 1 { "mistake" } else { "mistakes" }
                    );
                    self.show_message(&msg);
                }
            }
            None => {
                self.show_message("Select three items first");
                return;
            }
        }

        self.clamp_cursor();
        if self.game.is_terminal() {
            self.finish_game();
        }
    }

    /// Record the finished game and open the results screen
    fn finish_game(&mut self) {
        self.screen_state = ScreenState::Results;
        if self.game_recorded {
            return;
        }
        self.game_recorded = true;

        let session = self.game.session();
        let Some(result) = GameResult::from_outcome(session.outcome()) else {
            return;
        };
        let counted = self.stats.record_game(
            self.game.storage_key(),
            self.game.puzzle_number(),
            result,
            session.mistakes(),
            session.solved_count(),
        );
        if counted {
            info!(?result, mistakes = session.mistakes(), "recorded game");
        }
    }

    fn replay(&mut self) {
        let now = self.now();
        if self.game.replay(now) {
            self.cursor = 0;
            self.game_recorded = false;
            self.rollover_announced = false;
            self.screen_state = ScreenState::Playing;
            let msg = format!("Puzzle #{}", self.game.puzzle_number());
            self.show_message(&msg);
            if self.game.is_terminal() {
                self.finish_game();
            }
        } else if let Some(left) = self.countdown() {
            let msg = format!("Next puzzle in {}", left);
            self.show_message(&msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use connections_core::{Catalog, GameConfig, MemoryStore, Outcome, SimpleRng};
    use crossterm::event::KeyModifiers;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn next_day() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 3)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn app_with(config: GameConfig, clock: Clock) -> App {
        let store: DynStore = Box::new(MemoryStore::new());
        let game = Game::with_rng(
            config,
            Catalog::builtin().unwrap(),
            store,
            clock(),
            SimpleRng::with_seed(42),
        )
        .unwrap();
        App::with_clock(game, StatsManager::default(), clock)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    /// Move the cursor onto `item` and press space
    fn click(app: &mut App, item: &str) {
        app.cursor = app.game.tiles().iter().position(|t| t == item).unwrap();
        press(app, KeyCode::Char(' '));
    }

    fn decoys(app: &App) -> Vec<String> {
        app.game.session().puzzle().decoys[..3].to_vec()
    }

    #[test]
    fn test_cursor_stays_on_board() {
        let mut app = app_with(GameConfig::daily(), noon);
        for _ in 0..10 {
            press(&mut app, KeyCode::Up);
            press(&mut app, KeyCode::Left);
        }
        assert_eq!(app.cursor, 0);
        for _ in 0..10 {
            press(&mut app, KeyCode::Down);
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.cursor, 15);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.cursor, 11);
    }

    #[test]
    fn test_wrong_guess_shakes_and_counts() {
        let mut app = app_with(GameConfig::daily(), noon);
        for item in decoys(&app) {
            click(&mut app, &item);
        }
        assert_eq!(app.game.selected().len(), 3);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.game.session().mistakes(), 1);
        assert!(app.shake_timer > 0);
        assert!(app.message.as_deref().unwrap().contains("3 mistakes left"));
    }

    #[test]
    fn test_submit_needs_three() {
        let mut app = app_with(GameConfig::daily(), noon);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.message.as_deref(), Some("Select three items first"));
        assert_eq!(app.game.session().mistakes(), 0);
    }

    #[test]
    fn test_winning_opens_results_and_records_once() {
        let mut app = app_with(GameConfig::daily(), noon);
        let groups = app.game.session().puzzle().groups.clone();
        for group in &groups {
            for item in &group.items {
                click(&mut app, item);
            }
            press(&mut app, KeyCode::Enter);
        }
        assert_eq!(app.game.outcome(), Outcome::Won);
        assert_eq!(app.screen_state, ScreenState::Results);
        assert_eq!(app.stats.player.wins, 1);

        // Daily lock: same day cannot be replayed
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.game.outcome(), Outcome::Won);
        assert!(app.message.as_deref().unwrap().starts_with("Next puzzle in"));
        assert_eq!(app.stats.player.played, 1);
    }

    #[test]
    fn test_losing_in_practice_mode_and_replaying() {
        let mut app = app_with(GameConfig::random(), noon);
        for _ in 0..10 {
            for item in decoys(&app) {
                click(&mut app, &item);
            }
            press(&mut app, KeyCode::Enter);
        }
        assert_eq!(app.game.outcome(), Outcome::Lost);
        assert_eq!(app.screen_state, ScreenState::Results);
        assert_eq!(app.stats.player.losses, 1);
        assert!(app.countdown().is_none());

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.screen_state, ScreenState::Playing);
        assert_eq!(app.game.outcome(), Outcome::InProgress);
    }

    #[test]
    fn test_next_day_replay_in_daily_mode() {
        let mut app = app_with(GameConfig::daily(), noon);
        app.clock = next_day;
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.game.storage_key(), Some("connections-2025-04-03"));
    }

    #[test]
    fn test_overlays_return_to_game() {
        let mut app = app_with(GameConfig::daily(), noon);
        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.screen_state, ScreenState::Stats);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen_state, ScreenState::Playing);
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.screen_state, ScreenState::Help);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen_state, ScreenState::Playing);
    }

    #[test]
    fn test_cursor_clamped_after_solve() {
        let mut app = app_with(GameConfig::daily(), noon);
        let group = app.game.session().puzzle().groups[0].clone();
        for item in &group.items {
            click(&mut app, item);
        }
        app.cursor = 15;
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.game.tiles().len(), 13);
        assert!(app.cursor < 13);
    }
}
