mod app;
mod logger;
mod render;
mod stats;
mod store;
mod theme;

use app::{App, DynStore};
use clap::Parser;
use connections_core::{Catalog, Game, GameConfig, MemoryStore, SelectionMode, SimpleRng};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use stats::StatsManager;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use store::{data_dir, FileStore};
use tracing::{error, info};

/// Find the four hidden groups of three among sixteen tiles
#[derive(Parser, Debug)]
#[command(name = "connections", version, about)]
struct Args {
    /// Puzzle selection: daily or random
    #[arg(short, long, default_value = "daily")]
    mode: SelectionMode,

    /// Wrong guesses allowed (defaults to 4 daily, 10 random)
    #[arg(long)]
    max_mistakes: Option<usize>,

    /// Local hour at which the daily puzzle changes
    #[arg(long)]
    rollover_hour: Option<u32>,

    /// Puzzle catalog JSON file (defaults to the built-in catalog)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Seed for the tile shuffle and random draws
    #[arg(long)]
    seed: Option<u64>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> GameConfig {
        let mut config = GameConfig::for_mode(self.mode);
        if let Some(max) = self.max_mistakes {
            config.max_mistakes = max;
        }
        if let Some(hour) = self.rollover_hour {
            config.rollover_hour = hour;
        }
        config
    }

    fn catalog(&self) -> Result<Catalog, Box<dyn std::error::Error>> {
        match &self.catalog {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
                Ok(Catalog::from_json(&json)?)
            }
            None => Ok(Catalog::builtin()?),
        }
    }
}

fn build_game(args: &Args) -> Result<Game<DynStore>, Box<dyn std::error::Error>> {
    let config = args.config();
    let catalog = args.catalog()?;
    let store: DynStore = match config.mode {
        SelectionMode::Daily => Box::new(FileStore::open_default()),
        SelectionMode::Random => Box::new(MemoryStore::new()),
    };
    let rng = match args.seed {
        Some(seed) => SimpleRng::with_seed(seed),
        None => SimpleRng::new(),
    };
    Ok(Game::with_rng(config, catalog, store, app::local_now(), rng)?)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_path = data_dir().join("connections.log");
    if let Err(e) = logger::init_file_logger(&log_path, args.verbose) {
        eprintln!("Warning: logging disabled ({})", e);
    }

    let game = match build_game(&args) {
        Ok(game) => game,
        Err(e) => {
            error!(error = %e, "failed to start");
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(mode = %args.mode, puzzle = game.puzzle_number(), "starting");

    let mut app = App::new(game, StatsManager::load());
    match run_terminal(&mut app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_terminal(app: &mut App) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Run the app
    let result = run_app(&mut stdout, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;

    result
}

fn run_app(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let tick_rate = app.get_tick_rate();

        render::render(stdout, app)?;
        stdout.flush()?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout.min(Duration::from_millis(33)))? {
            if let Event::Key(key) = event::read()? {
                // Handle Ctrl+C
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break;
                }

                match app.handle_key(key) {
                    app::AppAction::Continue => {}
                    app::AppAction::Quit => break,
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_build_config() {
        let args = Args::parse_from(["connections", "--mode", "random", "--max-mistakes", "6"]);
        let config = args.config();
        assert_eq!(config.mode, SelectionMode::Random);
        assert_eq!(config.max_mistakes, 6);
        assert_eq!(config.rollover_hour, 10);
    }

    #[test]
    fn test_mode_defaults_to_daily() {
        let args = Args::parse_from(["connections", "--rollover-hour", "0"]);
        let config = args.config();
        assert_eq!(config.mode, SelectionMode::Daily);
        assert_eq!(config.max_mistakes, 4);
        assert_eq!(config.rollover_hour, 0);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(Args::try_parse_from(["connections", "--mode", "weekly"]).is_err());
    }

    #[test]
    fn test_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("puzzles.json");
        std::fs::write(&path, "[]").unwrap();
        let args = Args::parse_from(["connections", "--catalog", path.to_str().unwrap()]);
        assert!(args.catalog().is_err());

        let missing = Args::parse_from(["connections", "--catalog", "/nonexistent/p.json"]);
        assert!(missing.catalog().is_err());
    }

    #[test]
    fn test_seeded_practice_game() {
        let args = Args::parse_from(["connections", "-m", "random", "--seed", "7"]);
        let game = build_game(&args).unwrap();
        assert!(!game.is_persistent());
        assert_eq!(game.tiles().len(), 16);
    }
}
