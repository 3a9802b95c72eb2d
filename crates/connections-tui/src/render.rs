use crate::app::{App, ScreenState, COLUMNS};
use connections_core::{Group, SelectionMode};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io;

/// Inner width of a tile
const TILE_WIDTH: usize = 14;
/// Board width: four tiles plus their borders
const BOARD_WIDTH: u16 = (COLUMNS * (TILE_WIDTH + 1) + 1) as u16;

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(stdout, Hide, SetBackgroundColor(app.theme.bg), Clear(ClearType::All))?;

    match app.screen_state {
        ScreenState::Playing => render_game_screen(stdout, app, term_width, term_height)?,
        ScreenState::Results => render_results_screen(stdout, app, term_width)?,
        ScreenState::Stats => render_stats_screen(stdout, app, term_width)?,
        ScreenState::Help => render_help_screen(stdout, app, term_width)?,
    }

    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, term_width)?;
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn board_x(term_width: u16) -> u16 {
    term_width.saturating_sub(BOARD_WIDTH) / 2
}

fn render_game_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let x = board_x(term_width);
    let mut y = if term_height > 30 { 2 } else { 1 };

    render_title(stdout, app, x, y)?;
    y += 2;

    let solved: Vec<&Group> = app.game.session().solved_groups().collect();
    for group in &solved {
        render_group_bar(stdout, app, group, x, y)?;
        y += 3;
    }

    // Wrong guesses nudge the board sideways for a few ticks
    let shake_x = match app.shake_timer {
        0 => x,
        t if t % 2 == 0 => x + 1,
        _ => x.saturating_sub(1),
    };
    y = render_tiles(stdout, app, shake_x, y)?;
    y += 1;

    render_mistakes(stdout, app, x, y)?;
    if let Some(caption) = app.cursor_item().and_then(cursor_caption) {
        execute!(
            stdout,
            MoveTo(x, y + 1),
            SetForegroundColor(app.theme.key),
            Print(format!("> {}", caption))
        )?;
    }
    render_controls(stdout, app, x, y + 3)?;
    Ok(())
}

/// Full name of a tile whose label is cut short on the board
fn cursor_caption(item: &str) -> Option<&str> {
    (item.chars().count() > TILE_WIDTH - 2).then_some(item)
}

fn render_title(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let title = match (app.game.config().mode, app.game.effective_date()) {
        (SelectionMode::Daily, Some(date)) => format!(
            "CONNECTIONS  Daily #{}  {}",
            app.game.puzzle_number(),
            date.format("%Y-%m-%d")
        ),
        _ => format!("CONNECTIONS  Practice #{}", app.game.puzzle_number()),
    };
    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.key),
        Print(center(&title, BOARD_WIDTH as usize))
    )?;
    Ok(())
}

/// Two-line coloured bar naming a group and its items
fn render_group_bar(
    stdout: &mut io::Stdout,
    app: &App,
    group: &Group,
    x: u16,
    y: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let width = BOARD_WIDTH as usize;
    execute!(
        stdout,
        SetBackgroundColor(theme.group_color(group.difficulty)),
        SetForegroundColor(theme.group_fg),
        MoveTo(x, y),
        Print(center(&group.category.to_uppercase(), width)),
        MoveTo(x, y + 1),
        Print(center(&group.items_label(), width)),
        SetBackgroundColor(theme.bg)
    )?;
    Ok(())
}

/// Draw the tile grid; returns the row below it
fn render_tiles(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<u16> {
    let theme = &app.theme;
    let tiles = app.game.tiles();
    let rows = tiles.len().div_ceil(COLUMNS);
    let border = format!("+{}", format!("{}+", "-".repeat(TILE_WIDTH)).repeat(COLUMNS));

    execute!(
        stdout,
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.border),
        MoveTo(x, y),
        Print(&border)
    )?;

    for row in 0..rows {
        let cell_y = y + 1 + row as u16 * 2;
        execute!(stdout, MoveTo(x, cell_y))?;

        for col in 0..COLUMNS {
            execute!(
                stdout,
                SetBackgroundColor(theme.bg),
                SetForegroundColor(theme.border),
                Print("|")
            )?;

            let index = row * COLUMNS + col;
            let Some(item) = tiles.get(index) else {
                execute!(stdout, Print(" ".repeat(TILE_WIDTH)))?;
                continue;
            };

            let selected = app.game.session().is_selected(item);
            let (bg, fg) = if selected {
                (theme.selected_bg, theme.selected_fg)
            } else if index == app.cursor {
                (theme.cursor_bg, theme.tile)
            } else {
                (theme.bg, theme.tile)
            };
            let label = if index == app.cursor {
                format!(">{}<", center(item, TILE_WIDTH - 2))
            } else {
                center(item, TILE_WIDTH)
            };
            execute!(
                stdout,
                SetBackgroundColor(bg),
                SetForegroundColor(fg),
                Print(label)
            )?;
        }

        execute!(
            stdout,
            SetBackgroundColor(theme.bg),
            SetForegroundColor(theme.border),
            Print("|"),
            MoveTo(x, cell_y + 1),
            Print(&border)
        )?;
    }

    Ok(y + 1 + rows as u16 * 2)
}

fn render_mistakes(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let session = app.game.session();
    let color = if session.mistakes_remaining() <= 1 {
        theme.error
    } else {
        theme.fg
    };
    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.info),
        Print("Mistakes remaining: "),
        SetForegroundColor(color),
        Print(mistake_dots(session.mistakes(), session.max_mistakes())),
        SetForegroundColor(theme.info),
        Print(format!("   Selected {}/3", session.selected().len()))
    )?;
    Ok(())
}

/// One filled dot per mistake left, one hollow dot per mistake made
fn mistake_dots(used: usize, max: usize) -> String {
    let left = max.saturating_sub(used);
    let mut dots = "● ".repeat(left);
    dots.push_str(&"○ ".repeat(max - left));
    dots.trim_end().to_string()
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    let controls = [
        ("hjkl/Arrows", "Move"),
        ("Space", "Select"),
        ("Enter", "Submit"),
        ("s", "Shuffle"),
        ("d", "Deselect all"),
        ("n", "New puzzle"),
        ("i", "Stats"),
        ("?", "Help"),
        ("t", "Theme"),
        ("q", "Quit"),
    ];

    // Display in 4 columns
    for (i, (key, desc)) in controls.iter().enumerate() {
        let col = i / 3;
        let row = i % 3;
        let cx = x + (col as u16) * 17;
        let cy = y + row as u16;

        execute!(
            stdout,
            MoveTo(cx, cy),
            SetForegroundColor(theme.key),
            Print(format!("{:>11}", key)),
            SetForegroundColor(theme.info),
            Print(format!(" {}", desc))
        )?;
    }

    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    term_width: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let padded = format!("  {}  ", msg);
    let x = term_width.saturating_sub(padded.chars().count() as u16) / 2;

    execute!(
        stdout,
        MoveTo(x, 0),
        SetForegroundColor(theme.selected_fg),
        SetBackgroundColor(theme.selected_bg),
        Print(&padded),
        SetBackgroundColor(theme.bg)
    )?;

    Ok(())
}

fn render_results_screen(stdout: &mut io::Stdout, app: &App, term_width: u16) -> io::Result<()> {
    let theme = &app.theme;
    let x = board_x(term_width);
    let width = BOARD_WIDTH as usize;

    let Some(summary) = app.game.results() else {
        return Ok(());
    };

    let headline_color = if summary.won { theme.success } else { theme.error };
    execute!(
        stdout,
        MoveTo(x, 2),
        SetForegroundColor(headline_color),
        Print(center(summary.headline(), width)),
        MoveTo(x, 3),
        SetForegroundColor(theme.fg),
        Print(center(summary.message(), width))
    )?;

    let mut y = 5;
    for group in summary.solved() {
        render_group_bar(stdout, app, group, x, y)?;
        y += 3;
    }
    for group in summary.missed() {
        // Groups the player never found are shown without a fill
        execute!(
            stdout,
            SetBackgroundColor(theme.bg),
            SetForegroundColor(theme.group_color(group.difficulty)),
            MoveTo(x, y),
            Print(center(&format!("{} (missed)", group.category.to_uppercase()), width)),
            MoveTo(x, y + 1),
            Print(center(&group.items_label(), width))
        )?;
        y += 3;
    }

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.info),
        Print(center(
            &format!(
                "Groups found {}/4   Mistakes {}/{}",
                summary.solved_count, summary.mistakes, summary.max_mistakes
            ),
            width
        ))
    )?;

    let footer = match app.countdown() {
        Some(left) => format!("Next puzzle in {}", left),
        None => "Press n for another puzzle".to_string(),
    };
    execute!(
        stdout,
        MoveTo(x, y + 2),
        SetForegroundColor(theme.key),
        Print(center(&footer, width)),
        MoveTo(x, y + 4),
        SetForegroundColor(theme.info),
        Print(center("n New  i Stats  Enter Board  q Quit", width))
    )?;
    Ok(())
}

fn render_stats_screen(stdout: &mut io::Stdout, app: &App, term_width: u16) -> io::Result<()> {
    let theme = &app.theme;
    let player = &app.stats.player;

    let title = "=== STATISTICS ===";
    let title_x = term_width.saturating_sub(title.len() as u16) / 2;
    execute!(
        stdout,
        MoveTo(title_x, 1),
        SetForegroundColor(theme.key),
        Print(title)
    )?;

    let x = 4u16;
    let lines: [(Color, String); 6] = [
        (theme.info, format!("Played: {}", player.played)),
        (theme.success, format!("Wins: {}", player.wins)),
        (theme.error, format!("Losses: {}", player.losses)),
        (theme.fg, format!("Win Rate: {:.1}%", player.win_rate())),
        (theme.fg, format!("Current Streak: {}", player.current_streak)),
        (theme.fg, format!("Best Streak: {}", player.best_streak)),
    ];
    for (i, (color, text)) in lines.iter().enumerate() {
        execute!(
            stdout,
            MoveTo(x, 3 + i as u16),
            SetForegroundColor(*color),
            Print(text)
        )?;
    }

    // Mistake distribution of won games
    let hist_x = term_width / 2;
    execute!(
        stdout,
        MoveTo(hist_x, 3),
        SetForegroundColor(theme.key),
        Print("Mistakes in wins")
    )?;
    let peak = player.mistake_histogram.iter().copied().max().unwrap_or(0).max(1);
    for (mistakes, &count) in player.mistake_histogram.iter().enumerate() {
        let bar_len = count * 20 / peak;
        execute!(
            stdout,
            MoveTo(hist_x, 4 + mistakes as u16),
            SetForegroundColor(theme.info),
            Print(format!("{:>2} ", mistakes)),
            SetForegroundColor(theme.success),
            Print("#".repeat(bar_len.max(usize::from(count > 0)))),
            SetForegroundColor(theme.fg),
            Print(format!(" {}", count))
        )?;
    }

    let recent_y = 11;
    execute!(
        stdout,
        MoveTo(x, recent_y),
        SetForegroundColor(theme.key),
        Print("Recent games")
    )?;
    for (i, record) in app.stats.recent_games(8).iter().enumerate() {
        let (color, label) = match record.result {
            crate::stats::GameResult::Win => (theme.success, "won "),
            crate::stats::GameResult::Loss => (theme.error, "lost"),
        };
        let name = record.key.as_deref().unwrap_or("practice");
        execute!(
            stdout,
            MoveTo(x, recent_y + 1 + i as u16),
            SetForegroundColor(color),
            Print(label),
            SetForegroundColor(theme.info),
            Print(format!(
                "  #{:<3} {:<24} {} mistakes, {}/4 groups",
                record.puzzle_number, name, record.mistakes, record.groups_found
            ))
        )?;
    }

    execute!(
        stdout,
        MoveTo(x, recent_y + 10),
        SetForegroundColor(theme.info),
        Print("Press any key to go back")
    )?;
    Ok(())
}

fn render_help_screen(stdout: &mut io::Stdout, app: &App, term_width: u16) -> io::Result<()> {
    let theme = &app.theme;
    let max = app.game.session().max_mistakes();
    let mut lines = vec![
        "Sixteen words hide four groups of three.".to_string(),
        "The other four words are decoys and belong to no group.".to_string(),
        String::new(),
        "Select three words and press Enter to guess a group.".to_string(),
        format!("A wrong guess costs a mistake. {} mistakes end the game.", max),
        "Groups are ranked yellow, green, blue and purple by difficulty.".to_string(),
    ];
    lines.extend(persistence_note(app).iter().map(|line| line.to_string()));

    let x = term_width.saturating_sub(64) / 2;
    execute!(
        stdout,
        MoveTo(x, 1),
        SetForegroundColor(theme.key),
        Print("=== HOW TO PLAY ===")
    )?;
    for (i, line) in lines.iter().enumerate() {
        execute!(
            stdout,
            MoveTo(x, 3 + i as u16),
            SetForegroundColor(theme.fg),
            Print(line)
        )?;
    }
    execute!(
        stdout,
        MoveTo(x, 4 + lines.len() as u16),
        SetForegroundColor(theme.info),
        Print("Press any key to go back")
    )?;
    Ok(())
}

fn persistence_note(app: &App) -> &'static [&'static str] {
    match app.game.config().mode {
        SelectionMode::Daily if app.game.is_persistent() => &[
            "",
            "The daily puzzle changes at the rollover hour and",
            "your progress is saved as you play.",
        ],
        SelectionMode::Daily => &[
            "",
            "The daily puzzle changes at the rollover hour.",
            "Progress cannot be saved on this device.",
        ],
        SelectionMode::Random => &["", "Practice puzzles are not saved. Press n for another."],
    }
}

/// Center `text` in `width` columns, truncating if it does not fit
fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.chars().take(width).collect();
    }
    let left = (width - len) / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(width - len - left))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::DynStore;
    use crate::stats::StatsManager;
    use connections_core::{Catalog, Game, GameConfig, MemoryStore, SimpleRng};

    #[test]
    fn test_center_pads_and_truncates() {
        assert_eq!(center("ab", 6), "  ab  ");
        assert_eq!(center("abc", 6), " abc  ");
        assert_eq!(center("Chocolate bar", 5), "Choco");
        assert_eq!(center("São Paulo", 9), "São Paulo");
    }

    #[test]
    fn test_mistake_dots() {
        assert_eq!(mistake_dots(0, 4), "● ● ● ●");
        assert_eq!(mistake_dots(3, 4), "● ○ ○ ○");
        assert_eq!(mistake_dots(4, 4), "○ ○ ○ ○");
        assert_eq!(mistake_dots(1, 2), "● ○");
    }

    #[test]
    fn test_long_names_get_a_caption() {
        assert_eq!(cursor_caption("Carlos Alberto Torres"), Some("Carlos Alberto Torres"));
        assert_eq!(cursor_caption("Ronaldo Fenômeno"), Some("Ronaldo Fenômeno"));
        assert_eq!(cursor_caption("Pelé"), None);
        assert_eq!(cursor_caption("Ronaldinho"), None);
    }

    #[test]
    fn test_help_mentions_saving_only_when_saving() {
        assert!(notes(GameConfig::daily(), Box::new(MemoryStore::new()))
            .contains("your progress is saved as you play."));
        let practice = notes(GameConfig::random(), Box::new(MemoryStore::new()));
        assert!(!practice.contains("saved as you play"));
        assert!(practice.contains("not saved"));
    }

    fn notes(config: GameConfig, store: DynStore) -> String {
        let now = chrono::NaiveDate::from_ymd_opt(2025, 4, 2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let game = Game::with_rng(
            config,
            Catalog::builtin().unwrap(),
            store,
            now,
            SimpleRng::with_seed(1),
        )
        .unwrap();
        let app = App::new(game, StatsManager::default());
        persistence_note(&app).join("\n")
    }

    #[test]
    fn test_board_fits_four_tiles() {
        assert_eq!(BOARD_WIDTH, 61);
        assert_eq!(board_x(81), 10);
        assert_eq!(board_x(40), 0);
    }
}
