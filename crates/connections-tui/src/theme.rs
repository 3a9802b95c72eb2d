use connections_core::Difficulty;
use crossterm::style::Color;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Tile border color
    pub border: Color,
    /// Unselected tile text
    pub tile: Color,
    /// Tile under the cursor
    pub cursor_bg: Color,
    /// Selected tile background
    pub selected_bg: Color,
    /// Selected tile text
    pub selected_fg: Color,
    /// Wrong guess / lost color
    pub error: Color,
    /// Correct guess / won color
    pub success: Color,
    /// Info text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
    /// Solved group bars, indexed by difficulty rank
    pub groups: [Color; 4],
    /// Text drawn on top of a group bar
    pub group_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            name: "dark",
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 70, g: 75, b: 90 },
            tile: Color::Rgb { r: 255, g: 255, b: 255 },
            cursor_bg: Color::Rgb { r: 45, g: 52, b: 72 },
            selected_bg: Color::Rgb { r: 90, g: 94, b: 110 },
            selected_fg: Color::Rgb { r: 255, g: 255, b: 255 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
            groups: [
                Color::Rgb { r: 249, g: 223, b: 109 },
                Color::Rgb { r: 160, g: 195, b: 90 },
                Color::Rgb { r: 176, g: 196, b: 239 },
                Color::Rgb { r: 186, g: 129, b: 197 },
            ],
            group_fg: Color::Rgb { r: 20, g: 20, b: 20 },
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            name: "light",
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            border: Color::Rgb { r: 180, g: 180, b: 195 },
            tile: Color::Rgb { r: 0, g: 0, b: 0 },
            cursor_bg: Color::Rgb { r: 225, g: 228, b: 240 },
            selected_bg: Color::Rgb { r: 90, g: 94, b: 110 },
            selected_fg: Color::Rgb { r: 255, g: 255, b: 255 },
            error: Color::Rgb { r: 220, g: 50, b: 50 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
            groups: [
                Color::Rgb { r: 249, g: 223, b: 109 },
                Color::Rgb { r: 160, g: 195, b: 90 },
                Color::Rgb { r: 176, g: 196, b: 239 },
                Color::Rgb { r: 186, g: 129, b: 197 },
            ],
            group_fg: Color::Rgb { r: 0, g: 0, b: 0 },
        }
    }

    /// High contrast theme
    pub fn high_contrast() -> Self {
        Self {
            name: "high contrast",
            bg: Color::Black,
            fg: Color::White,
            border: Color::Grey,
            tile: Color::White,
            cursor_bg: Color::DarkBlue,
            selected_bg: Color::White,
            selected_fg: Color::Black,
            error: Color::Red,
            success: Color::Green,
            info: Color::Grey,
            key: Color::Yellow,
            groups: [Color::Yellow, Color::Green, Color::Cyan, Color::Magenta],
            group_fg: Color::Black,
        }
    }

    /// Next theme in the rotation
    pub fn next(&self) -> Self {
        match self.name {
            "dark" => Self::light(),
            "light" => Self::high_contrast(),
            _ => Self::dark(),
        }
    }

    pub fn group_color(&self, difficulty: Difficulty) -> Color {
        self.groups[difficulty.rank() as usize]
    }
}
