//! Color themes for the preview chrome

use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for the UI around the matrix
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    /// Primary foreground color (text, borders)
    pub fg: Color,
    /// Dimmed foreground (secondary text)
    pub fg_dim: Color,
    pub bg: Color,
    /// Selected items, active elements
    pub highlight: Color,
    /// Meters, badges
    pub accent: Color,
    pub warning: Color,
    pub danger: Color,
}

impl Theme {
    pub fn normal(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.fg_dim)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Meter color for a level in 0.0..=1.0
    pub fn meter_style(&self, level: f32) -> Style {
        let color = if level > 0.9 {
            self.danger
        } else if level > 0.75 {
            self.warning
        } else {
            self.accent
        };
        Style::default().fg(color)
    }

    /// Badge for a supported capability
    pub fn badge_on(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn badge_off(&self) -> Style {
        Style::default().fg(self.fg_dim)
    }

    /// Look up a builtin theme, case-insensitive
    pub fn by_name(name: &str) -> Option<Theme> {
        let wanted = name.trim().to_ascii_lowercase();
        ALL_THEMES
            .iter()
            .find(|t| t.name == wanted || t.name.starts_with(&wanted))
            .cloned()
    }
}

impl Default for Theme {
    fn default() -> Self {
        MIDNIGHT
    }
}

/// Neutral dark theme that keeps the matrix colors readable
pub const MIDNIGHT: Theme = Theme {
    name: "midnight",
    fg: Color::Rgb(200, 200, 210),
    fg_dim: Color::Rgb(100, 100, 120),
    bg: Color::Rgb(8, 8, 12),
    highlight: Color::Rgb(120, 180, 255),
    accent: Color::Rgb(90, 220, 160),
    warning: Color::Rgb(255, 210, 90),
    danger: Color::Rgb(255, 100, 100),
};

/// Green phosphor
pub const PHOSPHOR: Theme = Theme {
    name: "phosphor",
    fg: Color::Rgb(51, 255, 51),
    fg_dim: Color::Rgb(25, 128, 25),
    bg: Color::Rgb(0, 10, 0),
    highlight: Color::Rgb(180, 255, 180),
    accent: Color::Rgb(100, 255, 100),
    warning: Color::Rgb(255, 255, 100),
    danger: Color::Rgb(255, 100, 100),
};

pub const AMBER: Theme = Theme {
    name: "amber",
    fg: Color::Rgb(255, 176, 0),
    fg_dim: Color::Rgb(128, 88, 0),
    bg: Color::Rgb(10, 5, 0),
    highlight: Color::Rgb(255, 220, 128),
    accent: Color::Rgb(255, 200, 64),
    warning: Color::Rgb(255, 255, 100),
    danger: Color::Rgb(255, 100, 100),
};

pub const ALL_THEMES: [Theme; 3] = [MIDNIGHT, PHOSPHOR, AMBER];
