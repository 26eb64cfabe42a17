use ratatui::style::{Color, Modifier, Style};

use worktime_core::Theme;

// Color palette
pub const PRIMARY: Color = Color::Rgb(64, 128, 192);
pub const ACCENT: Color = Color::Rgb(192, 160, 64);
pub const ERROR: Color = Color::Rgb(192, 64, 64);
pub const SUCCESS: Color = Color::Rgb(96, 160, 96);
pub const MUTED: Color = Color::Rgb(128, 128, 128);

/// Dark theme background, the same value the web shell puts in `theme-color`
const DARK_BG: Color = Color::Rgb(11, 18, 32);
const DARK_HIGHLIGHT: Color = Color::Rgb(32, 44, 68);
const LIGHT_HIGHLIGHT: Color = Color::Rgb(220, 228, 240);

/// Foreground/background pair for the active theme.
///
/// `System` leaves both to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub highlight: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::System => Self {
                fg: Color::Reset,
                bg: Color::Reset,
                highlight: Color::Rgb(48, 48, 64),
            },
            Theme::Light => Self {
                fg: Color::Black,
                bg: Color::White,
                highlight: LIGHT_HIGHLIGHT,
            },
            Theme::Dark => Self {
                fg: Color::White,
                bg: DARK_BG,
                highlight: DARK_HIGHLIGHT,
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.fg)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar(&self) -> Style {
        Style::default().bg(self.highlight).fg(self.fg)
    }
}

pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn success_style() -> Style {
    Style::default().fg(SUCCESS)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn result_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn help_key_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}
