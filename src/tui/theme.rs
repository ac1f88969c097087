//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;

/// Which palette to use; `Auto` asks the terminal for its background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Theme {
    #[default]
    Auto,
    Dark,
    Light,
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Pick markers and consensus bars
    pub will_color: Color,
    pub should_color: Color,
    pub bar_empty: Color,

    // Lists and tables
    pub row_selected: Style,
    pub header_style: Style,
    pub index_color: Color,

    // General colors
    pub muted: Color,
    pub title_color: Color,
    pub you_color: Color,

    // Tab colors
    pub tab_active_style: Style,
    pub tab_inactive_style: Style,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
    pub popup_bg: Color,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            will_color: Color::Yellow,
            should_color: Color::Magenta,
            bar_empty: Color::DarkGray,
            row_selected: Style::new().reversed(),
            header_style: Style::new().bold(),
            index_color: Color::DarkGray,
            muted: Color::Gray,
            title_color: Color::Cyan,
            you_color: Color::Green,
            tab_active_style: Style::new().fg(Color::Cyan).bold(),
            tab_inactive_style: Style::new().fg(Color::DarkGray),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            popup_bg: Color::Indexed(234),
        }
    }

    pub fn light() -> Self {
        Self {
            will_color: Color::Rgb(176, 120, 0),
            should_color: Color::Rgb(160, 30, 120),
            bar_empty: Color::Indexed(252),
            row_selected: Style::new().reversed(),
            header_style: Style::new().bold(),
            index_color: Color::Indexed(244),
            muted: Color::Indexed(242),
            title_color: Color::Blue,
            you_color: Color::Rgb(0, 120, 0),
            tab_active_style: Style::new().fg(Color::Blue).bold(),
            tab_inactive_style: Style::new().fg(Color::Indexed(246)),
            status_bar_bg: Color::Indexed(254),
            status_key_color: Color::Blue,
            flash_success: Color::Rgb(0, 120, 0),
            flash_error: Color::Red,
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
            popup_bg: Color::Indexed(255),
        }
    }

    /// Color for a consensus share; the pick's own dimension color once it
    /// has any support
    pub fn share_color(&self, pct: f64, base: Color) -> Color {
        if pct > 0.0 {
            base
        } else {
            self.muted
        }
    }
}

/// Pick a palette. `Auto` queries the terminal background and falls back to
/// dark when the terminal does not answer.
pub fn resolve_theme(theme: Theme) -> ThemeColors {
    match theme {
        Theme::Dark => ThemeColors::dark(),
        Theme::Light => ThemeColors::light(),
        Theme::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => ThemeColors::light(),
            _ => ThemeColors::dark(),
        },
    }
}
