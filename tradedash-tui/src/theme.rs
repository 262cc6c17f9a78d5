//! Color themes for the TradeDash TUI.
//!
//! Two palettes share one token set:
//! - **Dark**: neon accents on a charcoal background (default)
//! - **Light**: saturated inks for bright terminals
//!
//! Panels read colors through [`Theme`] style helpers so a toggle repaints
//! everything on the next frame.

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

/// Persisted theme choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

impl ThemeName {
    pub fn toggle(self) -> ThemeName {
        match self {
            ThemeName::Dark => ThemeName::Light,
            ThemeName::Light => ThemeName::Dark,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemeName::Dark => "dark",
            ThemeName::Light => "light",
        }
    }

    pub fn theme(self) -> Theme {
        match self {
            ThemeName::Dark => Theme::dark(),
            ThemeName::Light => Theme::light(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Primary surface
    pub background: Color,
    /// Focus, highlights, headings
    pub accent: Color,
    /// Gains, winners, long
    pub positive: Color,
    /// Losses, short
    pub negative: Color,
    /// Warnings, pending state
    pub warning: Color,
    /// Secondary text, hints
    pub muted: Color,
    pub text_primary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(250, 250, 247),
            accent: Color::Rgb(0, 95, 175),
            positive: Color::Rgb(0, 135, 68),
            negative: Color::Rgb(200, 30, 60),
            warning: Color::Rgb(180, 95, 0),
            muted: Color::Rgb(95, 95, 110),
            text_primary: Color::Black,
        }
    }

    /// Zero counts as a gain, matching how wins are counted.
    pub fn pnl_color(&self, value: f64) -> Color {
        if value >= 0.0 {
            self.positive
        } else {
            self.negative
        }
    }

    pub fn direction_color(&self, direction: &str) -> Color {
        match direction {
            "Long" => self.positive,
            "Short" => self.negative,
            _ => self.muted,
        }
    }

    // ── Styles ──

    pub fn base(&self) -> Style {
        Style::default().fg(self.text_primary).bg(self.background)
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn accent_bold(&self) -> Style {
        self.accent().add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn negative(&self) -> Style {
        Style::default().fg(self.negative)
    }

    pub fn pnl(&self, value: f64) -> Style {
        Style::default().fg(self.pnl_color(value))
    }

    pub fn selected(&self) -> Style {
        self.accent().add_modifier(Modifier::REVERSED)
    }

    pub fn panel_border(&self, active: bool) -> Style {
        if active {
            self.accent()
        } else {
            self.muted()
        }
    }

    pub fn panel_title(&self, active: bool) -> Style {
        if active {
            self.accent_bold()
        } else {
            self.muted()
        }
    }
}
