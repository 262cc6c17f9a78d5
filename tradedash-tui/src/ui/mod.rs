//! Top-level UI layout: one panel at a time with a status bar.

pub mod filters_panel;
pub mod help_panel;
pub mod overview_panel;
pub mod positions_panel;
pub mod status_bar;
pub mod vault_panel;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::app::{AppState, Panel};

/// Rows above the positions list: top border, two header lines, a blank, column titles.
pub const POSITIONS_CHROME_ROWS: u16 = 5;

pub fn draw(f: &mut Frame, app: &AppState) {
    let theme = app.theme();
    f.render_widget(Block::default().style(theme.base()), f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    draw_panel(f, chunks[0], app);
    status_bar::render(f, chunks[1], app);
}

fn draw_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = app.theme();
    let panel = app.active_panel;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border(true))
        .title(format!(" {} [{}] ", panel.label(), panel.index() + 1))
        .title_style(theme.panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match panel {
        Panel::Overview => overview_panel::render(f, inner, app),
        Panel::Positions => positions_panel::render(f, inner, app),
        Panel::Filters => filters_panel::render(f, inner, app),
        Panel::Vault => vault_panel::render(f, inner, app),
        Panel::Help => help_panel::render(f, inner, app),
    }
}

/// Lines the positions list gets in a terminal of `height` rows.
pub fn positions_viewport(height: u16) -> usize {
    // status bar + panel chrome + bottom border + footer
    height.saturating_sub(1 + POSITIONS_CHROME_ROWS + 2) as usize
}

/// Cut `s` to `max` characters, marking the cut with a trailing dot.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}.")
    }
}

/// Two-decimal money with thousands separators, `-` when unknown.
pub fn money(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => group_thousands(v),
        _ => "-".to_string(),
    }
}

pub fn group_thousands(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int, frac) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}
