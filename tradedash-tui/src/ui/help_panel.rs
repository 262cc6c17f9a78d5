//! Panel 5 (Help): keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme::Theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = app.theme();
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, &theme, "Global");
    key(&mut lines, &theme, "1-5", "Switch to panel by number");
    key(&mut lines, &theme, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, &theme, "s / S", "Next / previous sort order");
    key(&mut lines, &theme, "x", "Remove the last active filter");
    key(&mut lines, &theme, "R", "Reset all filters");
    key(&mut lines, &theme, "r", "Refresh vault data");
    key(&mut lines, &theme, "t", "Toggle dark / light theme");
    key(&mut lines, &theme, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, &theme, "Positions");
    key(&mut lines, &theme, "j / k", "Move down / up; more rows load at the end");
    key(&mut lines, &theme, "PgDn / PgUp", "Jump ten rows");
    key(&mut lines, &theme, "g", "Back to the top");
    lines.push(Line::from(""));

    section(&mut lines, &theme, "Filters");
    key(&mut lines, &theme, "j / k", "Select a filter or the sort row");
    key(&mut lines, &theme, "h / l", "Cycle through All and the available values");
    key(&mut lines, &theme, "x", "Remove the selected filter");
    lines.push(Line::from(""));

    section(&mut lines, &theme, "Statistics");
    key(
        &mut lines,
        &theme,
        "",
        "With no filter set, totals cover every loaded position.",
    );

    if !app.error_history.is_empty() {
        lines.push(Line::from(""));
        section(&mut lines, &theme, "Recent errors");
        for record in app.error_history.iter().take(5) {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {} ", record.timestamp.format("%H:%M:%S")),
                    theme.muted(),
                ),
                Span::styled(format!("[{}] ", record.context), theme.warning()),
                Span::styled(record.message.clone(), theme.negative()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn section(lines: &mut Vec<Line<'_>>, theme: &Theme, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme.accent_bold())));
}

fn key(lines: &mut Vec<Line<'_>>, theme: &Theme, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {keys:>16}  "), theme.accent()),
        Span::styled(desc.to_string(), theme.muted()),
    ]));
}
