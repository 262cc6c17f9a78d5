//! Panel 3 (Filters): one selector per field plus the sort order.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use tradedash_core::domain::month_name;
use tradedash_core::domain::FilterKey;

use crate::app::{AppState, FilterRow};

const PREVIEW_LIMIT: usize = 12;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = app.theme();
    let d = &app.dashboard;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        "[j/k]select [h/l]change [x]remove [R]reset all",
        theme.muted(),
    )));
    lines.push(Line::from(""));

    let focused = app.filter_row();
    for row in FilterRow::ALL {
        let is_cursor = row == focused;
        let (value, is_set) = match row {
            FilterRow::Filter(key) => (app.filter_display(key), d.filters().is_set(key)),
            FilterRow::Sort => (d.sort().label().to_string(), true),
        };
        let label_style = if is_cursor { theme.selected() } else { theme.text() };
        let value_style = if is_cursor {
            theme.selected()
        } else if is_set {
            theme.accent()
        } else {
            theme.muted()
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<10} ", row.label()), label_style),
            Span::styled(format!(" ◂ {value} ▸ "), value_style),
        ]));
    }
    lines.push(Line::from(""));

    // Options for the focused selector
    if let FilterRow::Filter(key) = focused {
        let options = app.filter_options(key);
        let shown: Vec<String> = options
            .iter()
            .take(PREVIEW_LIMIT)
            .map(|o| option_label(key, o))
            .collect();
        let text = if options.is_empty() {
            match key {
                FilterKey::Month => "Choose a year first".to_string(),
                _ => "No values in the data".to_string(),
            }
        } else if options.len() > PREVIEW_LIMIT {
            format!("All, {}, … ({} total)", shown.join(", "), options.len())
        } else {
            format!("All, {}", shown.join(", "))
        };
        lines.push(Line::from(vec![
            Span::styled("Options: ", theme.accent_bold()),
            Span::styled(text, theme.muted()),
        ]));
        lines.push(Line::from(""));
    }

    // Active filter chips
    let active = d.filters().active();
    if active.is_empty() {
        lines.push(Line::from(Span::styled("No active filters", theme.muted())));
    } else {
        let mut spans = vec![Span::styled("Active: ", theme.accent_bold())];
        for (key, value) in active {
            spans.push(Span::styled(
                format!("[{}: {} ×] ", key.label(), value),
                theme.accent(),
            ));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(Span::styled(d.summary(), theme.muted())));

    f.render_widget(Paragraph::new(lines), area);
}

fn option_label(key: FilterKey, option: &str) -> String {
    match (key, option.parse::<u32>()) {
        (FilterKey::Month, Ok(m)) => month_name(m).to_string(),
        _ => option.to_string(),
    }
}
