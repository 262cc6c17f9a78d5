//! Panel 2 (Positions): the sorted list, revealed one chunk at a time.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use tradedash_core::ViewMode;

use crate::app::{scroll_start, AppState};
use crate::ui::{money, truncate};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = app.theme();
    let d = &app.dashboard;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(format!("Sort: {} | ", d.sort().label()), theme.muted()),
        Span::styled(d.summary(), theme.accent()),
    ]));
    lines.push(Line::from(Span::styled(
        "[j/k]move [PgUp/PgDn]jump [g]top [s]ort [x]remove filter",
        theme.muted(),
    )));
    lines.push(Line::from(""));

    match d.mode() {
        ViewMode::NoData => {
            lines.push(Line::from(Span::styled("No trading data loaded.", theme.warning())));
            f.render_widget(Paragraph::new(lines), area);
            return;
        }
        ViewMode::NoMatches => {
            lines.push(Line::from(Span::styled(
                "No positions match the active filters.",
                theme.warning(),
            )));
            f.render_widget(Paragraph::new(lines), area);
            return;
        }
        ViewMode::Loaded => {}
    }

    lines.push(Line::from(Span::styled(
        format!(
            "{:<25} {:<8} {:<6} {:>5} {:>12} {:>10} {:>10} {:>12} {:<12}",
            "Date range", "Coin", "Side", "Lev", "Margin", "Fee", "Funding", "PnL", "Duration"
        ),
        theme.accent_bold(),
    )));

    let revealed = d.revealed();
    let rows = (area.height as usize).saturating_sub(lines.len() + 1);
    let start = scroll_start(app.positions.cursor, rows);
    let end = (start + rows).min(revealed.len());

    for (i, p) in revealed.iter().enumerate().take(end).skip(start) {
        let is_cursor = i == app.positions.cursor;
        let style = if is_cursor { theme.selected() } else { theme.text() };
        let side_style = if is_cursor {
            style
        } else {
            ratatui::style::Style::default().fg(theme.direction_color(&p.direction))
        };
        let pnl_style = if is_cursor {
            style
        } else {
            theme.pnl(p.pnl_or_zero())
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{:<25} ", truncate(&p.date_range, 25)), style),
            Span::styled(format!("{:<8} ", truncate(&p.coin, 8)), style),
            Span::styled(format!("{:<6} ", truncate(&p.direction, 6)), side_style),
            Span::styled(
                format!("{:>5} ", truncate(p.leverage.as_deref().unwrap_or("-"), 5)),
                style,
            ),
            Span::styled(format!("{:>12} ", money(p.margin)), style),
            Span::styled(format!("{:>10} ", money(p.fee)), style),
            Span::styled(format!("{:>10} ", money(p.funding)), style),
            Span::styled(format!("{:>12} ", money(p.pnl)), pnl_style),
            Span::styled(truncate(&p.duration, 12), style),
        ]));
    }

    let footer = if d.has_more() {
        format!(
            "Showing {} of {}, scroll down to load more",
            revealed.len(),
            d.sorted().len()
        )
    } else {
        format!("All {} positions shown", revealed.len())
    };
    lines.push(Line::from(Span::styled(footer, theme.muted())));

    f.render_widget(Paragraph::new(lines), area);
}
