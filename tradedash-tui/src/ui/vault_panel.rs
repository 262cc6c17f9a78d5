//! Panel 4 (Vault): account summary and open positions from the info endpoint.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::ui::{group_thousands, truncate};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = app.theme();
    let v = &app.vault;
    let mut lines: Vec<Line> = Vec::new();

    let state = if v.loading {
        Span::styled("refreshing…", theme.warning())
    } else {
        Span::styled("[r]efresh", theme.muted())
    };
    lines.push(Line::from(state));
    lines.push(Line::from(""));

    if let Some(err) = &v.last_error {
        lines.push(Line::from(Span::styled(
            format!("Last refresh failed: {err}"),
            theme.negative(),
        )));
        lines.push(Line::from(""));
    }

    let Some(s) = &v.snapshot else {
        if !v.loading && v.last_error.is_none() {
            lines.push(Line::from(Span::styled(
                "No vault data yet. Press r to fetch.",
                theme.muted(),
            )));
        }
        f.render_widget(Paragraph::new(lines), area);
        return;
    };

    lines.push(Line::from(vec![
        Span::styled(format!("  {:<16}", "Account value"), theme.muted()),
        Span::styled(format!("${}", group_thousands(s.account_value)), theme.text()),
    ]));
    lines.push(Line::from(vec![
        Span::styled(format!("  {:<16}", "APR"), theme.muted()),
        Span::styled(format!("{:.2}%", s.apr_pct), theme.pnl(s.apr_pct)),
    ]));
    lines.push(Line::from(vec![
        Span::styled(format!("  {:<16}", "All-time PnL"), theme.muted()),
        Span::styled(
            format!("${}", group_thousands(s.all_time_pnl)),
            theme.pnl(s.all_time_pnl),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled(format!("  {:<16}", "Updated"), theme.muted()),
        Span::styled(s.fetched_at.format("%Y-%m-%d %H:%M:%S").to_string(), theme.text()),
    ]));
    lines.push(Line::from(""));

    if s.positions.is_empty() {
        lines.push(Line::from(Span::styled("No open positions", theme.muted())));
    } else {
        lines.push(Line::from(Span::styled(
            format!(
                "{:<8} {:<6} {:>14} {:>14} {:>6} {:>14}",
                "Coin", "Side", "Size", "Entry", "Lev", "uPnL"
            ),
            theme.accent_bold(),
        )));
        for p in &s.positions {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<8} ", truncate(&p.coin, 8)), theme.text()),
                Span::styled(
                    format!("{:<6} ", p.side()),
                    Style::default().fg(theme.direction_color(p.side())),
                ),
                Span::styled(format!("{:>14.4} ", p.abs_size()), theme.text()),
                Span::styled(format!("{:>14} ", group_thousands(p.entry_price)), theme.text()),
                Span::styled(format!("{:>5}x ", truncate(&p.leverage, 5)), theme.text()),
                Span::styled(
                    format!("{:>14}", group_thousands(p.unrealized_pnl)),
                    theme.pnl(p.unrealized_pnl),
                ),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), area);
}
