//! Panel 1 (Overview): headline statistics and per-coin PnL bars.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use tradedash_core::ViewMode;

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::{group_thousands, truncate};

const BAR_WIDTH: usize = 30;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = app.theme();
    let d = &app.dashboard;
    let mut lines: Vec<Line> = Vec::new();

    if d.mode() == ViewMode::NoData {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "No trading data loaded.",
            theme.warning(),
        )));
        lines.push(Line::from(Span::styled(
            "Place trading_data.csv in the working directory or data/, or list it under [data] candidates in the config.",
            theme.muted(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    lines.push(Line::from(Span::styled(d.summary(), theme.muted())));
    lines.push(Line::from(""));

    // ── Stats ──
    let s = d.stats();
    lines.push(Line::from(Span::styled(
        format!("Statistics over {} ({} of {})", s.scope.label(), s.count, s.total_count),
        theme.accent_bold(),
    )));
    stat(&mut lines, &theme, "Total PnL", s.total_pnl);
    stat(&mut lines, &theme, "Gross PnL", s.gross_pnl);
    stat(&mut lines, &theme, "Fees", s.total_fees);
    stat(&mut lines, &theme, "Funding", s.total_funding);
    lines.push(Line::from(vec![
        Span::styled(format!("  {:<12}", "Margin"), theme.muted()),
        Span::styled(group_thousands(s.total_margin), theme.text()),
    ]));
    lines.push(Line::from(vec![
        Span::styled(format!("  {:<12}", "Wins"), theme.muted()),
        Span::styled(
            format!("{} / {} ({:.1}%)", s.wins, s.count, s.win_rate()),
            theme.text(),
        ),
    ]));
    lines.push(Line::from(""));

    if d.mode() == ViewMode::NoMatches {
        lines.push(Line::from(Span::styled(
            "No positions match the active filters. [x] remove one, [R] reset.",
            theme.warning(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    // ── Per-coin breakdown ──
    let breakdown = d.breakdown();
    lines.push(Line::from(Span::styled("PnL by coin", theme.accent_bold())));
    let max = breakdown.max_abs_pnl();
    let room = (area.height as usize).saturating_sub(lines.len() + 2);
    for row in breakdown.rows.iter().take(room) {
        let width = if max > 0.0 {
            ((row.pnl.abs() / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<8} ", truncate(&row.coin, 8)), theme.text()),
            Span::styled(format!("{:<BAR_WIDTH$} ", "█".repeat(width)), theme.pnl(row.pnl)),
            Span::styled(format!("{:>14} ", group_thousands(row.pnl)), theme.pnl(row.pnl)),
            Span::styled(
                format!("{}/{} wins ({:.0}%)", row.wins, row.total, row.win_rate()),
                theme.muted(),
            ),
        ]));
    }
    if breakdown.rows.len() > room {
        lines.push(Line::from(Span::styled(
            format!("  … {} more coins", breakdown.rows.len() - room),
            theme.muted(),
        )));
    }

    let report = d.ingest_report();
    if report.rejected > 0 || report.duplicates > 0 {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(
                "{} rows read, {} rejected, {} duplicates dropped",
                report.raw_rows, report.rejected, report.duplicates
            ),
            theme.muted(),
        )));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn stat(lines: &mut Vec<Line<'_>>, theme: &Theme, label: &str, value: f64) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {label:<12}"), theme.muted()),
        Span::styled(group_thousands(value), theme.pnl(value)),
    ]));
}
