//! Reporting and export: CSV, JSON, and Markdown snapshots of a dashboard view.
//!
//! All three formats are built from a [`DashboardView`], so an export always
//! reflects exactly the filters and sort order the user was looking at.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tradedash_core::domain::SharedRecord;
use tradedash_core::stats::StatsScope;
use tradedash_core::{DashboardView, ViewMode};

// ─── CSV export ─────────────────────────────────────────────────────

// Shortest text that parses back to the same f64, so a re-import keeps
// identity keys intact.
fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Export positions as CSV in their current order.
///
/// Columns mirror the feed: date_range, coin, direction, leverage,
/// volume_with_leverage, margin, unrealized_pnl, fee, funding, pnl, duration.
/// Unknown numbers are written as empty cells.
pub fn export_positions_csv(positions: &[SharedRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "date_range",
        "coin",
        "direction",
        "leverage",
        "volume_with_leverage",
        "margin",
        "unrealized_pnl",
        "fee",
        "funding",
        "pnl",
        "duration",
    ])?;

    for p in positions {
        wtr.write_record([
            p.date_range.as_str(),
            p.coin.as_str(),
            p.direction.as_str(),
            p.leverage.as_deref().unwrap_or(""),
            &opt(p.volume_with_leverage),
            &opt(p.margin),
            &opt(p.unrealized_pnl),
            &opt(p.fee),
            &opt(p.funding),
            &opt(p.pnl),
            p.duration.as_str(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_view_json(view: &DashboardView) -> Result<String> {
    serde_json::to_string_pretty(view).context("failed to serialize dashboard view to JSON")
}

// ─── Markdown report ────────────────────────────────────────────────

pub fn generate_report(view: &DashboardView) -> String {
    let mut md = String::with_capacity(2048);

    md.push_str("# Trading History Report\n\n");

    if view.mode == ViewMode::NoData {
        md.push_str("No trading data loaded.\n");
        return md;
    }

    // Filters
    md.push_str("## Filters\n\n");
    md.push_str(&view.summary);
    md.push_str("\n\n");
    md.push_str(&format!("Sort: {}\n\n", view.sort.label()));

    // Summary
    let s = &view.stats;
    md.push_str("## Summary\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!(
        "| Scope | {} ({} of {}) |\n",
        s.scope.label(),
        s.count,
        s.total_count
    ));
    md.push_str(&format!("| Total PnL | {:.2} |\n", s.total_pnl));
    md.push_str(&format!("| Gross PnL | {:.2} |\n", s.gross_pnl));
    md.push_str(&format!("| Fees | {:.2} |\n", s.total_fees));
    md.push_str(&format!("| Funding | {:.2} |\n", s.total_funding));
    md.push_str(&format!("| Margin | {:.2} |\n", s.total_margin));
    md.push_str(&format!(
        "| Wins | {} ({:.1}%) |\n",
        s.wins,
        s.win_rate()
    ));
    md.push('\n');

    if view.mode == ViewMode::NoMatches {
        md.push_str("No positions match the active filters.\n");
        return md;
    }

    // Per-coin table
    md.push_str("## By Coin\n\n");
    md.push_str("| Coin | PnL | Wins | Total | Win Rate |\n");
    md.push_str("| --- | ---: | ---: | ---: | ---: |\n");
    for row in &view.breakdown.rows {
        md.push_str(&format!(
            "| {} | {:.2} | {} | {} | {:.1}% |\n",
            row.coin,
            row.pnl,
            row.wins,
            row.total,
            row.win_rate()
        ));
    }
    md.push('\n');

    // Ingest
    let i = &view.ingest;
    if i.rejected > 0 || i.duplicates > 0 {
        md.push_str("## Data Quality\n\n");
        md.push_str(&format!("- {} rows read\n", i.raw_rows));
        md.push_str(&format!("- {} rejected (missing coin or date range)\n", i.rejected));
        md.push_str(&format!("- {} duplicates dropped\n", i.duplicates));
        md.push('\n');
    }

    if s.scope == StatsScope::Filtered && view.filters.is_empty() {
        md.push_str("_Statistics cover a subset of the store although no filter is set._\n");
    }

    md
}

// ─── Report bundle ──────────────────────────────────────────────────

/// Save the full export set for the current view.
///
/// Creates `report_{timestamp}/` under `output_dir` containing
/// `positions.csv`, `view.json` and `report.md`, and returns its path.
pub fn save_report_bundle(view: &DashboardView, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!("report_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let dir = output_dir.join(dirname);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create report dir: {}", dir.display()))?;

    let csv = export_positions_csv(&view.positions)?;
    std::fs::write(dir.join("positions.csv"), csv)
        .with_context(|| format!("failed to write {}", dir.join("positions.csv").display()))?;

    let json = export_view_json(view)?;
    std::fs::write(dir.join("view.json"), json)
        .with_context(|| format!("failed to write {}", dir.join("view.json").display()))?;

    std::fs::write(dir.join("report.md"), generate_report(view))
        .with_context(|| format!("failed to write {}", dir.join("report.md").display()))?;

    Ok(dir)
}
