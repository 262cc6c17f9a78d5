//! TradeDash CLI: summary, positions, facets, export and vault commands.
//!
//! Commands:
//! - `summary`: statistics and per-coin breakdown for the current filters
//! - `positions`: one page of the sorted position list
//! - `facets`: the options each filter accepts
//! - `export`: write positions.csv, view.json and report.md
//! - `vault`: fetch the vault snapshot once

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tradedash_core::domain::{month_name, FilterState};
use tradedash_core::sort::SortMode;
use tradedash_core::{Dashboard, DashboardError, RevealOutcome, ViewMode};
use tradedash_runner::data_loader::load_rows;
use tradedash_runner::{save_report_bundle, DashboardConfig, VaultClient, VaultSnapshot};

#[derive(Parser)]
#[command(
    name = "tradedash",
    about = "TradeDash CLI: trading history statistics, filters and exports"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// CSV file to load instead of the configured candidates.
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    #[command(flatten)]
    view: ViewArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Filter and sort flags shared by every data command.
#[derive(Args)]
struct ViewArgs {
    /// Keep positions opened in this year.
    #[arg(long, global = true)]
    year: Option<i32>,

    /// Keep positions opened in this month (1-12).
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Keep positions in this coin (exact match).
    #[arg(long, global = true)]
    coin: Option<String>,

    /// Keep positions with this leverage label, e.g. 10x.
    #[arg(long, global = true)]
    leverage: Option<String>,

    /// Keep positions with this direction, e.g. Long.
    #[arg(long, global = true)]
    direction: Option<String>,

    /// Sort mode: date-asc, date-desc, pnl-asc, pnl-desc, coin-asc, coin-desc,
    /// direction-short-first, direction-long-first. Defaults to the config.
    #[arg(long, global = true)]
    sort: Option<String>,
}

impl ViewArgs {
    fn filters(&self) -> FilterState {
        FilterState {
            year: self.year,
            month: self.month,
            crypto: self.coin.clone(),
            leverage: self.leverage.clone(),
            direction: self.direction.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print statistics and the per-coin breakdown.
    Summary,
    /// Print one page of positions.
    Positions {
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page. Defaults to the config.
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// List the available filter options.
    Facets,
    /// Write the report bundle for the current view.
    Export {
        /// Output directory.
        #[arg(long, default_value = "reports")]
        out: PathBuf,
    },
    /// Fetch and print the vault snapshot.
    Vault,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path)?,
        None => DashboardConfig::default(),
    };
    config.logging.init();

    match &cli.command {
        Commands::Summary => run_summary(&cli, &config),
        Commands::Positions { page, page_size } => {
            run_positions(&cli, &config, *page, page_size.unwrap_or(config.view.page_size))
        }
        Commands::Facets => run_facets(&cli, &config),
        Commands::Export { out } => run_export(&cli, &config, out),
        Commands::Vault => run_vault(&config),
    }
}

/// Load rows, build the dashboard, and apply the command-line view.
fn build_dashboard(cli: &Cli, config: &DashboardConfig, page_size: usize) -> Result<Dashboard> {
    let candidates = match &cli.csv {
        Some(path) => vec![path.clone()],
        None => config.data.candidates.clone(),
    };
    let loaded = load_rows(&candidates)?;
    info!(source = %loaded.source.display(), "using trading data");

    let mut dashboard = match Dashboard::load(&loaded.rows, page_size) {
        Ok(d) => d,
        Err(DashboardError::NoData { raw_rows, rejected }) => bail!(
            "no data: {} has {raw_rows} rows, {rejected} rejected, none usable",
            loaded.source.display()
        ),
    };

    let sort = match &cli.view.sort {
        Some(key) => {
            let mode = SortMode::parse(key);
            if mode == SortMode::Unsorted && key != "unsorted" {
                bail!("unknown sort '{key}'");
            }
            mode
        }
        None => config.default_sort(),
    };
    dashboard.set_sort(sort);
    dashboard.set_filters(cli.view.filters());
    Ok(dashboard)
}

fn run_summary(cli: &Cli, config: &DashboardConfig) -> Result<()> {
    let dashboard = build_dashboard(cli, config, config.view.page_size)?;
    print_summary(&dashboard);
    Ok(())
}

fn run_positions(cli: &Cli, config: &DashboardConfig, page: usize, page_size: usize) -> Result<()> {
    if page == 0 {
        bail!("--page is 1-based");
    }
    let mut dashboard = build_dashboard(cli, config, page_size)?;
    if dashboard.mode() != ViewMode::Loaded {
        println!("{}", dashboard.summary());
        return Ok(());
    }

    // The first page is revealed by the refresh; each further page is one trigger.
    let mut start = 0;
    let mut end = dashboard.revealed().len();
    for _ in 1..page {
        let Some(trigger) = dashboard.trigger() else {
            bail!(
                "page {page} is past the end ({} positions, {} per page)",
                dashboard.sorted().len(),
                dashboard.page_size()
            );
        };
        match dashboard.reveal(&trigger) {
            RevealOutcome::Revealed { start: s, end: e } => {
                start = s;
                end = e;
            }
            RevealOutcome::Stale | RevealOutcome::Exhausted => break,
        }
    }

    println!("{}", dashboard.summary());
    println!("Sort: {}", dashboard.sort().label());
    println!();
    println!(
        "{:<25} {:<8} {:<6} {:>6} {:>12} {:>10} {:>12}  {}",
        "Date range", "Coin", "Dir", "Lev", "Margin", "Fee", "PnL", "Duration"
    );
    for r in &dashboard.revealed()[start..end] {
        println!(
            "{:<25} {:<8} {:<6} {:>6} {:>12} {:>10} {:>12}  {}",
            r.date_range,
            r.coin,
            r.direction,
            r.leverage.as_deref().unwrap_or("-"),
            fmt_opt(r.margin),
            fmt_opt(r.fee),
            fmt_opt(r.pnl),
            r.duration
        );
    }
    println!();
    println!(
        "Page {page}: rows {}-{} of {}{}",
        start + 1,
        end,
        dashboard.sorted().len(),
        if dashboard.has_more() { " (more available)" } else { "" }
    );
    Ok(())
}

fn run_facets(cli: &Cli, config: &DashboardConfig) -> Result<()> {
    let dashboard = build_dashboard(cli, config, config.view.page_size)?;
    let facets = dashboard.facets();

    let join = |items: Vec<String>| {
        if items.is_empty() {
            "-".to_string()
        } else {
            items.join(", ")
        }
    };

    println!();
    println!("=== Filter Options ===");
    println!(
        "Years:      {}",
        join(facets.years.iter().map(|y| y.to_string()).collect())
    );
    if let Some(year) = dashboard.filters().year {
        println!(
            "Months {year}: {}",
            join(
                dashboard
                    .month_options()
                    .into_iter()
                    .map(|m| format!("{m} ({})", month_name(m)))
                    .collect()
            )
        );
    }
    println!("Coins:      {}", join(facets.coins.clone()));
    println!("Leverages:  {}", join(facets.leverages.clone()));
    println!("Directions: {}", join(facets.directions.clone()));
    println!(
        "Sorts:      {}",
        join(SortMode::ALL.iter().map(|m| m.as_str().to_string()).collect())
    );
    println!();
    Ok(())
}

fn run_export(cli: &Cli, config: &DashboardConfig, out: &Path) -> Result<()> {
    let dashboard = build_dashboard(cli, config, config.view.page_size)?;
    let dir = save_report_bundle(&dashboard.view(), out)
        .with_context(|| format!("failed to export into {}", out.display()))?;
    println!("{}", dashboard.summary());
    println!("Report saved to: {}", dir.display());
    Ok(())
}

fn run_vault(config: &DashboardConfig) -> Result<()> {
    let client = VaultClient::new(&config.vault)?;
    let snapshot = client.fetch().context("vault refresh failed")?;
    print_vault(&config.vault.address, &snapshot);
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".into())
}

fn print_summary(dashboard: &Dashboard) {
    let s = dashboard.stats();
    let report = dashboard.ingest_report();
    println!();
    println!("=== Trading Summary ===");
    println!("{}", dashboard.summary());
    println!(
        "Scope:          {} ({} of {})",
        s.scope.label(),
        s.count,
        s.total_count
    );
    println!();
    println!("--- Performance ---");
    println!("Total PnL:      {:.2}", s.total_pnl);
    println!("Gross PnL:      {:.2}", s.gross_pnl);
    println!("Fees:           {:.2}", s.total_fees);
    println!("Funding:        {:.2}", s.total_funding);
    println!("Margin:         {:.2}", s.total_margin);
    println!("Wins:           {} ({:.1}%)", s.wins, s.win_rate());

    let breakdown = dashboard.breakdown();
    if !breakdown.is_empty() {
        println!();
        println!("--- By Coin ---");
        for row in &breakdown.rows {
            println!(
                "{:<10} {:>12.2}  {:>3}/{:<3} {:>5.1}%",
                row.coin,
                row.pnl,
                row.wins,
                row.total,
                row.win_rate()
            );
        }
    }
    if report.rejected > 0 || report.duplicates > 0 {
        println!();
        println!(
            "WARNING: {} rows rejected, {} duplicates dropped",
            report.rejected, report.duplicates
        );
    }
    println!();
}

fn print_vault(address: &str, v: &VaultSnapshot) {
    println!();
    println!("=== Vault {address} ===");
    println!("Updated:        {}", v.fetched_at.format("%H:%M:%S"));
    println!("Account Value:  {:.2}", v.account_value);
    println!("APR:            {:.2}%", v.apr_pct);
    println!("All-Time PnL:   {:.2}", v.all_time_pnl);
    println!();
    println!("--- Open Positions ({}) ---", v.positions.len());
    if v.positions.is_empty() {
        println!("No open positions");
    }
    for p in &v.positions {
        println!(
            "{:<8} {:<5} size {:>12.4}  entry {:>12.4}  {:>3}x  uPnL {:>10.2}",
            p.coin,
            p.side(),
            p.abs_size(),
            p.entry_price,
            p.leverage,
            p.unrealized_pnl
        );
    }
    println!();
}
