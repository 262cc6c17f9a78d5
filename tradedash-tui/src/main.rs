//! TradeDash TUI: five-panel terminal dashboard over a trading history CSV.
//!
//! Panels:
//! 1. Overview: statistics and per-coin PnL
//! 2. Positions: sorted list, revealed in chunks as you scroll
//! 3. Filters: year / month / coin / leverage / direction and sort order
//! 4. Vault: account value, APR and open positions from the info endpoint
//! 5. Help: keyboard shortcuts
//!
//! Configuration is read from `<config dir>/tradedash/config.toml` (or the
//! path given as the first argument) and logs go to `tui.log` next to it.

mod app;
mod input;
mod persistence;
mod theme;
mod ui;
mod worker;

use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};

use tradedash_core::{Dashboard, DashboardError};
use tradedash_runner::{load_rows, DashboardConfig};

use crate::app::AppState;
use crate::worker::{WorkerCommand, WorkerResponse};

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Paths
    let app_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tradedash");
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| app_dir.join("config.toml"));
    let state_path = app_dir.join("state.json");

    let config = load_config(&config_path)?;
    if let Err(e) = config.logging.init_to_file(&app_dir.join("tui.log")) {
        eprintln!("warning: file logging disabled: {e}");
    }

    // Data
    let (dashboard, data_source, load_note) = build_dashboard(&config);

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle = worker::spawn_worker(config.vault.clone(), cmd_rx, resp_tx)
        .context("failed to spawn worker thread")?;

    // Build app state
    let mut app = AppState::new(dashboard, cmd_tx.clone(), resp_rx);
    app.data_source = data_source;
    app.set_sort(config.default_sort());
    persistence::apply(&mut app, persistence::load(&state_path));
    match load_note {
        Some(note) => app.set_warning(note),
        None => {
            let summary = app.dashboard.summary();
            app.set_status(summary);
        }
    }
    app.request_vault_refresh();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the main event loop
    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    if let Err(e) = persistence::save(&state_path, &persistence::extract(&app)) {
        warn!(error = %e, "failed to save UI state");
    }

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// A missing config file means defaults; an unreadable or invalid one is fatal.
fn load_config(path: &Path) -> Result<DashboardConfig> {
    if !path.exists() {
        return Ok(DashboardConfig::default());
    }
    let config = DashboardConfig::from_file(path)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Load the store, falling back to an empty dashboard with a note for the
/// status bar when no usable data exists.
fn build_dashboard(config: &DashboardConfig) -> (Dashboard, Option<PathBuf>, Option<String>) {
    let page_size = config.view.page_size;
    let loaded = match load_rows(&config.data.candidates) {
        Ok(loaded) => loaded,
        Err(e) => {
            warn!(error = %e, "no trading data");
            return (Dashboard::new(page_size), None, Some(e.to_string()));
        }
    };
    match Dashboard::load(&loaded.rows, page_size) {
        Ok(dashboard) => {
            info!(
                source = %loaded.source.display(),
                positions = dashboard.store().len(),
                "dashboard ready"
            );
            (dashboard, Some(loaded.source), None)
        }
        Err(DashboardError::NoData { raw_rows, rejected }) => {
            let note = format!(
                "{}: {raw_rows} rows, {rejected} rejected, none usable",
                loaded.source.display()
            );
            warn!("{note}");
            (Dashboard::new(page_size), Some(loaded.source), Some(note))
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Size the lazy list to the terminal, then render
        let size = terminal.size()?;
        app.set_viewport_rows(ui::positions_viewport(size.height));
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            handle_worker_response(app, resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}

fn handle_worker_response(app: &mut AppState, resp: WorkerResponse) {
    match resp {
        WorkerResponse::Vault(result) => app.apply_vault_result(result),
    }
}
