//! Application state: single-owner, main-thread only.
//!
//! The [`Dashboard`] is the only source of truth for records, filters and
//! derived views; this module adds cursors, panel focus and status lines on
//! top of it. The worker thread communicates via channels.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};

use chrono::NaiveDateTime;

use tradedash_core::domain::{month_name, FilterKey};
use tradedash_core::sort::SortMode;
use tradedash_core::{Dashboard, RevealOutcome, ViewMode};
use tradedash_runner::VaultSnapshot;

use crate::theme::{Theme, ThemeName};
use crate::worker::{WorkerCommand, WorkerResponse};

const ERROR_HISTORY_CAP: usize = 50;

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Overview,
    Positions,
    Filters,
    Vault,
    Help,
}

impl Panel {
    pub const COUNT: usize = 5;

    pub fn index(self) -> usize {
        match self {
            Panel::Overview => 0,
            Panel::Positions => 1,
            Panel::Filters => 2,
            Panel::Vault => 3,
            Panel::Help => 4,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Overview),
            1 => Some(Panel::Positions),
            2 => Some(Panel::Filters),
            3 => Some(Panel::Vault),
            4 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Overview => "Overview",
            Panel::Positions => "Positions",
            Panel::Filters => "Filters",
            Panel::Vault => "Vault",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % Self::COUNT).unwrap_or(Panel::Overview)
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + Self::COUNT - 1) % Self::COUNT)
            .unwrap_or(Panel::Overview)
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An entry in the error history.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub message: String,
    pub context: String,
}

/// One selectable row of the Filters panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRow {
    Filter(FilterKey),
    Sort,
}

impl FilterRow {
    pub const ALL: [FilterRow; 6] = [
        FilterRow::Filter(FilterKey::Year),
        FilterRow::Filter(FilterKey::Month),
        FilterRow::Filter(FilterKey::Crypto),
        FilterRow::Filter(FilterKey::Leverage),
        FilterRow::Filter(FilterKey::Direction),
        FilterRow::Sort,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterRow::Filter(key) => key.label(),
            FilterRow::Sort => "Sort",
        }
    }
}

/// Positions panel state.
#[derive(Debug, Clone, Default)]
pub struct PositionsState {
    /// Index into the revealed rows.
    pub cursor: usize,
}

/// Vault panel state.
#[derive(Debug, Clone, Default)]
pub struct VaultPanelState {
    pub snapshot: Option<VaultSnapshot>,
    pub loading: bool,
    pub last_error: Option<String>,
}

/// First row shown when `cursor` must stay inside a window of `rows` lines.
pub fn scroll_start(cursor: usize, rows: usize) -> usize {
    let rows = rows.max(1);
    if cursor >= rows {
        cursor + 1 - rows
    } else {
        0
    }
}

/// Step through `len` slots, wrapping at both ends.
pub fn cycle_index(current: usize, len: usize, step: isize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as isize;
    ((current as isize + step).rem_euclid(len)) as usize
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,

    // Data
    pub dashboard: Dashboard,
    pub data_source: Option<PathBuf>,

    // Panel states
    pub positions: PositionsState,
    pub filter_cursor: usize,
    pub vault: VaultPanelState,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub theme_name: ThemeName,
    /// Lines available to the positions list, updated from the terminal size.
    pub viewport_rows: usize,
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
}

impl AppState {
    pub fn new(
        dashboard: Dashboard,
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
    ) -> Self {
        Self {
            active_panel: Panel::Overview,
            running: true,
            dashboard,
            data_source: None,
            positions: PositionsState::default(),
            filter_cursor: 0,
            vault: VaultPanelState::default(),
            worker_tx,
            worker_rx,
            theme_name: ThemeName::default(),
            viewport_rows: 20,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme_name.theme()
    }

    pub fn toggle_theme(&mut self) {
        self.theme_name = self.theme_name.toggle();
        self.set_status(format!("Theme: {}", self.theme_name.label()));
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    // ─── Filters ────────────────────────────────────────────────────

    pub fn filter_row(&self) -> FilterRow {
        FilterRow::ALL[self.filter_cursor.min(FilterRow::ALL.len() - 1)]
    }

    /// Option values for one selector, in display order. Months are only
    /// offered once a year is chosen.
    pub fn filter_options(&self, key: FilterKey) -> Vec<String> {
        let facets = self.dashboard.facets();
        match key {
            FilterKey::Year => facets.years.iter().map(|y| y.to_string()).collect(),
            FilterKey::Month => self
                .dashboard
                .month_options()
                .iter()
                .map(|m| m.to_string())
                .collect(),
            FilterKey::Crypto => facets.coins.clone(),
            FilterKey::Leverage => facets.leverages.clone(),
            FilterKey::Direction => facets.directions.clone(),
        }
    }

    /// The selected value in the same form as [`Self::filter_options`].
    pub fn filter_value(&self, key: FilterKey) -> Option<String> {
        let f = self.dashboard.filters();
        match key {
            FilterKey::Year => f.year.map(|y| y.to_string()),
            FilterKey::Month => f.month.map(|m| m.to_string()),
            FilterKey::Crypto => f.crypto.clone(),
            FilterKey::Leverage => f.leverage.clone(),
            FilterKey::Direction => f.direction.clone(),
        }
    }

    /// Human-readable value, `All` when unset.
    pub fn filter_display(&self, key: FilterKey) -> String {
        match (key, self.dashboard.filters().month) {
            (FilterKey::Month, Some(m)) => month_name(m).to_string(),
            _ => self.filter_value(key).unwrap_or_else(|| "All".into()),
        }
    }

    /// Move one selector through `All` followed by its options.
    pub fn cycle_filter(&mut self, key: FilterKey, step: isize) {
        let options = self.filter_options(key);
        if options.is_empty() {
            match key {
                FilterKey::Month => self.set_warning("Choose a year first"),
                _ => self.set_warning(format!("No {} values in the data", key.label())),
            }
            return;
        }
        let current = self
            .filter_value(key)
            .and_then(|v| options.iter().position(|o| *o == v))
            .map(|i| i + 1)
            .unwrap_or(0);
        let next = cycle_index(current, options.len() + 1, step);
        let value = next.checked_sub(1).map(|i| options[i].clone());

        match key {
            FilterKey::Year => self
                .dashboard
                .set_year(value.and_then(|v| v.parse::<i32>().ok())),
            FilterKey::Month => self
                .dashboard
                .set_month(value.and_then(|v| v.parse::<u32>().ok())),
            FilterKey::Crypto => self.dashboard.set_crypto(value),
            FilterKey::Leverage => self.dashboard.set_leverage(value),
            FilterKey::Direction => self.dashboard.set_direction(value),
        }
        self.after_view_change();
    }

    pub fn remove_filter(&mut self, key: FilterKey) {
        if !self.dashboard.filters().is_set(key) {
            self.set_warning(format!("{} filter is not set", key.label()));
            return;
        }
        self.dashboard.remove_filter(key);
        self.after_view_change();
    }

    /// On the Filters panel the focused selector; elsewhere the last active
    /// filter in display order.
    pub fn remove_focused_filter(&mut self) {
        let key = match (self.active_panel, self.filter_row()) {
            (Panel::Filters, FilterRow::Filter(key)) => Some(key),
            _ => self
                .dashboard
                .filters()
                .active()
                .last()
                .map(|(key, _)| *key),
        };
        match key {
            Some(key) => self.remove_filter(key),
            None => self.set_warning("No active filters"),
        }
    }

    pub fn reset_filters(&mut self) {
        self.dashboard.reset_filters();
        self.after_view_change();
    }

    pub fn cycle_sort(&mut self, step: isize) {
        let current = self.dashboard.sort();
        let next = if step >= 0 { current.next() } else { current.prev() };
        self.dashboard.set_sort(next);
        self.positions.cursor = 0;
        self.fill_viewport();
        self.set_status(format!("Sort: {}", next.label()));
    }

    pub fn set_sort(&mut self, mode: SortMode) {
        self.dashboard.set_sort(mode);
        self.positions.cursor = 0;
        self.fill_viewport();
    }

    fn after_view_change(&mut self) {
        self.positions.cursor = 0;
        self.fill_viewport();
        let summary = self.dashboard.summary();
        match self.dashboard.mode() {
            ViewMode::NoMatches => self.set_warning(summary),
            _ => self.set_status(summary),
        }
    }

    // ─── Lazy list ──────────────────────────────────────────────────

    /// Fire the live trigger once. Returns whether rows were added.
    pub fn reveal_next(&mut self) -> bool {
        let Some(trigger) = self.dashboard.trigger() else {
            return false;
        };
        matches!(
            self.dashboard.reveal(&trigger),
            RevealOutcome::Revealed { .. }
        )
    }

    /// Reveal chunks while the bottom of the visible window reaches past the
    /// revealed rows.
    pub fn fill_viewport(&mut self) {
        let rows = self.viewport_rows.max(1);
        let window_end = scroll_start(self.positions.cursor, rows) + rows;
        while self.dashboard.revealed().len() < window_end {
            if !self.reveal_next() {
                break;
            }
        }
    }

    pub fn set_viewport_rows(&mut self, rows: usize) {
        self.viewport_rows = rows.max(1);
        self.fill_viewport();
    }

    pub fn move_position(&mut self, delta: isize) {
        let target = self.positions.cursor as isize + delta;
        let target = target.max(0) as usize;
        while target >= self.dashboard.revealed().len() {
            if !self.reveal_next() {
                break;
            }
        }
        let len = self.dashboard.revealed().len();
        self.positions.cursor = target.min(len.saturating_sub(1));
        self.fill_viewport();
    }

    // ─── Vault ──────────────────────────────────────────────────────

    pub fn request_vault_refresh(&mut self) {
        if self.vault.loading {
            self.set_warning("Vault refresh already in progress");
            return;
        }
        if self.worker_tx.send(WorkerCommand::RefreshVault).is_err() {
            self.push_error("Worker is not running".into(), "vault refresh".into());
            return;
        }
        self.vault.loading = true;
        self.set_status("Refreshing vault...");
    }

    pub fn apply_vault_result(&mut self, result: Result<VaultSnapshot, String>) {
        self.vault.loading = false;
        match result {
            Ok(snapshot) => {
                self.set_status(format!(
                    "Vault updated: {} open positions",
                    snapshot.positions.len()
                ));
                self.vault.snapshot = Some(snapshot);
                self.vault.last_error = None;
            }
            Err(e) => {
                self.vault.last_error = Some(e.clone());
                self.push_error(e, "vault refresh".into());
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::mpsc;
    use tradedash_core::RawRow;

    pub(crate) fn row(date: &str, coin: &str, direction: &str, leverage: &str, pnl: f64) -> RawRow {
        let mut r = RawRow::new();
        r.insert("date_range".into(), json!(date));
        r.insert("coin".into(), json!(coin));
        r.insert("direction".into(), json!(direction));
        r.insert("leverage".into(), json!(leverage));
        r.insert("pnl".into(), json!(pnl));
        r
    }

    /// `n` distinct rows spread over 2023 and 2024, alternating coin and side.
    pub(crate) fn rows(n: usize) -> Vec<RawRow> {
        (0..n)
            .map(|i| {
                let day = i % 28 + 1;
                let month = i % 12 + 1;
                let year = if i % 2 == 0 { 2024 } else { 2023 };
                let date = format!("{day:02}.{month:02}.{year} - {day:02}.{month:02}.{year}");
                let coin = if i % 3 == 0 { "ETH" } else { "BTC" };
                let direction = if i % 2 == 0 { "Long" } else { "Short" };
                row(&date, coin, direction, "10x", i as f64 - 10.0)
            })
            .collect()
    }

    pub(crate) fn app_with(rows: &[RawRow]) -> (AppState, Receiver<WorkerCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        let dashboard = Dashboard::load(rows, 40).unwrap();
        (AppState::new(dashboard, cmd_tx, resp_rx), cmd_rx)
    }

    #[test]
    fn panel_cycle() {
        assert_eq!(Panel::Overview.next(), Panel::Positions);
        assert_eq!(Panel::Help.next(), Panel::Overview);
        assert_eq!(Panel::Overview.prev(), Panel::Help);
        assert_eq!(Panel::Positions.prev(), Panel::Overview);
    }

    #[test]
    fn panel_from_index() {
        for i in 0..Panel::COUNT {
            let p = Panel::from_index(i).unwrap();
            assert_eq!(p.index(), i);
        }
        assert!(Panel::from_index(5).is_none());
    }

    #[test]
    fn error_history_caps_at_50() {
        let (mut app, _rx) = app_with(&rows(3));
        for i in 0..60 {
            app.push_error(format!("error {i}"), String::new());
        }
        assert_eq!(app.error_history.len(), 50);
        assert!(app.error_history[0].message.contains("59"));
        assert_eq!(app.status_message.as_ref().unwrap().1, StatusLevel::Error);
    }

    #[test]
    fn cycle_index_wraps_both_ways() {
        assert_eq!(cycle_index(0, 3, 1), 1);
        assert_eq!(cycle_index(2, 3, 1), 0);
        assert_eq!(cycle_index(0, 3, -1), 2);
        assert_eq!(cycle_index(0, 0, 1), 0);
    }

    #[test]
    fn scroll_start_keeps_cursor_visible() {
        assert_eq!(scroll_start(0, 10), 0);
        assert_eq!(scroll_start(9, 10), 0);
        assert_eq!(scroll_start(10, 10), 1);
        assert_eq!(scroll_start(5, 0), 5);
    }

    #[test]
    fn cycling_coin_walks_all_then_options() {
        let (mut app, _rx) = app_with(&rows(6));
        assert_eq!(app.filter_display(FilterKey::Crypto), "All");

        app.cycle_filter(FilterKey::Crypto, 1);
        assert_eq!(app.dashboard.filters().crypto.as_deref(), Some("BTC"));
        app.cycle_filter(FilterKey::Crypto, 1);
        assert_eq!(app.dashboard.filters().crypto.as_deref(), Some("ETH"));
        app.cycle_filter(FilterKey::Crypto, 1);
        assert_eq!(app.dashboard.filters().crypto, None);
        app.cycle_filter(FilterKey::Crypto, -1);
        assert_eq!(app.dashboard.filters().crypto.as_deref(), Some("ETH"));
    }

    #[test]
    fn month_needs_a_year() {
        let (mut app, _rx) = app_with(&rows(6));
        app.cycle_filter(FilterKey::Month, 1);
        assert_eq!(app.dashboard.filters().month, None);
        assert_eq!(app.status_message.as_ref().unwrap().1, StatusLevel::Warning);

        // Newest year first
        app.cycle_filter(FilterKey::Year, 1);
        assert_eq!(app.dashboard.filters().year, Some(2024));
        app.cycle_filter(FilterKey::Month, 1);
        assert_eq!(app.dashboard.filters().month, Some(1));
        assert_eq!(app.filter_display(FilterKey::Month), "January");
    }

    #[test]
    fn remove_focused_filter_on_filters_panel() {
        let (mut app, _rx) = app_with(&rows(6));
        app.cycle_filter(FilterKey::Crypto, 1);
        app.cycle_filter(FilterKey::Direction, 1);
        app.active_panel = Panel::Filters;
        app.filter_cursor = 2;
        app.remove_focused_filter();
        assert_eq!(app.dashboard.filters().crypto, None);
        assert!(app.dashboard.filters().direction.is_some());
    }

    #[test]
    fn remove_elsewhere_drops_last_active() {
        let (mut app, _rx) = app_with(&rows(6));
        app.cycle_filter(FilterKey::Crypto, 1);
        app.cycle_filter(FilterKey::Direction, 1);
        app.active_panel = Panel::Overview;
        app.remove_focused_filter();
        assert!(app.dashboard.filters().crypto.is_some());
        assert_eq!(app.dashboard.filters().direction, None);
    }

    #[test]
    fn removing_unset_filter_warns() {
        let (mut app, _rx) = app_with(&rows(3));
        app.remove_filter(FilterKey::Leverage);
        assert_eq!(app.status_message.as_ref().unwrap().1, StatusLevel::Warning);
    }

    #[test]
    fn moving_past_revealed_tail_reveals_more() {
        let (mut app, _rx) = app_with(&rows(100));
        app.set_viewport_rows(10);
        assert_eq!(app.dashboard.revealed().len(), 40);

        app.move_position(39);
        assert_eq!(app.positions.cursor, 39);
        assert_eq!(app.dashboard.revealed().len(), 40);

        app.move_position(1);
        assert_eq!(app.positions.cursor, 40);
        assert_eq!(app.dashboard.revealed().len(), 80);

        app.move_position(1000);
        assert_eq!(app.positions.cursor, 99);
        assert_eq!(app.dashboard.revealed().len(), 100);

        app.move_position(-1000);
        assert_eq!(app.positions.cursor, 0);
    }

    #[test]
    fn tall_viewport_fills_with_several_chunks() {
        let (mut app, _rx) = app_with(&rows(100));
        app.set_viewport_rows(90);
        assert_eq!(app.dashboard.revealed().len(), 100);
    }

    #[test]
    fn filter_change_resets_cursor_and_reveal() {
        let (mut app, _rx) = app_with(&rows(100));
        app.set_viewport_rows(10);
        app.move_position(60);
        app.cycle_filter(FilterKey::Direction, 1);
        assert_eq!(app.positions.cursor, 0);
        assert_eq!(app.dashboard.revealed().len(), 40);
    }

    #[test]
    fn sort_cycle_updates_dashboard() {
        let (mut app, _rx) = app_with(&rows(5));
        app.cycle_sort(1);
        assert_eq!(app.dashboard.sort(), SortMode::DateAsc.next());
        app.cycle_sort(-1);
        assert_eq!(app.dashboard.sort(), SortMode::DateAsc);
    }

    #[test]
    fn vault_refresh_sends_one_command_at_a_time() {
        let (mut app, cmd_rx) = app_with(&rows(3));
        app.request_vault_refresh();
        app.request_vault_refresh();
        assert!(app.vault.loading);
        assert!(matches!(cmd_rx.try_recv(), Ok(WorkerCommand::RefreshVault)));
        assert!(cmd_rx.try_recv().is_err());

        app.apply_vault_result(Err("timeout".into()));
        assert!(!app.vault.loading);
        assert_eq!(app.vault.last_error.as_deref(), Some("timeout"));
        assert_eq!(app.error_history.len(), 1);
    }
}
