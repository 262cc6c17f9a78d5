//! Dashboard controller: owns the record store and the derived view state.
//!
//! Every filter or sort change runs one synchronous cascade:
//! filtered set → statistics → breakdown → sorted sequence → fresh cursor.
//! The cascade bumps a generation counter, which invalidates any
//! [`RevealTrigger`] handed out for the previous cursor.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::breakdown::CoinBreakdown;
use crate::domain::{FilterKey, FilterState, SharedRecord};
use crate::error::DashboardError;
use crate::facets::{months_for_year, Facets};
use crate::filter::apply_filters;
use crate::ingest::{ingest, IngestReport};
use crate::normalize::RawRow;
use crate::pagination::{PageCursor, DEFAULT_PAGE_SIZE};
use crate::sort::{sort_records, SortMode};
use crate::stats::StatsView;

/// What a host should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    /// The store is empty.
    NoData,
    /// The store has records but none pass the filters.
    NoMatches,
    Loaded,
}

/// Token allowing one more chunk to be revealed from a specific cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTrigger {
    generation: u64,
}

impl RevealTrigger {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Rows `start..end` of the sorted sequence are now revealed.
    Revealed { start: usize, end: usize },
    /// The trigger belongs to a cursor that has since been replaced.
    Stale,
    /// Nothing left to reveal.
    Exhausted,
}

/// Owned snapshot of the current view, for export and reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub mode: ViewMode,
    pub filters: FilterState,
    pub sort: SortMode,
    pub summary: String,
    pub stats: StatsView,
    pub breakdown: CoinBreakdown,
    /// The full sorted sequence, revealed or not.
    pub positions: Vec<SharedRecord>,
    pub ingest: IngestReport,
}

pub struct Dashboard {
    store: Vec<SharedRecord>,
    report: IngestReport,
    facets: Facets,

    filters: FilterState,
    sort: SortMode,

    // ── Derived ──
    filtered: Vec<SharedRecord>,
    stats: StatsView,
    breakdown: CoinBreakdown,
    cursor: PageCursor<SharedRecord>,
    generation: u64,
}

impl Dashboard {
    /// An empty dashboard in [`ViewMode::NoData`].
    pub fn new(page_size: usize) -> Self {
        let mut dashboard = Self {
            store: Vec::new(),
            report: IngestReport::default(),
            facets: Facets::default(),
            filters: FilterState::default(),
            sort: SortMode::default(),
            filtered: Vec::new(),
            stats: StatsView::build(&[], &[], &FilterState::default()),
            breakdown: CoinBreakdown::default(),
            cursor: PageCursor::new(Vec::new(), page_size),
            generation: 0,
        };
        dashboard.refresh();
        dashboard
    }

    /// Build a dashboard from raw rows, failing when none are usable.
    pub fn load(rows: &[RawRow], page_size: usize) -> Result<Self, DashboardError> {
        let mut dashboard = Self::new(page_size);
        dashboard.replace_store(rows)?;
        Ok(dashboard)
    }

    /// Replace the record store wholesale and re-derive everything.
    ///
    /// Filters and sort mode survive a reload. When no row is usable the
    /// store is still replaced (leaving the dashboard in `NoData`) and
    /// [`DashboardError::NoData`] is returned.
    pub fn replace_store(&mut self, rows: &[RawRow]) -> Result<IngestReport, DashboardError> {
        let (records, report) = ingest(rows);
        self.set_records(records, report);
        if report.kept == 0 {
            return Err(DashboardError::NoData {
                raw_rows: report.raw_rows,
                rejected: report.rejected,
            });
        }
        Ok(report)
    }

    /// Install already normalized records as the store.
    pub fn set_records(&mut self, records: Vec<SharedRecord>, report: IngestReport) {
        self.facets = Facets::build(&records);
        self.store = records;
        self.report = report;
        self.refresh();
    }

    // ── Filter mutation ──

    /// Choosing a different year drops the month selection.
    pub fn set_year(&mut self, year: Option<i32>) {
        if self.filters.year != year {
            self.filters.month = None;
        }
        self.filters.year = year;
        self.refresh();
    }

    pub fn set_month(&mut self, month: Option<u32>) {
        self.filters.month = month;
        self.refresh();
    }

    pub fn set_crypto(&mut self, coin: Option<String>) {
        self.filters.crypto = coin;
        self.refresh();
    }

    pub fn set_leverage(&mut self, leverage: Option<String>) {
        self.filters.leverage = leverage;
        self.refresh();
    }

    pub fn set_direction(&mut self, direction: Option<String>) {
        self.filters.direction = direction;
        self.refresh();
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.refresh();
    }

    pub fn remove_filter(&mut self, key: FilterKey) {
        self.filters.remove(key);
        self.refresh();
    }

    pub fn reset_filters(&mut self) {
        self.filters.clear();
        self.refresh();
    }

    pub fn set_sort(&mut self, mode: SortMode) {
        self.sort = mode;
        self.refresh();
    }

    // ── Cascade ──

    /// Re-derive the filtered set, statistics, breakdown, sorted sequence and
    /// cursor, then reveal the first chunk.
    pub fn refresh(&mut self) {
        self.filtered = apply_filters(&self.store, &self.filters);
        self.stats = StatsView::build(&self.store, &self.filtered, &self.filters);
        self.breakdown = CoinBreakdown::compute(&self.filtered);
        let sorted = sort_records(&self.filtered, self.sort);
        self.cursor.reset(sorted);
        self.generation += 1;
        self.cursor.next_chunk();
        debug!(
            generation = self.generation,
            filtered = self.filtered.len(),
            total = self.store.len(),
            sort = %self.sort,
            "view refreshed"
        );
    }

    // ── Incremental reveal ──

    /// The live trigger, or `None` once everything has been revealed.
    pub fn trigger(&self) -> Option<RevealTrigger> {
        self.cursor.has_more().then_some(RevealTrigger {
            generation: self.generation,
        })
    }

    /// Reveal exactly one more chunk if `trigger` belongs to the live cursor.
    pub fn reveal(&mut self, trigger: &RevealTrigger) -> RevealOutcome {
        if trigger.generation != self.generation {
            return RevealOutcome::Stale;
        }
        if !self.cursor.has_more() {
            return RevealOutcome::Exhausted;
        }
        let start = self.cursor.position();
        let end = start + self.cursor.next_chunk().len();
        RevealOutcome::Revealed { start, end }
    }

    /// Reveal chunks until at least `count` rows are visible or the cursor
    /// runs out. Returns the number of rows now revealed.
    pub fn reveal_until(&mut self, count: usize) -> usize {
        while self.cursor.position() < count {
            match self.trigger() {
                Some(trigger) => {
                    self.reveal(&trigger);
                }
                None => break,
            }
        }
        self.cursor.position()
    }

    // ── Accessors ──

    pub fn mode(&self) -> ViewMode {
        if self.store.is_empty() {
            ViewMode::NoData
        } else if self.filtered.is_empty() {
            ViewMode::NoMatches
        } else {
            ViewMode::Loaded
        }
    }

    pub fn store(&self) -> &[SharedRecord] {
        &self.store
    }

    pub fn filtered(&self) -> &[SharedRecord] {
        &self.filtered
    }

    /// The sorted sequence, revealed or not.
    pub fn sorted(&self) -> &[SharedRecord] {
        self.cursor.items()
    }

    pub fn revealed(&self) -> &[SharedRecord] {
        self.cursor.revealed()
    }

    pub fn has_more(&self) -> bool {
        self.cursor.has_more()
    }

    pub fn page_size(&self) -> usize {
        self.cursor.page_size()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn stats(&self) -> &StatsView {
        &self.stats
    }

    pub fn breakdown(&self) -> &CoinBreakdown {
        &self.breakdown
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    /// Months available for the selected year; empty when no year is set.
    pub fn month_options(&self) -> Vec<u32> {
        match self.filters.year {
            Some(year) => months_for_year(&self.store, year),
            None => Vec::new(),
        }
    }

    pub fn ingest_report(&self) -> IngestReport {
        self.report
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn summary(&self) -> String {
        self.filters.summary(self.filtered.len(), self.store.len())
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            mode: self.mode(),
            filters: self.filters.clone(),
            sort: self.sort,
            summary: self.summary(),
            stats: self.stats.clone(),
            breakdown: self.breakdown.clone(),
            positions: self.cursor.items().to_vec(),
            ingest: self.report,
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
