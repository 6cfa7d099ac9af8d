//! Dashboard session: ties the dataset store to the snapshot pipeline.
//!
//! The UI owns one [`DashboardSession`] and asks it for a
//! [`DashboardSnapshot`] on startup and after every reload request.

use chrono::NaiveDate;
use dashboard_core::error::Result;
use dashboard_core::models::{Dataset, DateRange};
use dashboard_core::settings::Settings;
use dashboard_data::snapshot::{build_snapshot, DashboardSnapshot};

use crate::store::DatasetStore;

// ── DashboardSession ──────────────────────────────────────────────────────────

pub struct DashboardSession {
    store: DatasetStore,
    /// Explicit bounds; a missing side falls back to the dataset's extent.
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    top_n: usize,
}

impl DashboardSession {
    pub fn new(
        store: DatasetStore,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        top_n: usize,
    ) -> Self {
        Self {
            store,
            start_date,
            end_date,
            top_n,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            DatasetStore::new(settings.data_path.clone()),
            settings.start_date,
            settings.end_date,
            settings.top_n as usize,
        )
    }

    /// Snapshot of the memoised dataset, loading it on first use.
    pub fn snapshot(&mut self) -> Result<DashboardSnapshot> {
        let dataset = self.store.get()?;
        self.build(&dataset)
    }

    /// Re-read the CSV and rebuild.
    ///
    /// When the reload fails the error is returned and the store keeps the
    /// previous dataset, so a later [`snapshot`](Self::snapshot) still works.
    pub fn reload(&mut self) -> Result<DashboardSnapshot> {
        let dataset = self.store.reload()?;
        self.build(&dataset)
    }

    /// The range a snapshot of `dataset` would cover.
    ///
    /// `None` when a bound is missing and the dataset is empty.
    pub fn resolve_range(&self, dataset: &Dataset) -> Option<DateRange> {
        let start = self.start_date.or_else(|| dataset.first_day())?;
        let end = self.end_date.or_else(|| dataset.last_day())?;
        Some(DateRange::new(start, end))
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn build(&self, dataset: &Dataset) -> Result<DashboardSnapshot> {
        let range = self.resolve_range(dataset);
        if let Some(r) = range.filter(|r| r.is_inverted()) {
            tracing::warn!(start = %r.start, end = %r.end, "start date is after end date");
        }
        build_snapshot(dataset, range, self.top_n)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
