//! Memoised dataset store.
//!
//! Loads the order CSV lazily on the first [`DatasetStore::get`] and hands out
//! the same [`Arc<Dataset>`] until [`DatasetStore::reload`] or
//! [`DatasetStore::invalidate`] is called. A failed reload keeps serving the
//! previous dataset and records the failure for the UI.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashboard_core::error::Result;
use dashboard_core::models::Dataset;
use dashboard_data::reader::load_dataset;

// ── DatasetStore ──────────────────────────────────────────────────────────────

/// Owner of the loaded dataset for one CSV path.
///
/// # Example
/// ```no_run
/// use dashboard_runtime::store::DatasetStore;
///
/// let mut store = DatasetStore::new("dashboard/all_data.csv");
/// let dataset = store.get()?;
/// println!("rows: {}", dataset.len());
/// # Ok::<(), dashboard_core::DashboardError>(())
/// ```
#[derive(Debug)]
pub struct DatasetStore {
    path: PathBuf,
    dataset: Option<Arc<Dataset>>,
    /// When `dataset` was last populated.
    loaded_at: Option<Instant>,
    /// Display form of the most recent load failure.
    last_error: Option<String>,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dataset: None,
            loaded_at: None,
            last_error: None,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return the memoised dataset, loading it on first use.
    pub fn get(&mut self) -> Result<Arc<Dataset>> {
        if let Some(ds) = &self.dataset {
            tracing::debug!("returning memoised dataset");
            return Ok(Arc::clone(ds));
        }
        self.load()
    }

    /// Re-read the CSV unconditionally.
    ///
    /// On failure the previous dataset (if any) stays in place and the error
    /// is both recorded and returned.
    pub fn reload(&mut self) -> Result<Arc<Dataset>> {
        tracing::info!(path = %self.path.display(), "reloading dataset");
        self.load()
    }

    /// Drop the memoised dataset so the next [`get`](Self::get) reads again.
    pub fn invalidate(&mut self) {
        self.dataset = None;
        self.loaded_at = None;
        tracing::debug!("dataset memo invalidated");
    }

    /// The CSV path this store reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The memoised dataset without triggering a load.
    pub fn current(&self) -> Option<Arc<Dataset>> {
        self.dataset.clone()
    }

    /// Time since the dataset was last loaded successfully.
    pub fn age(&self) -> Option<Duration> {
        self.loaded_at.map(|at| at.elapsed())
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn load(&mut self) -> Result<Arc<Dataset>> {
        let started = Instant::now();
        match load_dataset(&self.path) {
            Ok(dataset) => {
                let dataset = Arc::new(dataset);
                tracing::info!(
                    path = %self.path.display(),
                    rows = dataset.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "dataset loaded"
                );
                self.dataset = Some(Arc::clone(&dataset));
                self.loaded_at = Some(Instant::now());
                self.last_error = None;
                Ok(dataset)
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    kept_previous = self.dataset.is_some(),
                    "dataset load failed"
                );
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
