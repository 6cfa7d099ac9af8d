//! Dashboard snapshot pipeline.
//!
//! Runs filter → rollups for the selected date range and assembles the
//! headline metrics and top/bottom rankings the UI renders.

use std::time::Instant;

use chrono::Utc;
use dashboard_core::error::Result;
use dashboard_core::models::{
    DailyRollup, Dataset, DateRange, GroupCount, GroupSum, SalesTotals, PRODUCT_CATEGORY,
    SELLER_CITY,
};

use crate::aggregator::OrderAggregator;
use crate::filter::filter_range;

// ── Ranked values ─────────────────────────────────────────────────────────────

/// A group rollup record with a numeric value to rank by.
pub trait Ranked {
    fn group_key(&self) -> Option<&str>;
    fn value(&self) -> f64;
}

impl Ranked for GroupCount {
    fn group_key(&self) -> Option<&str> {
        self.group_key.as_deref()
    }

    fn value(&self) -> f64 {
        self.order_count as f64
    }
}

impl Ranked for GroupSum {
    fn group_key(&self) -> Option<&str> {
        self.group_key.as_deref()
    }

    fn value(&self) -> f64 {
        self.revenue
    }
}

/// Best and worst performers of one rollup.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking<T> {
    /// The first `n` groups, largest first.
    pub best: Vec<T>,
    /// The last `n` groups, smallest first.
    pub worst: Vec<T>,
    /// Number of groups in the full rollup.
    pub groups: usize,
}

impl<T: Ranked + Clone> Ranking<T> {
    /// Build from a rollup already sorted descending by value.
    ///
    /// With fewer than `2 * n` groups the two sides overlap.
    pub fn from_descending(sorted: &[T], n: usize) -> Self {
        let best = sorted.iter().take(n).cloned().collect();
        // Reversing the tail keeps `worst[i]` at position `groups - 1 - i`,
        // ties included.
        let worst = sorted[sorted.len().saturating_sub(n)..]
            .iter()
            .rev()
            .cloned()
            .collect();
        Self {
            best,
            worst,
            groups: sorted.len(),
        }
    }
}

/// Sales and revenue rankings for one group-key column.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionBreakdown {
    /// The column grouped on.
    pub column: String,
    pub by_sales: Ranking<GroupCount>,
    pub by_revenue: Ranking<GroupSum>,
}

impl DimensionBreakdown {
    /// Roll `dataset` up by `column` and rank both results.
    pub fn build(dataset: &Dataset, column: &str, top_n: usize) -> Result<Self> {
        let counts = OrderAggregator::grouped_count(dataset, column)?;
        let sums = OrderAggregator::grouped_revenue(dataset, column)?;
        Ok(Self {
            column: column.to_string(),
            by_sales: Ranking::from_descending(&counts, top_n),
            by_revenue: Ranking::from_descending(&sums, top_n),
        })
    }
}

// ── DashboardSnapshot ─────────────────────────────────────────────────────────

/// Everything one dashboard render needs.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    /// Effective range, or `None` when there was nothing to select from.
    pub range: Option<DateRange>,
    /// Rows that fell inside the range.
    pub rows: usize,
    pub daily: Vec<DailyRollup>,
    pub totals: SalesTotals,
    pub categories: DimensionBreakdown,
    pub seller_cities: DimensionBreakdown,
    /// RFC 3339 time the snapshot was built.
    pub generated_at: String,
}

/// Build a snapshot of `dataset` restricted to `range`.
///
/// A `None` range selects no rows; every rollup is then empty.
pub fn build_snapshot(
    dataset: &Dataset,
    range: Option<DateRange>,
    top_n: usize,
) -> Result<DashboardSnapshot> {
    let started = Instant::now();

    let filtered = match range {
        Some(r) => filter_range(dataset, r),
        None => Dataset::empty(dataset.schema_handle()),
    };

    let daily = OrderAggregator::daily_rollup(&filtered);
    let totals = OrderAggregator::calculate_totals(&daily);
    let categories = DimensionBreakdown::build(&filtered, PRODUCT_CATEGORY, top_n)?;
    let seller_cities = DimensionBreakdown::build(&filtered, SELLER_CITY, top_n)?;

    tracing::debug!(
        rows = filtered.len(),
        days = daily.len(),
        orders = totals.total_orders,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "snapshot built"
    );

    Ok(DashboardSnapshot {
        range,
        rows: filtered.len(),
        daily,
        totals,
        categories,
        seller_cities,
        generated_at: Utc::now().to_rfc3339(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
