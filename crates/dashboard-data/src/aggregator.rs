//! Order and revenue rollups by day and by group key.
//!
//! Every function here is a pure reduction over a [`Dataset`]; nothing is
//! cached between calls.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use dashboard_core::error::Result;
use dashboard_core::models::{
    DailyRollup, Dataset, GroupCount, GroupSum, OrderRecord, SalesTotals, PRICE,
};

use crate::reader::parse_decimal;

// ── DayBucket ─────────────────────────────────────────────────────────────────

/// Running totals for one calendar day.
#[derive(Default)]
struct DayBucket<'a> {
    orders: HashSet<&'a str>,
    revenue: f64,
}

// ── OrderAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that rolls order rows up by day or by a key column.
pub struct OrderAggregator;

impl OrderAggregator {
    /// One record per calendar day that has purchases, ascending by day.
    ///
    /// `order_count` counts distinct `order_id`s on the day; `revenue` sums
    /// `price` over every item row.  Days without rows are not emitted.
    pub fn daily_rollup(dataset: &Dataset) -> Vec<DailyRollup> {
        // BTreeMap keeps the days sorted.
        let mut days: BTreeMap<NaiveDate, DayBucket<'_>> = BTreeMap::new();

        for row in dataset {
            let bucket = days.entry(row.purchase_day()).or_default();
            bucket.orders.insert(row.order_id.as_str());
            bucket.revenue += row.price;
        }

        days.into_iter()
            .map(|(day, bucket)| DailyRollup {
                day,
                order_count: bucket.orders.len() as u64,
                revenue: bucket.revenue,
            })
            .collect()
    }

    /// Item rows per distinct value of `key_column`, largest first.
    ///
    /// Empty key cells form their own `None` group.  Ties keep the order in
    /// which the groups were first seen.
    ///
    /// # Errors
    /// [`DashboardError::Schema`](dashboard_core::DashboardError::Schema) when
    /// `key_column` is not in the dataset.
    pub fn grouped_count(dataset: &Dataset, key_column: &str) -> Result<Vec<GroupCount>> {
        let key = dataset.schema().require(key_column)?;

        let groups = group_rows(dataset, key, |count: &mut u64, _| {
            *count += 1;
            Ok(())
        })?;

        let mut out: Vec<GroupCount> = groups
            .into_iter()
            .map(|(group_key, order_count)| GroupCount {
                group_key: group_key.map(str::to_string),
                order_count,
            })
            .collect();
        // `sort_by` is stable, so equal counts stay in encounter order.
        out.sort_by(|a, b| b.order_count.cmp(&a.order_count));
        Ok(out)
    }

    /// Sum of `value_column` per distinct value of `key_column`, largest first.
    ///
    /// `price` uses the typed column.  Any other value column is parsed per
    /// row; an empty cell adds nothing.  Null keys and ties behave as in
    /// [`grouped_count`](Self::grouped_count).
    ///
    /// # Errors
    /// * `Schema` – `key_column` or `value_column` is not in the dataset.
    /// * `Parse` – a non-empty value cell is not a number.
    pub fn grouped_sum(
        dataset: &Dataset,
        key_column: &str,
        value_column: &str,
    ) -> Result<Vec<GroupSum>> {
        let key = dataset.schema().require(key_column)?;
        let value = dataset.schema().require(value_column)?;

        let groups = group_rows(dataset, key, |sum: &mut f64, row: &OrderRecord| {
            *sum += if value_column == PRICE {
                row.price
            } else {
                match row.cell(value) {
                    None => 0.0,
                    cell => parse_decimal(cell, row.source_row, value_column)?,
                }
            };
            Ok(())
        })?;

        let mut out: Vec<GroupSum> = groups
            .into_iter()
            .map(|(group_key, revenue)| GroupSum {
                group_key: group_key.map(str::to_string),
                revenue,
            })
            .collect();
        out.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
        Ok(out)
    }

    /// [`grouped_sum`](Self::grouped_sum) over the `price` column.
    pub fn grouped_revenue(dataset: &Dataset, key_column: &str) -> Result<Vec<GroupSum>> {
        Self::grouped_sum(dataset, key_column, PRICE)
    }

    /// Headline totals across all daily rollups.
    pub fn calculate_totals(daily: &[DailyRollup]) -> SalesTotals {
        let mut totals = SalesTotals::default();
        for day in daily {
            totals.total_orders += day.order_count;
            totals.total_revenue += day.revenue;
            totals.days += 1;
        }
        totals
    }
}

// ── Private ───────────────────────────────────────────────────────────────────

/// Fold every row into the accumulator of its key cell at `key`.
///
/// Groups are returned in first-encounter order.
fn group_rows<'a, T, F>(
    dataset: &'a Dataset,
    key: usize,
    mut fold: F,
) -> Result<Vec<(Option<&'a str>, T)>>
where
    T: Default,
    F: FnMut(&mut T, &'a OrderRecord) -> Result<()>,
{
    let mut positions: HashMap<Option<&'a str>, usize> = HashMap::new();
    let mut groups: Vec<(Option<&'a str>, T)> = Vec::new();

    for row in dataset {
        let group_key = row.cell(key);
        let pos = *positions.entry(group_key).or_insert_with(|| {
            groups.push((group_key, T::default()));
            groups.len() - 1
        });
        fold(&mut groups[pos].1, row)?;
    }

    Ok(groups)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
