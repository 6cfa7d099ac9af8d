//! Inclusive calendar-date filtering of a [`Dataset`].

use chrono::NaiveDate;
use dashboard_core::models::{Dataset, DateRange, OrderRecord};

/// Rows purchased between `start` 00:00:00 and the end of `end`, inclusive.
///
/// The result keeps the input order and schema.  An inverted range
/// (`start > end`) selects nothing and yields an empty dataset.
pub fn filter_by_date(dataset: &Dataset, start: NaiveDate, end: NaiveDate) -> Dataset {
    filter_range(dataset, DateRange::new(start, end))
}

/// [`filter_by_date`] over a [`DateRange`].
pub fn filter_range(dataset: &Dataset, range: DateRange) -> Dataset {
    if range.is_inverted() {
        return Dataset::empty(dataset.schema_handle());
    }

    // Rows are ordered by purchase time, so the selection is one contiguous
    // slice bounded by two binary searches.
    let rows = dataset.rows();
    let lower = rows.partition_point(|r| r.purchase_day() < range.start);
    let upper = rows.partition_point(|r| r.purchase_day() <= range.end);

    let selected: Vec<OrderRecord> = rows[lower..upper].to_vec();
    tracing::debug!(
        "Filtered {} of {} rows to {}..={}",
        selected.len(),
        rows.len(),
        range.start,
        range.end
    );
    Dataset::new(dataset.schema_handle(), selected)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            OrderRecord::new("A", ts("2024-01-01 00:00:00"), 10.0, Some("toys"), Some("x")),
            OrderRecord::new("A", ts("2024-01-01 12:30:00"), 5.0, Some("toys"), Some("x")),
            OrderRecord::new("B", ts("2024-01-02 23:59:59"), 20.0, Some("books"), Some("y")),
            OrderRecord::new("C", ts("2024-01-03 00:00:00"), 7.0, None, Some("y")),
            OrderRecord::new("D", ts("2024-01-05 09:00:00"), 1.0, Some("toys"), None),
        ])
    }

    fn ids(ds: &Dataset) -> Vec<&str> {
        ds.iter().map(|r| r.order_id.as_str()).collect()
    }

    #[test]
    fn test_filter_single_day_includes_whole_day() {
        let filtered = filter_by_date(&sample(), day("2024-01-02"), day("2024-01-02"));
        assert_eq!(ids(&filtered), vec!["B"]);
    }

    #[test]
    fn test_filter_end_bound_covers_fractional_seconds() {
        let late = NaiveDateTime::parse_from_str("2024-01-02 23:59:59.999", "%Y-%m-%d %H:%M:%S%.f")
            .unwrap();
        let ds = Dataset::from_records(vec![
            OrderRecord::new("A", ts("2024-01-02 08:00:00"), 1.0, None, None),
            OrderRecord::new("B", late, 2.0, None, None),
            OrderRecord::new("C", ts("2024-01-03 00:00:00"), 3.0, None, None),
        ]);

        let filtered = filter_by_date(&ds, day("2024-01-01"), day("2024-01-02"));
        assert_eq!(ids(&filtered), vec!["A", "B"]);
    }

    #[test]
    fn test_filter_start_bound_is_midnight_inclusive() {
        let filtered = filter_by_date(&sample(), day("2024-01-03"), day("2024-01-31"));
        assert_eq!(ids(&filtered), vec!["C", "D"]);
    }

    #[test]
    fn test_filter_full_span() {
        let ds = sample();
        let filtered = filter_by_date(&ds, day("2024-01-01"), day("2024-01-05"));
        assert_eq!(filtered.rows(), ds.rows());
    }

    #[test]
    fn test_filter_inverted_range_is_empty() {
        let ds = sample();
        let filtered = filter_by_date(&ds, day("2024-01-05"), day("2024-01-01"));
        assert!(filtered.is_empty());
        assert_eq!(filtered.schema(), ds.schema());
    }

    #[test]
    fn test_filter_range_outside_data() {
        let filtered = filter_by_date(&sample(), day("2023-01-01"), day("2023-12-31"));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_filter_gap_day_between_rows() {
        let filtered = filter_by_date(&sample(), day("2024-01-04"), day("2024-01-04"));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_filter_is_ordered_subsequence_within_bounds() {
        let ds = sample();
        let (start, end) = (day("2024-01-01"), day("2024-01-03"));
        let filtered = filter_by_date(&ds, start, end);

        // Every kept row is in range and appears in the input in the same order.
        let mut cursor = ds.iter();
        for row in filtered.iter() {
            assert!(start <= row.purchase_day() && row.purchase_day() <= end);
            assert!(cursor.any(|r| r == row), "row out of order: {row:?}");
        }
        // Nothing in range was dropped.
        let in_range = ds
            .iter()
            .filter(|r| start <= r.purchase_day() && r.purchase_day() <= end)
            .count();
        assert_eq!(filtered.len(), in_range);
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let ds = sample();
        let before = ds.rows().to_vec();
        let _ = filter_by_date(&ds, day("2024-01-02"), day("2024-01-02"));
        assert_eq!(ds.rows(), before.as_slice());
    }

    #[test]
    fn test_filter_empty_dataset() {
        let ds = Dataset::from_records(Vec::new());
        assert!(filter_by_date(&ds, day("2024-01-01"), day("2024-12-31")).is_empty());
    }
}
