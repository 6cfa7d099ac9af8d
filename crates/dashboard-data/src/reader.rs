//! CSV loading for the order dataset.
//!
//! Reads the joined orders export into a [`Dataset`]: every cell is kept,
//! the timestamp and price columns are typed, and rows are ordered by
//! purchase time.  The first malformed row aborts the load.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{
    Dataset, OrderRecord, Schema, ORDER_DELIVERED_CUSTOMER_DATE, ORDER_ID,
    ORDER_PURCHASE_TIMESTAMP, PRICE, PRODUCT_CATEGORY, SELLER_CITY,
};
use dashboard_core::timestamps::TimestampParser;
use tracing::debug;

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the dataset at `path`.
///
/// # Errors
/// * [`DashboardError::NotFound`] – `path` does not exist.
/// * [`DashboardError::Schema`] – a required column is missing from the header.
/// * [`DashboardError::Parse`] – a timestamp or price cell is malformed.
/// * [`DashboardError::Csv`] – the file is not well-formed CSV.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(DashboardError::NotFound(path.to_path_buf()));
    }

    let started = Instant::now();
    let reader = csv_builder().from_path(path)?;
    let dataset = read_records(reader)?;

    debug!(
        "Loaded {} rows ({} columns) from {} in {:.3}s",
        dataset.len(),
        dataset.schema().len(),
        path.display(),
        started.elapsed().as_secs_f64()
    );

    Ok(dataset)
}

/// Read a dataset from any CSV byte stream.
pub fn read_dataset<R: io::Read>(source: R) -> Result<Dataset> {
    read_records(csv_builder().from_reader(source))
}

/// Parse a decimal cell.  `None` (an empty cell) is reported as a parse
/// error; callers that tolerate empties handle them before calling.
pub(crate) fn parse_decimal(cell: Option<&str>, row: usize, column: &str) -> Result<f64> {
    cell.and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or_else(|| DashboardError::Parse {
            row,
            column: column.to_string(),
            value: cell.unwrap_or_default().to_string(),
        })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn csv_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).trim(csv::Trim::All);
    builder
}

/// Header positions of the typed columns.
struct ColumnIndex {
    order_id: usize,
    purchase: usize,
    delivered: usize,
    price: usize,
    category: usize,
    city: usize,
}

impl ColumnIndex {
    fn resolve(schema: &Schema) -> Result<Self> {
        Ok(Self {
            order_id: schema.require(ORDER_ID)?,
            purchase: schema.require(ORDER_PURCHASE_TIMESTAMP)?,
            delivered: schema.require(ORDER_DELIVERED_CUSTOMER_DATE)?,
            price: schema.require(PRICE)?,
            category: schema.require(PRODUCT_CATEGORY)?,
            city: schema.require(SELLER_CITY)?,
        })
    }
}

fn read_records<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Dataset> {
    let schema = Schema::new(reader.headers()?.iter());
    let columns = ColumnIndex::resolve(&schema)?;

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let cells: Vec<Option<String>> = record
            .iter()
            .map(|c| (!c.is_empty()).then(|| c.to_string()))
            .collect();
        rows.push(map_to_order_record(cells, &columns, i + 1)?);
    }

    Ok(Dataset::new(Arc::new(schema), rows))
}

/// Build one [`OrderRecord`] from the raw cells of data row `row`.
fn map_to_order_record(
    cells: Vec<Option<String>>,
    columns: &ColumnIndex,
    row: usize,
) -> Result<OrderRecord> {
    let cell = |i: usize| cells.get(i).and_then(|c| c.as_deref());

    let order_purchase_timestamp =
        parse_timestamp(cell(columns.purchase), row, ORDER_PURCHASE_TIMESTAMP)?.ok_or_else(
            || DashboardError::Parse {
                row,
                column: ORDER_PURCHASE_TIMESTAMP.to_string(),
                value: String::new(),
            },
        )?;
    let order_delivered_customer_date =
        parse_timestamp(cell(columns.delivered), row, ORDER_DELIVERED_CUSTOMER_DATE)?;
    let price = parse_decimal(cell(columns.price), row, PRICE)?;
    let order_id = cell(columns.order_id).unwrap_or_default().to_string();
    let product_category_name_english = cell(columns.category).map(str::to_string);
    let seller_city = cell(columns.city).map(str::to_string);

    Ok(OrderRecord {
        order_id,
        order_purchase_timestamp,
        order_delivered_customer_date,
        price,
        product_category_name_english,
        seller_city,
        source_row: row,
        cells,
    })
}

/// `Ok(None)` for an empty cell, an error for unparseable text.
fn parse_timestamp(
    cell: Option<&str>,
    row: usize,
    column: &str,
) -> Result<Option<chrono::NaiveDateTime>> {
    match cell {
        None => Ok(None),
        Some(s) => TimestampParser::parse(s)
            .map(Some)
            .ok_or_else(|| DashboardError::Parse {
                row,
                column: column.to_string(),
                value: s.to_string(),
            }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
