use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

// ── Column names ──────────────────────────────────────────────────────────────

pub const ORDER_ID: &str = "order_id";
pub const ORDER_PURCHASE_TIMESTAMP: &str = "order_purchase_timestamp";
pub const ORDER_DELIVERED_CUSTOMER_DATE: &str = "order_delivered_customer_date";
pub const PRICE: &str = "price";
pub const PRODUCT_CATEGORY: &str = "product_category_name_english";
pub const SELLER_CITY: &str = "seller_city";

/// Columns every dataset file must carry, in the order used by
/// [`Schema::standard`].
pub const REQUIRED_COLUMNS: [&str; 6] = [
    ORDER_ID,
    ORDER_PURCHASE_TIMESTAMP,
    ORDER_DELIVERED_CUSTOMER_DATE,
    PRICE,
    PRODUCT_CATEGORY,
    SELLER_CITY,
];

// ── Schema ────────────────────────────────────────────────────────────────────

/// Ordered column names of a dataset with a name → position index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Build a schema from header names.  On duplicate names the first
    /// occurrence wins.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }
        Self { names, index }
    }

    /// Schema containing exactly [`REQUIRED_COLUMNS`].
    pub fn standard() -> Self {
        Self::new(REQUIRED_COLUMNS)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Position of `name`, or [`DashboardError::Schema`] when absent.
    pub fn require(&self, name: &str) -> Result<usize> {
        self.index_of(name)
            .ok_or_else(|| DashboardError::missing_column(name))
    }
}

// ── OrderRecord ───────────────────────────────────────────────────────────────

/// One (order, order item) row of the transaction dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    /// Order identifier; repeated across the item rows of one order.
    pub order_id: String,
    /// When the order was placed.
    pub order_purchase_timestamp: NaiveDateTime,
    /// When the order reached the customer; `None` for undelivered orders.
    pub order_delivered_customer_date: Option<NaiveDateTime>,
    /// Revenue contribution of this line item.
    pub price: f64,
    pub product_category_name_english: Option<String>,
    pub seller_city: Option<String>,
    /// 1-based data row in the source file, header excluded.
    pub source_row: usize,
    /// Every cell of the source row, positioned by the dataset [`Schema`].
    /// Empty cells are `None`.
    pub cells: Vec<Option<String>>,
}

impl OrderRecord {
    /// Build a record laid out for [`Schema::standard`].
    pub fn new(
        order_id: impl Into<String>,
        order_purchase_timestamp: NaiveDateTime,
        price: f64,
        product_category_name_english: Option<&str>,
        seller_city: Option<&str>,
    ) -> Self {
        let order_id = order_id.into();
        let product_category_name_english = product_category_name_english.map(str::to_string);
        let seller_city = seller_city.map(str::to_string);
        let cells = vec![
            Some(order_id.clone()),
            Some(order_purchase_timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
            None,
            Some(price.to_string()),
            product_category_name_english.clone(),
            seller_city.clone(),
        ];
        Self {
            order_id,
            order_purchase_timestamp,
            order_delivered_customer_date: None,
            price,
            product_category_name_english,
            seller_city,
            source_row: 0,
            cells,
        }
    }

    /// Cell at `index`, or `None` when empty or out of range.
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }

    /// Calendar day of the purchase.
    pub fn purchase_day(&self) -> NaiveDate {
        self.order_purchase_timestamp.date()
    }
}

// ── Dataset ───────────────────────────────────────────────────────────────────

/// Immutable, purchase-time-ordered collection of [`OrderRecord`]s.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Arc<Schema>,
    rows: Vec<OrderRecord>,
}

impl Dataset {
    /// Construct a dataset, stable-sorting `rows` ascending by purchase time.
    pub fn new(schema: Arc<Schema>, mut rows: Vec<OrderRecord>) -> Self {
        rows.sort_by_key(|r| r.order_purchase_timestamp);
        Self { schema, rows }
    }

    /// A dataset with no rows.
    pub fn empty(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// A dataset on [`Schema::standard`], as built with [`OrderRecord::new`].
    pub fn from_records(rows: Vec<OrderRecord>) -> Self {
        Self::new(Arc::new(Schema::standard()), rows)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Shared handle to the schema, for datasets derived from this one.
    pub fn schema_handle(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    pub fn rows(&self) -> &[OrderRecord] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OrderRecord> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Day of the earliest purchase.
    pub fn first_day(&self) -> Option<NaiveDate> {
        self.rows.first().map(OrderRecord::purchase_day)
    }

    /// Day of the latest purchase.
    pub fn last_day(&self) -> Option<NaiveDate> {
        self.rows.last().map(OrderRecord::purchase_day)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a OrderRecord;
    type IntoIter = std::slice::Iter<'a, OrderRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

// ── Rollups ───────────────────────────────────────────────────────────────────

/// Orders and revenue for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRollup {
    pub day: NaiveDate,
    /// Distinct `order_id`s purchased on `day`.
    pub order_count: u64,
    /// Sum of `price` over every item row on `day`.
    pub revenue: f64,
}

/// Item-row count for one group key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupCount {
    /// `None` groups the rows whose key cell is empty.
    pub group_key: Option<String>,
    pub order_count: u64,
}

/// Summed value for one group key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSum {
    /// `None` groups the rows whose key cell is empty.
    pub group_key: Option<String>,
    pub revenue: f64,
}

/// Headline metrics over a set of daily rollups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesTotals {
    pub total_orders: u64,
    pub total_revenue: f64,
    /// Number of days with at least one purchase.
    pub days: usize,
}

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `true` when `start > end`; such a range selects nothing.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
