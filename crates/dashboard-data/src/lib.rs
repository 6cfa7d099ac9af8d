//! Data layer for the order dashboard.
//!
//! Loads the joined order-items CSV, filters it by purchase date, rolls it
//! up per day and per group key, and assembles the snapshot the UI renders.

pub mod aggregator;
pub mod filter;
pub mod reader;
pub mod snapshot;

pub use dashboard_core as core;
