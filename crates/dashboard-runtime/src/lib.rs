//! Runtime layer for the order dashboard.
//!
//! Owns the loaded dataset and rebuilds dashboard snapshots on demand.

pub mod session;
pub mod store;

pub use dashboard_core as core;
pub use dashboard_data as data;
