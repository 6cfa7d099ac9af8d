//! Shared types for the order dashboard.
//!
//! Holds the error type, the order dataset model, timestamp parsing,
//! number/currency formatting and the CLI settings used by every other
//! dashboard crate.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod timestamps;

pub use error::{DashboardError, Result};
