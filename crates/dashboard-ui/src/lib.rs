//! Terminal UI layer for the order dashboard.
//!
//! Provides themes, header and share-bar components, the overview and
//! ranking-table views, and the main application event loop built on top of
//! [`ratatui`].

pub mod app;
pub mod components;
pub mod overview_view;
pub mod table_view;
pub mod themes;

pub use dashboard_core as core;
