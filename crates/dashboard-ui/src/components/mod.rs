//! Small line-building widgets shared by the dashboard views.

pub mod header;
pub mod share_bar;
