//! Stats module - aggregation pipeline and dashboard summary

pub mod aggregator;
mod summary;

pub use aggregator::{AggregateError, StrongestEvent};
pub use summary::{DashboardSummary, STATUS_REVIEWED, STATUS_VERIFIED};
