//! Dashboard metrics and backend health.

pub mod service;

pub use service::{DbDetails, HealthReport, Summary, SummaryService};
