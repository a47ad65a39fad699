//! Structured queries with a degraded fallback path.

pub mod executor;

pub use executor::{QueryExecutor, QueryOutcome, QueryStep};
