//! Account metric snapshots and their sources.
//!
//! `AccountMetric` is a serialization contract only: no relation between its
//! fields is computed or enforced here.

mod error;
mod source;
mod types;

pub use error::MetricsError;
pub use source::{AccountMetricSource, InMemoryMetricSource};
pub use types::AccountMetric;
