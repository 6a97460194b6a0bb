//! Descriptive statistics and group-by helpers.
//!
//! Everything here is deterministic: groups are ordered by key, and ranking
//! ties are broken by key order, so the same table always yields the same
//! numbers in the same order.

mod descriptive;
mod grouping;

pub use descriptive::{pearson, quantile, ColumnSummary, RunningStats};
pub use grouping::{group_sums, group_values, top_n, FloatKey};
