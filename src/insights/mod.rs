//! Aggregate views over recorded expenses.
//!
//! This module contains the read-only insight endpoints:
//! - Overall totals across every expense
//! - Per-category totals within a recency window
//! - Per-day totals within a recency window
//! - Both windowed aggregates combined into a single response

mod by_category;
mod combined;
mod over_time;
mod summary;
mod window;

pub use by_category::{CategoryTotal, get_by_category_endpoint, total_by_category};
pub use combined::get_insights_endpoint;
pub use over_time::{DateTotal, get_over_time_endpoint, total_by_date};
pub use summary::get_summary_endpoint;
pub use window::{RangeQuery, Window};
