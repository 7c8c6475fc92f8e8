//! # Campground Scan
//!
//! This crate provides the availability aggregation engine: it splits a date
//! range into the calendar months the remote API must be queried for, merges
//! each month's per-site records into a date-range-filtered result, and folds
//! results for several campgrounds into one response.

/// Types shared by the scan operations (date ranges, records, errors)
mod scan_types;
pub use scan_types::*;

/// Decomposition of a date range into calendar months
mod month_planner;
pub use month_planner::*;

/// Per-facility availability result and the month merge step
mod availability;
pub use availability::*;

/// Facility id to display name lookup
mod campground_directory;
pub use campground_directory::*;

/// Per-facility check and multi-facility fold
mod aggregator;
pub use aggregator::*;
