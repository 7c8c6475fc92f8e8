//! # RecGov
//!
//! This crate provides a client for the recreation.gov month availability API,
//! used by the availability aggregator to fetch one month of campsite data at a time.

/// Month availability client and payload types.
mod rec_gov_client;
pub use rec_gov_client::*;
