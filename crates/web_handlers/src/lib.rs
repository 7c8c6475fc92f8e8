//! # Web Handlers for the Campsite Availability Checker
//!
//! This crate provides the HTTP boundary of the availability checker: request
//! validation, response shaping and the actix-web handlers.

/// Request, response and error types for availability endpoints
mod availability_types;
pub use availability_types::*;

/// Handlers for availability, date validation and campground listing
mod availability_handlers;
pub use availability_handlers::*;

/// Cross-origin headers and preflight handling
mod cors;
pub use cors::*;
