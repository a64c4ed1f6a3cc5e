//! Financial Agent Tools
//!
//! A small tool service for a conversational financial agent:
//! - Scrapes income statements from a financials site, repairing the
//!   embedded near-JSON payload into a parseable record
//! - Reports the current time in any IANA timezone
//! - Searches the web via a server-rendered HTML endpoint
//! - Generates images through a hosted inference model
//!
//! Tools share a uniform trait and registry, and are exposed to the hosting
//! agent runtime over a thin HTTP API.

pub mod api;
pub mod config;
pub mod error;
pub mod financials;
pub mod models;
pub mod tools;

pub use error::Result;

// Re-export common types
pub use config::Config;
pub use models::*;
