//! # alumni_core
//!
//! Core domain logic for the alumni records service: credentials, tokens,
//! role policies, the job lifecycle, upload rules and the record store.

pub mod auth;
pub mod jobs;
pub mod listing;
pub mod migrate;
pub mod models;
pub mod seed;
pub mod store;
pub mod uploads;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
