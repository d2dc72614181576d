//! OpenRouteService adapter for the fuel-stop planner.
//!
//! Implements the core provider ports over the ORS geocoding and directions
//! APIs, with bounded retry, rate-limit handling, and a per-client geocode
//! cache.

pub mod client;
pub mod config;
pub mod polyline;
pub mod retry;

pub use client::OrsClient;
pub use config::OrsConfig;
pub use polyline::decode_polyline;
pub use retry::{with_retry, RetryPolicy};
