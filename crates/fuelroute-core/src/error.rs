//! Error types for planning runs and provider calls.

use std::time::Duration;

/// Errors from the external geocoding/routing providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// No geocoding or routing result exists for the query
    #[error("no result for {query}")]
    NotFound { query: String },

    /// Provider rejected the call due to rate limiting
    #[error("rate limited by provider")]
    RateLimited { retry_after: Option<Duration> },

    /// Transport or provider-side failure
    #[error("provider error: {message}")]
    Service { message: String, retryable: bool },
}

/// Errors surfaced to the caller of a planning run.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Geocode/route provider failed after the retry budget was exhausted,
    /// or a required address had no result
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Invalid configuration, rejected before the run starts
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The routing provider returned a geometry with no points
    #[error("route geometry is empty")]
    EmptyRoute,

    /// The run was cancelled between waypoint iterations
    #[error("planning run cancelled")]
    Cancelled,
}
