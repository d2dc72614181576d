//! Ports to the external geocoding and routing providers.
//!
//! The planner consumes these generically; concrete adapters live outside
//! the core crate, and tests substitute in-memory tables.

use crate::error::ProviderError;
use crate::models::{Coordinate, RouteGeometry};

/// Resolves a street address to a coordinate.
#[allow(async_fn_in_trait)]
pub trait Geocoder {
    async fn geocode(
        &self,
        state: &str,
        city: &str,
        address: &str,
    ) -> Result<Coordinate, ProviderError>;
}

/// Fetches a driving route geometry between two coordinates.
#[allow(async_fn_in_trait)]
pub trait RouteSource {
    async fn fetch_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RouteGeometry, ProviderError>;
}
