//! End-to-end trip planning over the provider ports.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::catalog::StationIndex;
use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::models::TripPlan;
use crate::planner::{build_waypoint_contexts, plan_stops, CancelFlag};
use crate::provider::{Geocoder, RouteSource};
use crate::region::ReferenceIndex;
use crate::summary::summarize;
use crate::waypoints::extract_waypoints;

/// An address to geocode as a trip endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceQuery {
    pub state: String,
    pub city: String,
    pub address: String,
}

/// Plan fuel stops for a drive from `start` to `end`.
///
/// Geocodes both endpoints, fetches the driving route, resamples it into
/// waypoints, precomputes per-waypoint candidates and lookahead prices, and
/// folds those into the ordered stop list with trip totals. The catalogs
/// arrive as read-only indexes resolved ahead of time (see
/// [`crate::catalog`]); no network call happens per waypoint.
pub async fn plan_trip<G: Geocoder, R: RouteSource>(
    geocoder: &G,
    routes: &R,
    stations: &StationIndex,
    references: &ReferenceIndex,
    start: &PlaceQuery,
    end: &PlaceQuery,
    config: &PlannerConfig,
    cancel: &CancelFlag,
) -> Result<TripPlan, PlanError> {
    config.validate()?;

    let start_coord = geocoder
        .geocode(&start.state, &start.city, &start.address)
        .await?;
    let end_coord = geocoder.geocode(&end.state, &end.city, &end.address).await?;

    let geometry = routes.fetch_route(start_coord, end_coord).await?;
    if geometry.is_empty() {
        return Err(PlanError::EmptyRoute);
    }

    let total_miles = geometry.total_miles();
    let waypoints = extract_waypoints(&geometry, config.spacing_miles);
    let contexts = build_waypoint_contexts(&waypoints, stations, references, config);
    let outcome = plan_stops(&contexts, total_miles, stations, config, cancel)?;
    let summary = summarize(&outcome.stops, total_miles, config.fill_gallons);

    Ok(TripPlan {
        stranded_risk: outcome.stranded_risk(),
        stranded_at: outcome.stranded_at,
        stops: outcome.stops,
        total_cost: summary.total_cost,
        total_distance_miles: summary.total_distance_miles,
        number_of_stops: summary.number_of_stops,
        generated_at: Utc::now(),
    })
}
