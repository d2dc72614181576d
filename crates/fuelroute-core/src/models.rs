//! Core data models for fuel-stop route planning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::spatial::haversine_miles;

/// A point on Earth in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Ordered path from route start to end, as decoded coordinates.
///
/// Produced by the routing provider and consumed read-only. Encoding to and
/// from the compact polyline format happens at the provider boundary, not
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    points: Vec<Coordinate>,
}

impl RouteGeometry {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total path length in miles, summed over consecutive point pairs.
    pub fn total_miles(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| haversine_miles(pair[0], pair[1]))
            .sum()
    }
}

/// A sampled point along the route geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub coord: Coordinate,
    /// Distance actually driven since the previous waypoint (or the route
    /// start, for the first waypoint).
    pub leg_miles: f64,
    /// Cumulative distance from the route start.
    pub route_miles: f64,
}

/// Catalog row for a known reference city, before geocoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub state: String,
    pub city: String,
    pub address: String,
}

/// Catalog row for a fuel station, before geocoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationRecord {
    pub name: String,
    pub state: String,
    pub city: String,
    pub address: String,
    pub price_per_gallon: f64,
}

/// A reference city with its resolved position, used to attribute waypoints
/// to a state by proximity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceLocation {
    pub state: String,
    pub city: String,
    pub address: String,
    pub coord: Coordinate,
}

/// A fuel station with its resolved position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelStation {
    pub name: String,
    pub state: String,
    pub city: String,
    pub address: String,
    pub price_per_gallon: f64,
    pub coord: Coordinate,
}

/// Why the planner decided to refuel at a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopReason {
    /// Range risk left no choice
    Forced,
    /// Current price beat the lookahead estimate by the configured margin
    Opportunistic,
}

/// A refueling stop appended by the planner. Immutable once appended; the
/// stop list preserves route order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stop {
    pub station: FuelStation,
    /// Detour distance from the waypoint where the stop was decided.
    pub distance_miles: f64,
    /// Position along the route at which the stop was decided.
    pub route_miles: f64,
    pub reason: StopReason,
}

/// The full result of one planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPlan {
    pub stops: Vec<Stop>,
    pub total_cost: f64,
    pub total_distance_miles: f64,
    pub number_of_stops: usize,
    /// True when a forced refuel found no station in reach, even after
    /// widening the search radius. The plan is still returned so the caller
    /// can see what was possible.
    pub stranded_risk: bool,
    /// Waypoint indexes where a forced refuel came up empty.
    pub stranded_at: Vec<usize>,
    pub generated_at: DateTime<Utc>,
}
