pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod planner;
pub mod provider;
pub mod region;
pub mod spatial;
pub mod summary;
pub mod trip;
pub mod waypoints;

pub use catalog::{resolve_references, resolve_stations, StationIndex};
pub use config::PlannerConfig;
pub use error::{PlanError, ProviderError};
pub use models::{
    Coordinate, FuelStation, ReferenceLocation, ReferenceRecord, RouteGeometry, StationRecord,
    Stop, StopReason, TripPlan, Waypoint,
};
pub use planner::{
    build_waypoint_contexts, plan_stops, CancelFlag, Candidate, PlanOutcome, WaypointContext,
};
pub use provider::{Geocoder, RouteSource};
pub use region::ReferenceIndex;
pub use spatial::haversine_miles;
pub use summary::{summarize, TripSummary};
pub use trip::{plan_trip, PlaceQuery};
pub use waypoints::extract_waypoints;
