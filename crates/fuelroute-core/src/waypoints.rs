//! Resampling of a route geometry into evenly spaced waypoints.

use crate::models::{RouteGeometry, Waypoint};
use crate::spatial::haversine_miles;

/// Walk the geometry and emit a waypoint roughly every `spacing_miles`.
///
/// Consecutive point distances accumulate until they reach the spacing, at
/// which point the current geometry point becomes a waypoint and the
/// accumulator resets. The final geometry point is always appended if it was
/// not the last emission, so the destination is represented in every result.
///
/// Each waypoint records the distance actually driven since the previous
/// waypoint and its cumulative position along the route; the planner advances
/// its state by these values.
///
/// Deterministic: identical geometry and spacing always yield identical
/// waypoints. An empty geometry yields no waypoints; a geometry shorter than
/// the spacing yields exactly one (the destination).
pub fn extract_waypoints(geometry: &RouteGeometry, spacing_miles: f64) -> Vec<Waypoint> {
    let points = geometry.points();
    let mut waypoints = Vec::new();
    let Some(&destination) = points.last() else {
        return waypoints;
    };

    let mut since_last = 0.0;
    let mut route_miles = 0.0;
    for pair in points.windows(2) {
        // Duplicate consecutive points contribute zero and fall through.
        let segment = haversine_miles(pair[0], pair[1]);
        since_last += segment;
        route_miles += segment;
        if since_last >= spacing_miles {
            waypoints.push(Waypoint {
                coord: pair[1],
                leg_miles: since_last,
                route_miles,
            });
            since_last = 0.0;
        }
    }

    let destination_emitted = matches!(
        waypoints.last(),
        Some(last) if last.coord == destination && since_last == 0.0
    );
    if !destination_emitted {
        waypoints.push(Waypoint {
            coord: destination,
            leg_miles: since_last,
            route_miles,
        });
    }

    waypoints
}
