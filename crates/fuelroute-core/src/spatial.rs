//! Great-circle distance math shared by the planner components.

use crate::models::Coordinate;

pub const EARTH_RADIUS_KM: f64 = 6_371.0;
const MILES_PER_KM: f64 = 0.621371;

/// Calculate the distance between two points in miles using the Haversine
/// formula.
///
/// This is the standard formula for great-circle distance between two points
/// on a sphere given their latitudes and longitudes. Symmetric, zero on
/// identical points.
pub fn haversine_miles(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let central = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * central * MILES_PER_KM
}
