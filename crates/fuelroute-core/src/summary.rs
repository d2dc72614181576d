//! Aggregate cost and distance for a finished stop list.

use serde::{Deserialize, Serialize};

use crate::models::Stop;

/// Totals over one planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    pub total_cost: f64,
    pub total_distance_miles: f64,
    pub number_of_stops: usize,
}

/// Assumes each stop fills `fill_gallons` at the station's posted price.
pub fn summarize(stops: &[Stop], total_distance_miles: f64, fill_gallons: f64) -> TripSummary {
    let total_cost = stops
        .iter()
        .map(|stop| stop.station.price_per_gallon * fill_gallons)
        .sum();
    TripSummary {
        total_cost,
        total_distance_miles,
        number_of_stops: stops.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, FuelStation, StopReason};

    fn stop(price: f64) -> Stop {
        Stop {
            station: FuelStation {
                name: "stop".to_string(),
                state: "OK".to_string(),
                city: "x".to_string(),
                address: "y".to_string(),
                price_per_gallon: price,
                coord: Coordinate::new(35.0, -97.0),
            },
            distance_miles: 2.0,
            route_miles: 100.0,
            reason: StopReason::Opportunistic,
        }
    }

    #[test]
    fn empty_stop_list_costs_nothing() {
        let summary = summarize(&[], 312.5, 50.0);
        assert_eq!(summary.total_cost, 0.0);
        assert_eq!(summary.number_of_stops, 0);
        assert_eq!(summary.total_distance_miles, 312.5);
    }

    #[test]
    fn cost_sums_over_stops() {
        let stops = vec![stop(3.00), stop(3.20)];
        let summary = summarize(&stops, 1000.0, 50.0);
        assert!((summary.total_cost - 310.0).abs() < 1e-9);
        assert_eq!(summary.number_of_stops, 2);
    }
}
