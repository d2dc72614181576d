//! Fuel-stop decision engine.
//!
//! Planning runs in two phases. Candidate precomputation reads only the
//! immutable station/reference indexes and has no ordering requirements, so
//! it can run ahead of time (or concurrently) for every waypoint. The fold
//! over those contexts is strictly sequential: each refuel decision depends
//! on the range left over from all prior waypoints.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::catalog::StationIndex;
use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::models::{Coordinate, Stop, StopReason, Waypoint};
use crate::region::ReferenceIndex;
use crate::spatial::haversine_miles;

/// Forced refuel fires when remaining range drops below this fraction of the
/// full vehicle range (or below the distance to the finish, if shorter).
const RESERVE_RANGE_FRACTION: f64 = 0.2;

/// Applied once to the search radius when a forced refuel finds nothing.
const WIDENED_RADIUS_FACTOR: f64 = 2.0;

/// Cooperative cancellation handle, checked between waypoint iterations.
///
/// The synchronous fold cannot listen on a channel, so callers set the flag
/// from wherever their shutdown signal arrives.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A station within search radius of a waypoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Index into the [`StationIndex`]
    pub station: usize,
    pub price_per_gallon: f64,
    pub distance_miles: f64,
}

/// Everything the fold needs to decide one waypoint, precomputed.
#[derive(Debug, Clone)]
pub struct WaypointContext {
    pub waypoint: Waypoint,
    /// In-radius candidates, ascending by (price, distance)
    pub candidates: Vec<Candidate>,
    /// Candidates at the widened radius; only populated when `candidates`
    /// is empty, as the forced-refuel escape hatch
    pub fallback: Vec<Candidate>,
    /// Mean price pooled over the next few waypoints' in-radius stations,
    /// infinite when nothing lies ahead
    pub lookahead_avg: f64,
}

/// What one planning run produced.
#[derive(Debug, Clone, Default)]
pub struct PlanOutcome {
    pub stops: Vec<Stop>,
    /// Waypoint indexes where a forced refuel found no station, even after
    /// widening the search radius
    pub stranded_at: Vec<usize>,
    /// Range left in the tank at the destination
    pub remaining_range_miles: f64,
}

impl PlanOutcome {
    pub fn stranded_risk(&self) -> bool {
        !self.stranded_at.is_empty()
    }
}

#[derive(Debug, Clone)]
struct PlannerState {
    remaining_range: f64,
    covered_miles: f64,
}

fn candidates_near(
    stations: &StationIndex,
    state: &str,
    around: Coordinate,
    radius_miles: f64,
) -> Vec<Candidate> {
    stations
        .in_state(state)
        .filter_map(|(index, station)| {
            let distance_miles = haversine_miles(around, station.coord);
            (distance_miles <= radius_miles).then(|| Candidate {
                station: index,
                price_per_gallon: station.price_per_gallon,
                distance_miles,
            })
        })
        .collect()
}

fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        a.price_per_gallon
            .total_cmp(&b.price_per_gallon)
            .then(a.distance_miles.total_cmp(&b.distance_miles))
    });
}

/// Precompute candidates and the lookahead price estimate for each waypoint.
///
/// Pure over the immutable indexes; never touches planner state.
pub fn build_waypoint_contexts(
    waypoints: &[Waypoint],
    stations: &StationIndex,
    references: &ReferenceIndex,
    config: &PlannerConfig,
) -> Vec<WaypointContext> {
    waypoints
        .iter()
        .enumerate()
        .map(|(i, waypoint)| {
            let state = references.nearest_state(waypoint.coord);
            let mut candidates = state
                .map(|s| candidates_near(stations, s, waypoint.coord, config.search_radius_miles))
                .unwrap_or_default();
            sort_candidates(&mut candidates);

            let fallback = if candidates.is_empty() {
                let mut widened = state
                    .map(|s| {
                        candidates_near(
                            stations,
                            s,
                            waypoint.coord,
                            config.search_radius_miles * WIDENED_RADIUS_FACTOR,
                        )
                    })
                    .unwrap_or_default();
                sort_candidates(&mut widened);
                widened
            } else {
                Vec::new()
            };

            // Pool prices over the next few waypoints. A station in radius of
            // two of them counts twice, weighting the mean toward stretches
            // with steady coverage.
            let mut pooled = Vec::new();
            for future in waypoints.iter().skip(i + 1).take(config.lookahead_waypoints) {
                if let Some(s) = references.nearest_state(future.coord) {
                    pooled.extend(
                        candidates_near(stations, s, future.coord, config.search_radius_miles)
                            .iter()
                            .map(|c| c.price_per_gallon),
                    );
                }
            }
            let lookahead_avg = if pooled.is_empty() {
                f64::INFINITY
            } else {
                pooled.iter().sum::<f64>() / pooled.len() as f64
            };

            WaypointContext {
                waypoint: *waypoint,
                candidates,
                fallback,
                lookahead_avg,
            }
        })
        .collect()
}

/// Fold the precomputed contexts into an ordered stop list.
///
/// Starts with a full tank and zero distance covered. Each iteration drives
/// the leg into the waypoint, then decides:
///
/// - forced refuel when remaining range falls below the smaller of the
///   distance to the finish and the reserve fraction of the full range;
/// - opportunistic refuel when the cheapest nearby price beats the lookahead
///   average by the configured threshold.
///
/// A stop resets the remaining range to the full vehicle range. A forced
/// trigger with no candidate in reach (widened radius included) records the
/// waypoint in `stranded_at` instead of silently proceeding. No implicit
/// refuel is inserted at the destination.
pub fn plan_stops(
    contexts: &[WaypointContext],
    total_miles: f64,
    stations: &StationIndex,
    config: &PlannerConfig,
    cancel: &CancelFlag,
) -> Result<PlanOutcome, PlanError> {
    let mut state = PlannerState {
        remaining_range: config.vehicle_range_miles,
        covered_miles: 0.0,
    };
    let mut outcome = PlanOutcome::default();

    for (i, ctx) in contexts.iter().enumerate() {
        if cancel.is_cancelled() {
            return Err(PlanError::Cancelled);
        }

        state.remaining_range -= ctx.waypoint.leg_miles;
        state.covered_miles += ctx.waypoint.leg_miles;

        let distance_to_finish = total_miles - state.covered_miles;
        let reserve = config.vehicle_range_miles * RESERVE_RANGE_FRACTION;
        let forced = state.remaining_range < distance_to_finish.min(reserve);
        let opportunistic = ctx.candidates.first().is_some_and(|best| {
            best.price_per_gallon < ctx.lookahead_avg * (1.0 - config.cost_threshold)
        });

        if !(forced || opportunistic) {
            continue;
        }

        let pick = match ctx.candidates.first() {
            Some(best) => Some(best),
            None if forced => ctx.fallback.first(),
            None => None,
        };
        match pick {
            Some(best) => {
                outcome.stops.push(Stop {
                    station: stations.station(best.station).clone(),
                    distance_miles: best.distance_miles,
                    route_miles: ctx.waypoint.route_miles,
                    reason: if forced {
                        StopReason::Forced
                    } else {
                        StopReason::Opportunistic
                    },
                });
                state.remaining_range = config.vehicle_range_miles;
            }
            None => outcome.stranded_at.push(i),
        }
    }

    outcome.remaining_range_miles = state.remaining_range;
    Ok(outcome)
}
