//! Nearest-reference-location lookup used to attribute a waypoint to a state.

use serde::{Deserialize, Serialize};

use crate::models::{Coordinate, ReferenceLocation};
use crate::spatial::haversine_miles;

/// Immutable index of resolved reference cities.
///
/// Built once per catalog (see [`crate::catalog::resolve_references`]); every
/// lookup afterwards is a pure nearest-neighbor scan with no external calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceIndex {
    references: Vec<ReferenceLocation>,
}

impl ReferenceIndex {
    pub fn new(references: Vec<ReferenceLocation>) -> Self {
        Self { references }
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// State of the closest reference city, ties broken by input order.
    /// `None` when the index holds no references.
    pub fn nearest_state(&self, coord: Coordinate) -> Option<&str> {
        let mut min_distance = f64::INFINITY;
        let mut state = None;
        for reference in &self.references {
            let distance = haversine_miles(coord, reference.coord);
            if distance < min_distance {
                min_distance = distance;
                state = Some(reference.state.as_str());
            }
        }
        state
    }
}
