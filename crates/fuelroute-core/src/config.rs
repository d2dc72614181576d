//! Planner configuration and thresholds.

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Configuration for one planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Spacing between sampled waypoints in miles
    pub spacing_miles: f64,
    /// Maximum distance travelable on a full tank
    pub vehicle_range_miles: f64,
    /// Radius around a waypoint searched for stations
    pub search_radius_miles: f64,
    /// Fractional price advantage required to refuel early (0.1 = 10% cheaper)
    pub cost_threshold: f64,
    /// How many upcoming waypoints feed the lookahead price estimate
    pub lookahead_waypoints: usize,
    /// Gallons assumed per fill when costing the trip
    pub fill_gallons: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            spacing_miles: 25.0,
            vehicle_range_miles: 500.0,
            search_radius_miles: 10.0,
            cost_threshold: 0.1,
            lookahead_waypoints: 2,
            fill_gallons: 50.0,
        }
    }
}

impl PlannerConfig {
    /// Reject invalid configuration before a run starts.
    pub fn validate(&self) -> Result<(), PlanError> {
        if !(self.spacing_miles > 0.0) {
            return Err(PlanError::InvalidConfig(format!(
                "spacing_miles must be positive, got {}",
                self.spacing_miles
            )));
        }
        if !(self.vehicle_range_miles > 0.0) {
            return Err(PlanError::InvalidConfig(format!(
                "vehicle_range_miles must be positive, got {}",
                self.vehicle_range_miles
            )));
        }
        if !(self.search_radius_miles > 0.0) {
            return Err(PlanError::InvalidConfig(format!(
                "search_radius_miles must be positive, got {}",
                self.search_radius_miles
            )));
        }
        if !(0.0..1.0).contains(&self.cost_threshold) {
            return Err(PlanError::InvalidConfig(format!(
                "cost_threshold must be in [0, 1), got {}",
                self.cost_threshold
            )));
        }
        if self.lookahead_waypoints == 0 {
            return Err(PlanError::InvalidConfig(
                "lookahead_waypoints must be at least 1".to_string(),
            ));
        }
        if !(self.fill_gallons > 0.0) {
            return Err(PlanError::InvalidConfig(format!(
                "fill_gallons must be positive, got {}",
                self.fill_gallons
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(PlannerConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_spacing() {
        let config = PlannerConfig {
            spacing_miles: 0.0,
            ..PlannerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PlanError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let config = PlannerConfig {
            cost_threshold: 1.0,
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = PlannerConfig {
            cost_threshold: -0.1,
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_nan_range() {
        let config = PlannerConfig {
            vehicle_range_miles: f64::NAN,
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
