//! One-time resolution of catalog records into immutable in-memory indexes.
//!
//! Geocoding a catalog row is expensive and stable, so it happens exactly
//! once per record here. Everything downstream (region lookups, candidate
//! filtering, lookahead pooling) reads the resolved indexes without touching
//! the network again.

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::models::{FuelStation, ReferenceRecord, StationRecord};
use crate::provider::Geocoder;
use crate::region::ReferenceIndex;

/// Immutable index of resolved fuel stations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationIndex {
    stations: Vec<FuelStation>,
}

impl StationIndex {
    pub fn new(stations: Vec<FuelStation>) -> Self {
        Self { stations }
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn station(&self, index: usize) -> &FuelStation {
        &self.stations[index]
    }

    /// Stations registered in the given state, with their index positions.
    pub fn in_state<'a>(
        &'a self,
        state: &'a str,
    ) -> impl Iterator<Item = (usize, &'a FuelStation)> + 'a {
        self.stations
            .iter()
            .enumerate()
            .filter(move |(_, station)| station.state == state)
    }
}

/// Resolve every station record through the geocoder, building the index.
///
/// A record whose address has no geocode result fails the build: the planner
/// cannot filter by distance against a station with an unknown position.
pub async fn resolve_stations<G: Geocoder>(
    geocoder: &G,
    records: &[StationRecord],
) -> Result<StationIndex, PlanError> {
    let mut stations = Vec::with_capacity(records.len());
    for record in records {
        let coord = geocoder
            .geocode(&record.state, &record.city, &record.address)
            .await?;
        stations.push(FuelStation {
            name: record.name.clone(),
            state: record.state.clone(),
            city: record.city.clone(),
            address: record.address.clone(),
            price_per_gallon: record.price_per_gallon,
            coord,
        });
    }
    Ok(StationIndex::new(stations))
}

/// Resolve every reference record through the geocoder, building the index.
pub async fn resolve_references<G: Geocoder>(
    geocoder: &G,
    records: &[ReferenceRecord],
) -> Result<ReferenceIndex, PlanError> {
    let mut references = Vec::with_capacity(records.len());
    for record in records {
        let coord = geocoder
            .geocode(&record.state, &record.city, &record.address)
            .await?;
        references.push(crate::models::ReferenceLocation {
            state: record.state.clone(),
            city: record.city.clone(),
            address: record.address.clone(),
            coord,
        });
    }
    Ok(ReferenceIndex::new(references))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::models::Coordinate;
    use std::collections::HashMap;

    struct TableGeocoder {
        table: HashMap<String, Coordinate>,
    }

    impl TableGeocoder {
        fn new(entries: &[(&str, f64, f64)]) -> Self {
            let table = entries
                .iter()
                .map(|(city, lat, lon)| (city.to_string(), Coordinate::new(*lat, *lon)))
                .collect();
            Self { table }
        }
    }

    impl Geocoder for TableGeocoder {
        async fn geocode(
            &self,
            _state: &str,
            city: &str,
            _address: &str,
        ) -> Result<Coordinate, ProviderError> {
            self.table
                .get(city)
                .copied()
                .ok_or_else(|| ProviderError::NotFound {
                    query: city.to_string(),
                })
        }
    }

    fn station_record(name: &str, city: &str, price: f64) -> StationRecord {
        StationRecord {
            name: name.to_string(),
            state: "OK".to_string(),
            city: city.to_string(),
            address: "I-40 Exit 1".to_string(),
            price_per_gallon: price,
        }
    }

    #[tokio::test]
    async fn resolves_each_record_once() {
        let geocoder = TableGeocoder::new(&[("Tulsa", 36.15, -95.99), ("El Reno", 35.53, -97.96)]);
        let records = vec![
            station_record("Flying J", "Tulsa", 3.15),
            station_record("Loves", "El Reno", 3.05),
        ];
        let index = resolve_stations(&geocoder, &records).await.unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.station(0).name, "Flying J");
        assert!((index.station(1).coord.lat - 35.53).abs() < 1e-9);
    }

    #[tokio::test]
    async fn unresolvable_record_fails_the_build() {
        let geocoder = TableGeocoder::new(&[]);
        let records = vec![station_record("Flying J", "Nowhere", 3.15)];
        let result = resolve_stations(&geocoder, &records).await;
        assert!(matches!(
            result,
            Err(PlanError::Provider(ProviderError::NotFound { .. }))
        ));
    }

    #[test]
    fn in_state_filters_by_state() {
        let mk = |state: &str| FuelStation {
            name: "stop".to_string(),
            state: state.to_string(),
            city: "x".to_string(),
            address: "y".to_string(),
            price_per_gallon: 3.0,
            coord: Coordinate::new(35.0, -97.0),
        };
        let index = StationIndex::new(vec![mk("OK"), mk("TX"), mk("OK")]);
        let in_ok: Vec<usize> = index.in_state("OK").map(|(i, _)| i).collect();
        assert_eq!(in_ok, vec![0, 2]);
    }
}
