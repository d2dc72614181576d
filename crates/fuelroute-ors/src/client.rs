//! OpenRouteService HTTP client.

use std::time::Duration;

use dashmap::DashMap;
use fuelroute_core::{Coordinate, Geocoder, ProviderError, RouteGeometry, RouteSource};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use crate::config::OrsConfig;
use crate::polyline::decode_polyline;
use crate::retry::{with_retry, RetryPolicy};

type GeocodeKey = (String, String, String);

/// HTTP client for the ORS geocoding and directions APIs.
///
/// Geocode results are stable per (state, city, address), so they are cached
/// on the client for the lifetime of the instance; resolving a catalog twice
/// never repeats a request.
pub struct OrsClient {
    client: Client,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
    geocode_cache: DashMap<GeocodeKey, Coordinate>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<GeocodeFeature>,
}

#[derive(Debug, Deserialize)]
struct GeocodeFeature {
    geometry: PointGeometry,
}

#[derive(Debug, Deserialize)]
struct PointGeometry {
    /// GeoJSON order: [lon, lat]
    coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    geometry: String,
}

impl OrsClient {
    pub fn new(config: &OrsConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(config.request_timeout)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            retry: RetryPolicy::default(),
            geocode_cache: DashMap::new(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn geocode_fetch(
        &self,
        state: &str,
        city: &str,
        address: &str,
    ) -> Result<Coordinate, ProviderError> {
        let query = format!("{address}, {city}, {state}");
        let url = format!("{}/geocode/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("text", query.as_str()),
                ("boundary.country", "US"),
            ])
            .send()
            .await
            .map_err(transport_error)?;
        let body: GeocodeResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(transport_error)?;

        let Some(feature) = body.features.into_iter().next() else {
            return Err(ProviderError::NotFound { query });
        };
        coordinate_from(&feature.geometry.coordinates).ok_or_else(|| ProviderError::Service {
            message: "malformed geocode geometry".to_string(),
            retryable: false,
        })
    }

    async fn directions_fetch(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RouteGeometry, ProviderError> {
        let url = format!("{}/v2/directions/driving-car", self.base_url);
        let payload = serde_json::json!({
            "coordinates": [[start.lon, start.lat], [end.lon, end.lat]],
            "instructions": false,
        });
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.api_key.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;
        let body: DirectionsResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(transport_error)?;

        let Some(route) = body.routes.into_iter().next() else {
            return Err(ProviderError::NotFound {
                query: format!(
                    "route {:.4},{:.4} -> {:.4},{:.4}",
                    start.lat, start.lon, end.lat, end.lon
                ),
            });
        };
        decode_polyline(&route.geometry).map_err(|err| ProviderError::Service {
            message: err.to_string(),
            retryable: false,
        })
    }
}

impl Geocoder for OrsClient {
    async fn geocode(
        &self,
        state: &str,
        city: &str,
        address: &str,
    ) -> Result<Coordinate, ProviderError> {
        let key = (state.to_string(), city.to_string(), address.to_string());
        if let Some(cached) = self.geocode_cache.get(&key) {
            return Ok(*cached);
        }
        let coord = with_retry(&self.retry, || self.geocode_fetch(state, city, address)).await?;
        tracing::debug!(state, city, "geocoded address");
        self.geocode_cache.insert(key, coord);
        Ok(coord)
    }
}

impl RouteSource for OrsClient {
    async fn fetch_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<RouteGeometry, ProviderError> {
        with_retry(&self.retry, || self.directions_fetch(start, end)).await
    }
}

fn coordinate_from(raw: &[f64]) -> Option<Coordinate> {
    match raw {
        [lon, lat, ..] => Some(Coordinate::new(*lat, *lon)),
        _ => None,
    }
}

async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs);
        return Err(ProviderError::RateLimited { retry_after });
    }
    let message = format!(
        "HTTP {}: {}",
        status.as_u16(),
        response.text().await.unwrap_or_default()
    );
    Err(ProviderError::Service {
        message,
        retryable: status.is_server_error(),
    })
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    ProviderError::Service {
        message: err.to_string(),
        retryable: err.is_timeout() || err.is_connect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_from_swaps_geojson_order() {
        let coord = coordinate_from(&[-95.99, 36.15]).unwrap();
        assert_eq!(coord.lat, 36.15);
        assert_eq!(coord.lon, -95.99);
        assert!(coordinate_from(&[1.0]).is_none());
    }

    #[tokio::test]
    async fn cached_geocode_skips_the_network() {
        // Nothing listens on this address; a cache miss would error out.
        let config = OrsConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..OrsConfig::default()
        };
        let client = OrsClient::new(&config).with_retry_policy(RetryPolicy {
            max_attempts: 1,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
            jitter_ratio: 0.0,
        });
        client.geocode_cache.insert(
            (
                "OK".to_string(),
                "Big Cabin".to_string(),
                "1-44, EXIT 283 & US-69".to_string(),
            ),
            Coordinate::new(36.54, -95.22),
        );
        let coord = client
            .geocode("OK", "Big Cabin", "1-44, EXIT 283 & US-69")
            .await
            .unwrap();
        assert_eq!(coord.lat, 36.54);
    }
}
