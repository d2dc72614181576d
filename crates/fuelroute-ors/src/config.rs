//! Adapter configuration from environment.

use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct OrsConfig {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Duration,
}

impl OrsConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("ORS_API_KEY").unwrap_or_default(),
            base_url: env::var("ORS_BASE_URL")
                .unwrap_or_else(|_| "https://api.openrouteservice.org".to_string()),
            request_timeout: Duration::from_secs(
                env::var("ORS_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
        }
    }
}

impl Default for OrsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openrouteservice.org".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}
