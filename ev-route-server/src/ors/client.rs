//! OpenRouteService HTTP client.
//!
//! Provides async geocoding and driving directions. Handles authentication,
//! bounds concurrency, and converts responses to domain types.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::warn;

use crate::domain::GeoPoint;
use crate::providers::{Directions, DirectionsProvider, Geocoder, ProviderError};

use super::convert::{convert_directions, convert_geocode};
use super::error::OrsError;
use super::types::{DirectionsRequest, DirectionsResponse, GeocodeResponse};

/// Default base URL for the OpenRouteService API.
const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the OpenRouteService client.
#[derive(Debug, Clone)]
pub struct OrsConfig {
    /// API key sent in the `Authorization` header
    pub api_key: String,
    /// Base URL for the API (defaults to the public endpoint)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OrsConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// OpenRouteService API client.
///
/// Uses a semaphore to limit concurrent requests and avoid rate limiting.
#[derive(Debug, Clone)]
pub struct OrsClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl OrsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OrsConfig) -> Result<Self, OrsError> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&config.api_key).map_err(|_| OrsError::Api {
            status: 0,
            message: "Invalid API key format".to_string(),
        })?;
        headers.insert(AUTHORIZATION, api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Resolve free text to the best matching point.
    ///
    /// Returns `Ok(None)` when the geocoder has no match.
    pub async fn geocode(&self, text: &str) -> Result<Option<GeoPoint>, OrsError> {
        let _permit = self.permit().await?;

        let url = format!("{}/geocode/search", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("text", text), ("size", "1")])
            .send()
            .await?;

        let parsed: GeocodeResponse = read_json(response).await?;
        convert_geocode(&parsed).map_err(|e| OrsError::Json {
            message: e.to_string(),
        })
    }

    /// Driving directions between two points.
    pub async fn directions(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<Directions, OrsError> {
        let _permit = self.permit().await?;

        let url = format!("{}/v2/directions/driving-car/geojson", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&DirectionsRequest::between(origin, destination))
            .send()
            .await?;

        let parsed: DirectionsResponse = read_json(response).await?;
        convert_directions(&parsed).map_err(|e| OrsError::Json {
            message: e.to_string(),
        })
    }

    async fn permit(&self) -> Result<SemaphorePermit<'_>, OrsError> {
        self.semaphore.acquire().await.map_err(|_| OrsError::Api {
            status: 0,
            message: "Semaphore closed".to_string(),
        })
    }
}

/// Map error statuses, then parse the body.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, OrsError> {
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(OrsError::Unauthorized);
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(OrsError::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(OrsError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| OrsError::Json {
        message: e.to_string(),
    })
}

impl Geocoder for OrsClient {
    async fn resolve(&self, place: &str) -> Result<GeoPoint, ProviderError> {
        match self.geocode(place).await {
            Ok(Some(point)) => Ok(point),
            Ok(None) => Err(ProviderError::NotFound(place.to_string())),
            Err(e) => {
                warn!(place, error = %e, "Geocoding failed");
                Err(e.into())
            }
        }
    }
}

impl DirectionsProvider for OrsClient {
    async fn route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<Directions, ProviderError> {
        match self.directions(origin, destination).await {
            Ok(directions) => Ok(directions),
            Err(OrsError::Api { status: 404, .. }) => Err(ProviderError::NoRoute {
                from: origin,
                to: destination,
            }),
            Err(e) => {
                warn!(%origin, %destination, error = %e, "Directions request failed");
                Err(e.into())
            }
        }
    }
}
