//! Open Charge Map HTTP client.

use std::collections::HashSet;
use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::{BoundingBox, ChargingStation, GeoPoint};
use crate::providers::{ProviderError, StationDirectory};

use super::convert::convert_pois;
use super::error::OcmError;
use super::types::PoiDto;

/// Default base URL for the Open Charge Map API.
const DEFAULT_BASE_URL: &str = "https://api.openchargemap.io/v3";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default tile edge, in degrees, for bounding-box lookups.
const DEFAULT_TILE_DEGREES: f64 = 2.0;

/// Most tiles along either axis of one bounding-box lookup.
const MAX_TILES_PER_AXIS: usize = 8;

/// Configuration for the Open Charge Map client.
#[derive(Debug, Clone)]
pub struct OcmConfig {
    /// API key for the `X-API-Key` header. Open Charge Map allows
    /// anonymous requests at a lower rate limit.
    pub api_key: Option<String>,
    /// Base URL for the API
    pub base_url: String,
    /// Result cap for radius queries
    pub max_results_near: u32,
    /// Result cap for each bounding-box tile
    pub max_results_bbox: u32,
    /// Bounding boxes are split into tiles at most this many degrees on a side
    pub tile_degrees: f64,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OcmConfig {
    /// Create a new config with an optional API key.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_results_near: 100,
            max_results_bbox: 200,
            tile_degrees: DEFAULT_TILE_DEGREES,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the result cap for each bounding-box tile.
    pub fn with_max_results_bbox(mut self, n: u32) -> Self {
        self.max_results_bbox = n;
        self
    }

    /// Set the tile edge for bounding-box lookups.
    pub fn with_tile_degrees(mut self, degrees: f64) -> Self {
        self.tile_degrees = degrees;
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

impl Default for OcmConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Client for the Open Charge Map POI API.
#[derive(Debug, Clone)]
pub struct OcmClient {
    http: reqwest::Client,
    base_url: String,
    max_results_near: u32,
    max_results_bbox: u32,
    tile_degrees: f64,
    semaphore: Arc<Semaphore>,
}

impl OcmClient {
    /// Create a new Open Charge Map client.
    pub fn new(config: OcmConfig) -> Result<Self, OcmError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let value = HeaderValue::from_str(key).map_err(|_| OcmError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            })?;
            headers.insert(HeaderName::from_static("x-api-key"), value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_results_near: config.max_results_near,
            max_results_bbox: config.max_results_bbox,
            tile_degrees: config.tile_degrees,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Stations within `radius_km` of `center`.
    pub async fn find_near(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<Arc<ChargingStation>>, OcmError> {
        let pois = self
            .fetch_pois(&near_query(center, radius_km, self.max_results_near))
            .await?;
        if pois.len() >= self.max_results_near as usize {
            warn!(
                %center,
                radius_km,
                max_results = self.max_results_near,
                "Station lookup hit the result cap, some stations may be missing"
            );
        }
        Ok(convert_pois(&pois))
    }

    /// Stations inside `bbox`.
    ///
    /// Large boxes are fetched as a grid of tiles so that the per-request
    /// result cap applies to each tile rather than the whole box. Stations
    /// returned by more than one tile are kept once.
    pub async fn find_in_bounding_box(
        &self,
        bbox: BoundingBox,
    ) -> Result<Vec<Arc<ChargingStation>>, OcmError> {
        let (rows, cols) = self.tile_grid(&bbox);
        let tiles = bbox.tiles(rows, cols);

        let batches = futures::future::try_join_all(
            tiles.iter().map(|tile| self.fetch_tile(*tile)),
        )
        .await?;

        let mut seen = HashSet::new();
        let pois: Vec<PoiDto> = batches
            .into_iter()
            .flatten()
            .filter(|poi| seen.insert(poi.id))
            .collect();

        debug!(tiles = tiles.len(), pois = pois.len(), "Fetched stations in bounding box");
        Ok(convert_pois(&pois))
    }

    async fn fetch_tile(&self, tile: BoundingBox) -> Result<Vec<PoiDto>, OcmError> {
        let pois = self
            .fetch_pois(&bbox_query(tile, self.max_results_bbox))
            .await?;
        if pois.len() >= self.max_results_bbox as usize {
            warn!(
                ?tile,
                max_results = self.max_results_bbox,
                "Station lookup hit the result cap, some stations may be missing"
            );
        }
        Ok(pois)
    }

    /// Rows and columns of tiles covering `bbox`.
    fn tile_grid(&self, bbox: &BoundingBox) -> (usize, usize) {
        let count = |span: f64| {
            ((span / self.tile_degrees).ceil() as usize).clamp(1, MAX_TILES_PER_AXIS)
        };
        (
            count(bbox.max_lat - bbox.min_lat),
            count(bbox.max_lng - bbox.min_lng),
        )
    }

    async fn fetch_pois(&self, query: &[(&str, String)]) -> Result<Vec<PoiDto>, OcmError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| OcmError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/poi", self.base_url);
        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(OcmError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(OcmError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OcmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| OcmError::Json {
            message: e.to_string(),
        })
    }
}

/// Query parameters shared by both lookups.
fn common_params(max_results: u32) -> [(&'static str, String); 3] {
    [
        ("maxresults", max_results.to_string()),
        // Full objects carry the nested connection and status records.
        ("compact", "false".to_string()),
        ("verbose", "false".to_string()),
    ]
}

fn near_query(center: GeoPoint, radius_km: f64, max_results: u32) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("latitude", center.lat.to_string()),
        ("longitude", center.lng.to_string()),
        ("distance", radius_km.to_string()),
        ("distanceunit", "KM".to_string()),
    ];
    query.extend(common_params(max_results));
    query
}

fn bbox_query(bbox: BoundingBox, max_results: u32) -> Vec<(&'static str, String)> {
    let mut query = vec![(
        "boundingbox",
        format!(
            "({},{}),({},{})",
            bbox.min_lat, bbox.min_lng, bbox.max_lat, bbox.max_lng
        ),
    )];
    query.extend(common_params(max_results));
    query
}

impl StationDirectory for OcmClient {
    async fn stations_near(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<Arc<ChargingStation>>, ProviderError> {
        self.find_near(center, radius_km).await.map_err(|e| {
            warn!(%center, radius_km, error = %e, "Station lookup failed");
            e.into()
        })
    }

    async fn stations_in_bounding_box(
        &self,
        bbox: BoundingBox,
    ) -> Result<Vec<Arc<ChargingStation>>, ProviderError> {
        self.find_in_bounding_box(bbox).await.map_err(|e| {
            warn!(?bbox, error = %e, "Station lookup failed");
            e.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(query: &'a [(&str, String)], key: &str) -> Option<&'a str> {
        query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn config_defaults() {
        let config = OcmConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.api_key.is_none());
        assert_eq!(config.max_results_near, 100);
        assert_eq!(config.max_results_bbox, 200);
        assert_eq!(config.tile_degrees, 2.0);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn near_query_parameters() {
        let query = near_query(GeoPoint::new(46.5, -120.25), 10.0, 100);

        assert_eq!(param(&query, "latitude"), Some("46.5"));
        assert_eq!(param(&query, "longitude"), Some("-120.25"));
        assert_eq!(param(&query, "distance"), Some("10"));
        assert_eq!(param(&query, "distanceunit"), Some("KM"));
        assert_eq!(param(&query, "maxresults"), Some("100"));
        assert_eq!(param(&query, "compact"), Some("false"));
        assert_eq!(param(&query, "verbose"), Some("false"));
    }

    #[test]
    fn bbox_query_parameters() {
        let bbox = BoundingBox {
            min_lat: 43.5,
            min_lng: -122.5,
            max_lat: 47.75,
            max_lng: -116.0,
        };
        let query = bbox_query(bbox, 200);

        assert_eq!(param(&query, "boundingbox"), Some("(43.5,-122.5),(47.75,-116)"));
        assert_eq!(param(&query, "maxresults"), Some("200"));
        assert_eq!(param(&query, "compact"), Some("false"));
    }

    #[test]
    fn client_without_key() {
        assert!(OcmClient::new(OcmConfig::default()).is_ok());
        assert!(OcmClient::new(OcmConfig::new(Some(String::new()))).is_ok());
        assert!(OcmClient::new(OcmConfig::new(Some("bad\nkey".into()))).is_err());
    }

    fn bbox(min_lat: f64, min_lng: f64, max_lat: f64, max_lng: f64) -> BoundingBox {
        BoundingBox {
            min_lat,
            min_lng,
            max_lat,
            max_lng,
        }
    }

    #[test]
    fn tile_grid_scales_with_box() {
        let client = OcmClient::new(OcmConfig::default()).unwrap();

        assert_eq!(client.tile_grid(&bbox(46.0, -120.0, 46.5, -119.0)), (1, 1));
        assert_eq!(client.tile_grid(&bbox(43.5, -122.5, 47.75, -116.0)), (3, 4));
        // Boxes spanning every longitude stay bounded.
        assert_eq!(
            client.tile_grid(&bbox(-17.0, -180.0, -16.6, 180.0)),
            (1, MAX_TILES_PER_AXIS)
        );
    }

    /// Serves `/poi` with the same single POI for every request and
    /// records the bounding boxes asked for.
    async fn serve_single_poi() -> (String, Arc<std::sync::Mutex<Vec<String>>>) {
        use axum::{Json, Router, extract::Query, routing::get};
        use std::collections::HashMap;

        let requested = Arc::new(std::sync::Mutex::new(Vec::new()));
        let log = requested.clone();
        let app = Router::new().route(
            "/poi",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let log = log.clone();
                async move {
                    log.lock()
                        .unwrap()
                        .push(params.get("boundingbox").cloned().unwrap_or_default());
                    Json(serde_json::json!([{
                        "ID": 42,
                        "AddressInfo": {"Title": "Ontario Travel Plaza", "Latitude": 44.03, "Longitude": -116.96},
                        "Connections": [{"ConnectionType": {"Title": "CCS (Type 1)"}, "PowerKW": 150}],
                        "StatusType": {"IsOperational": true}
                    }]))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), requested)
    }

    #[tokio::test]
    async fn large_box_is_fetched_in_tiles() {
        let (base_url, requested) = serve_single_poi().await;
        let client = OcmClient::new(
            OcmConfig::default()
                .with_base_url(base_url)
                .with_max_results_bbox(1),
        )
        .unwrap();

        let stations = client
            .find_in_bounding_box(bbox(43.5, -122.5, 47.75, -116.0))
            .await
            .unwrap();

        let requested = requested.lock().unwrap().clone();
        assert_eq!(requested.len(), 12);
        let distinct: HashSet<_> = requested.iter().collect();
        assert_eq!(distinct.len(), 12);
        assert!(requested.iter().any(|b| b.starts_with("(43.5,-122.5),")));
        assert!(requested.iter().any(|b| b.ends_with(",(47.75,-116)")));

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].id.as_str(), "OCM-42");
    }

    #[tokio::test]
    async fn small_box_is_one_request() {
        let (base_url, requested) = serve_single_poi().await;
        let client = OcmClient::new(OcmConfig::default().with_base_url(base_url)).unwrap();

        let stations = client
            .find_in_bounding_box(bbox(44.0, -117.0, 44.5, -116.5))
            .await
            .unwrap();

        assert_eq!(requested.lock().unwrap().len(), 1);
        assert_eq!(stations.len(), 1);
    }
}
