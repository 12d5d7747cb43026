//! Offline providers backed by a JSON fixture.
//!
//! Serves geocoding, directions and station lookups from a single file so
//! the server and its tests run without API keys. Unknown routes fall back
//! to a straight line between the endpoints.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Deserialize;

use crate::domain::{
    BoundingBox, ChargingStation, DomainError, GeoPoint, Polyline, StationId, distance_km,
};

use super::{Directions, DirectionsProvider, Geocoder, ProviderError, StationDirectory};

/// Registered routes match requests whose endpoints are this close.
const ENDPOINT_MATCH_KM: f64 = 1.0;

/// Speed used to time straight-line fallback routes.
const FALLBACK_SPEED_KPH: f64 = 100.0;

/// Error loading a mock fixture.
#[derive(Debug, thiserror::Error)]
pub enum MockDataError {
    #[error("failed to read mock data: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse mock data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid mock data: {0}")]
    Domain(#[from] DomainError),

    #[error("invalid station id in mock data: {0}")]
    StationId(#[from] crate::domain::InvalidStationId),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fixture {
    #[serde(default)]
    places: HashMap<String, PointRecord>,
    #[serde(default)]
    routes: Vec<RouteRecord>,
    #[serde(default)]
    stations: Vec<StationRecord>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct PointRecord {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteRecord {
    from: PointRecord,
    to: PointRecord,
    /// `[lat, lng]` pairs.
    polyline: Vec<[f64; 2]>,
    distance_km: Option<f64>,
    duration_minutes: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StationRecord {
    id: String,
    name: String,
    lat: f64,
    lng: f64,
    #[serde(default)]
    connectors: Vec<String>,
    max_kw: f64,
    #[serde(default = "operational_default")]
    operational: bool,
}

fn operational_default() -> bool {
    true
}

/// In-memory geocoder, directions provider and station directory.
#[derive(Debug)]
pub struct MockProviders {
    /// Keyed by lowercased, trimmed place name.
    places: HashMap<String, GeoPoint>,
    routes: Vec<Directions>,
    stations: Vec<Arc<ChargingStation>>,
    calls: AtomicUsize,
}

impl MockProviders {
    /// Load a fixture file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MockDataError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Parse a fixture from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, MockDataError> {
        let fixture: Fixture = serde_json::from_str(json)?;

        let places = fixture
            .places
            .into_iter()
            .map(|(name, p)| Ok((normalize(&name), GeoPoint::checked(p.lat, p.lng)?)))
            .collect::<Result<HashMap<_, _>, DomainError>>()?;

        let mut routes = Vec::with_capacity(fixture.routes.len());
        for record in fixture.routes {
            let mut points = Vec::with_capacity(record.polyline.len() + 2);
            points.push(GeoPoint::checked(record.from.lat, record.from.lng)?);
            for [lat, lng] in record.polyline {
                points.push(GeoPoint::checked(lat, lng)?);
            }
            points.push(GeoPoint::checked(record.to.lat, record.to.lng)?);
            points.dedup();

            let polyline = Polyline::new(points)?;
            let distance = record.distance_km.unwrap_or_else(|| polyline.length_km());
            routes.push(Directions {
                total_duration_minutes: record
                    .duration_minutes
                    .unwrap_or(distance / FALLBACK_SPEED_KPH * 60.0),
                total_distance_km: distance,
                polyline,
            });
        }

        let stations = fixture
            .stations
            .into_iter()
            .map(|s| {
                Ok(Arc::new(ChargingStation::new(
                    StationId::new(s.id)?,
                    s.name,
                    GeoPoint::checked(s.lat, s.lng)?,
                    s.connectors,
                    s.max_kw,
                    s.operational,
                )?))
            })
            .collect::<Result<Vec<_>, MockDataError>>()?;

        Ok(Self {
            places,
            routes,
            stations,
            calls: AtomicUsize::new(0),
        })
    }

    /// Number of lookups served so far, across all three interfaces.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// All stations in the fixture.
    pub fn stations(&self) -> &[Arc<ChargingStation>] {
        &self.stations
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

fn normalize(place: &str) -> String {
    place.trim().to_lowercase()
}

impl Geocoder for MockProviders {
    async fn resolve(&self, place: &str) -> Result<GeoPoint, ProviderError> {
        self.record_call();
        self.places
            .get(&normalize(place))
            .copied()
            .ok_or_else(|| ProviderError::NotFound(place.to_string()))
    }
}

impl DirectionsProvider for MockProviders {
    async fn route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<Directions, ProviderError> {
        self.record_call();

        let registered = self.routes.iter().find(|r| {
            distance_km(r.polyline.start(), origin) <= ENDPOINT_MATCH_KM
                && distance_km(r.polyline.end(), destination) <= ENDPOINT_MATCH_KM
        });
        if let Some(directions) = registered {
            return Ok(directions.clone());
        }

        let polyline =
            Polyline::new(vec![origin, destination]).map_err(|_| ProviderError::NoRoute {
                from: origin,
                to: destination,
            })?;
        let distance = polyline.length_km();
        Ok(Directions {
            polyline,
            total_distance_km: distance,
            total_duration_minutes: distance / FALLBACK_SPEED_KPH * 60.0,
        })
    }
}

impl StationDirectory for MockProviders {
    async fn stations_near(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<Arc<ChargingStation>>, ProviderError> {
        self.record_call();
        Ok(self
            .stations
            .iter()
            .filter(|s| distance_km(s.location, center) <= radius_km)
            .cloned()
            .collect())
    }

    async fn stations_in_bounding_box(
        &self,
        bbox: BoundingBox,
    ) -> Result<Vec<Arc<ChargingStation>>, ProviderError> {
        self.record_call();
        Ok(self
            .stations
            .iter()
            .filter(|s| bbox.contains(s.location))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const FIXTURE: &str = "data/mock_corridor.json";

    #[tokio::test]
    async fn load_fixture_file() {
        let mock = MockProviders::from_file(FIXTURE).unwrap();
        assert!(!mock.stations().is_empty());

        let seattle = mock.resolve("Seattle, WA").await.unwrap();
        assert!((seattle.lat - 47.6062).abs() < 1e-4);
    }

    #[tokio::test]
    async fn geocoding_ignores_case_and_whitespace() {
        let mock = MockProviders::from_file(FIXTURE).unwrap();
        let a = mock.resolve("  seattle, wa ").await.unwrap();
        let b = mock.resolve("SEATTLE, WA").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn unknown_place_is_not_found() {
        let mock = MockProviders::from_file(FIXTURE).unwrap();
        let err = mock.resolve("Atlantis").await.unwrap_err();
        assert_eq!(err, ProviderError::NotFound("Atlantis".into()));
    }

    #[tokio::test]
    async fn registered_route_is_served() {
        let mock = MockProviders::from_file(FIXTURE).unwrap();
        let origin = mock.resolve("Seattle, WA").await.unwrap();
        let destination = mock.resolve("Boise, ID").await.unwrap();

        let directions = mock.route(origin, destination).await.unwrap();
        assert!(directions.polyline.points().len() > 2);
        assert!(directions.total_distance_km > 700.0);
    }

    #[tokio::test]
    async fn unknown_route_falls_back_to_straight_line() {
        let mock = MockProviders::from_json("{}").unwrap();
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);

        let directions = mock.route(a, b).await.unwrap();
        assert_eq!(directions.polyline.points(), &[a, b]);
        assert!((directions.total_distance_km - distance_km(a, b)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn identical_endpoints_give_zero_length_route() {
        let mock = MockProviders::from_json("{}").unwrap();
        let a = GeoPoint::new(10.0, 10.0);

        let directions = mock.route(a, a).await.unwrap();
        assert_eq!(directions.total_distance_km, 0.0);
    }

    #[tokio::test]
    async fn station_lookups_filter_by_area() {
        let json = r#"{
            "stations": [
                {"id": "A", "name": "Near", "lat": 0.0, "lng": 0.01, "maxKw": 150},
                {"id": "B", "name": "Far", "lat": 5.0, "lng": 5.0, "maxKw": 50, "operational": false}
            ]
        }"#;
        let mock = MockProviders::from_json(json).unwrap();

        let near = mock.stations_near(GeoPoint::new(0.0, 0.0), 10.0).await.unwrap();
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].id.as_str(), "A");
        assert!(near[0].operational);

        let bbox = BoundingBox {
            min_lat: 4.0,
            min_lng: 4.0,
            max_lat: 6.0,
            max_lng: 6.0,
        };
        let inside = mock.stations_in_bounding_box(bbox).await.unwrap();
        assert_eq!(inside.len(), 1);
        assert!(!inside[0].operational);

        assert_eq!(mock.call_count(), 2);
    }

    #[test]
    fn rejects_invalid_station() {
        let json = r#"{"stations": [{"id": "A", "name": "x", "lat": 0, "lng": 0, "maxKw": 0}]}"#;
        assert!(matches!(
            MockProviders::from_json(json),
            Err(MockDataError::Domain(_))
        ));
    }

    #[test]
    fn load_from_temp_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"places": {{"Home": {{"lat": 51.5, "lng": -0.12}}}}}}"#
        )
        .unwrap();

        let mock = MockProviders::from_file(file.path()).unwrap();
        assert_eq!(mock.places.len(), 1);
        assert!(mock.stations().is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = MockProviders::from_file("does/not/exist.json").unwrap_err();
        assert!(matches!(err, MockDataError::Io(_)));
    }
}
