//! Provider backend selection.

use std::sync::Arc;

use tracing::info;

use crate::cache::CachedProvider;
use crate::config::AppConfig;
use crate::domain::{BoundingBox, ChargingStation, GeoPoint};
use crate::ocm::{OcmClient, OcmError};
use crate::ors::{OrsClient, OrsError};
use crate::providers::{
    Directions, DirectionsProvider, Geocoder, MockDataError, MockProviders, ProviderError,
    StationDirectory,
};

/// Error constructing a backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("ORS_API_KEY is required unless EV_ROUTE_MOCK_DATA is set")]
    MissingOrsKey,

    #[error("failed to create OpenRouteService client: {0}")]
    Ors(#[from] OrsError),

    #[error("failed to create Open Charge Map client: {0}")]
    Ocm(#[from] OcmError),

    #[error(transparent)]
    Mock(#[from] MockDataError),
}

/// The providers a running server talks to.
#[derive(Clone)]
pub enum Backend {
    /// Cached OpenRouteService and Open Charge Map clients.
    Live {
        ors: CachedProvider<OrsClient>,
        ocm: CachedProvider<OcmClient>,
    },
    /// Fixture-backed providers.
    Mock(Arc<MockProviders>),
}

impl Backend {
    /// Build the backend described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, BackendError> {
        if let Some(path) = &config.mock_data {
            let mock = MockProviders::from_file(path)?;
            info!(path = %path.display(), stations = mock.stations().len(), "Using mock providers");
            return Ok(Backend::Mock(Arc::new(mock)));
        }

        if config.ors.api_key.is_empty() {
            return Err(BackendError::MissingOrsKey);
        }

        let ors = OrsClient::new(config.ors.clone())?;
        let ocm = OcmClient::new(config.ocm.clone())?;
        info!(ors = %config.ors.base_url, ocm = %config.ocm.base_url, "Using live providers");

        Ok(Backend::Live {
            ors: CachedProvider::new(ors, &config.cache),
            ocm: CachedProvider::new(ocm, &config.cache),
        })
    }
}

impl Geocoder for Backend {
    async fn resolve(&self, place: &str) -> Result<GeoPoint, ProviderError> {
        match self {
            Backend::Live { ors, .. } => ors.resolve(place).await,
            Backend::Mock(mock) => mock.resolve(place).await,
        }
    }
}

impl DirectionsProvider for Backend {
    async fn route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<Directions, ProviderError> {
        match self {
            Backend::Live { ors, .. } => ors.route(origin, destination).await,
            Backend::Mock(mock) => mock.route(origin, destination).await,
        }
    }
}

impl StationDirectory for Backend {
    async fn stations_near(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<Arc<ChargingStation>>, ProviderError> {
        match self {
            Backend::Live { ocm, .. } => ocm.stations_near(center, radius_km).await,
            Backend::Mock(mock) => mock.stations_near(center, radius_km).await,
        }
    }

    async fn stations_in_bounding_box(
        &self,
        bbox: BoundingBox,
    ) -> Result<Vec<Arc<ChargingStation>>, ProviderError> {
        match self {
            Backend::Live { ocm, .. } => ocm.stations_in_bounding_box(bbox).await,
            Backend::Mock(mock) => mock.stations_in_bounding_box(bbox).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
        .unwrap()
    }

    #[test]
    fn live_backend_requires_ors_key() {
        let err = Backend::from_config(&config(&[])).err().unwrap();
        assert!(matches!(err, BackendError::MissingOrsKey));
    }

    #[test]
    fn live_backend_with_key() {
        let backend = Backend::from_config(&config(&[("ORS_API_KEY", "key")])).unwrap();
        assert!(matches!(backend, Backend::Live { .. }));
    }

    #[tokio::test]
    async fn mock_backend_serves_fixture() {
        let backend =
            Backend::from_config(&config(&[("EV_ROUTE_MOCK_DATA", "data/mock_corridor.json")]))
                .unwrap();

        let point = backend.resolve("Boise, ID").await.unwrap();
        assert!((point.lng + 116.2023).abs() < 1e-9);
    }

    #[test]
    fn missing_fixture_fails() {
        let err = Backend::from_config(&config(&[("EV_ROUTE_MOCK_DATA", "nope.json")]))
            .err()
            .unwrap();
        assert!(matches!(err, BackendError::Mock(MockDataError::Io(_))));
    }
}
