//! Collaborator interfaces for geocoding, directions and station lookup.
//!
//! The planning service is generic over these traits so the live HTTP
//! clients, their cached wrappers and the offline mock all plug in the same
//! way.

mod mock;

use std::future::Future;
use std::sync::Arc;

use crate::domain::{BoundingBox, ChargingStation, GeoPoint, Polyline};

pub use mock::{MockDataError, MockProviders};

/// Error from a collaborator call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// A place name could not be resolved.
    #[error("location not found: {0}")]
    NotFound(String),

    /// No drivable route connects the endpoints.
    #[error("no route from {from} to {to}")]
    NoRoute { from: GeoPoint, to: GeoPoint },

    /// Transport or upstream API failure.
    #[error("{provider} request failed: {message}")]
    Upstream {
        provider: &'static str,
        message: String,
    },
}

/// A driving route between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Directions {
    pub polyline: Polyline,
    /// Distance reported by the provider.
    pub total_distance_km: f64,
    pub total_duration_minutes: f64,
}

/// Resolves free-text places to coordinates.
pub trait Geocoder: Send + Sync {
    fn resolve(&self, place: &str) -> impl Future<Output = Result<GeoPoint, ProviderError>> + Send;
}

/// Computes driving routes.
pub trait DirectionsProvider: Send + Sync {
    fn route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> impl Future<Output = Result<Directions, ProviderError>> + Send;
}

/// Looks up charging stations.
///
/// Either lookup may return an empty list. The directory is authoritative
/// for each station's operational flag.
pub trait StationDirectory: Send + Sync {
    fn stations_near(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> impl Future<Output = Result<Vec<Arc<ChargingStation>>, ProviderError>> + Send;

    fn stations_in_bounding_box(
        &self,
        bbox: BoundingBox,
    ) -> impl Future<Output = Result<Vec<Arc<ChargingStation>>, ProviderError>> + Send;
}

impl<T: Geocoder> Geocoder for Arc<T> {
    async fn resolve(&self, place: &str) -> Result<GeoPoint, ProviderError> {
        (**self).resolve(place).await
    }
}

impl<T: DirectionsProvider> DirectionsProvider for Arc<T> {
    async fn route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<Directions, ProviderError> {
        (**self).route(origin, destination).await
    }
}

impl<T: StationDirectory> StationDirectory for Arc<T> {
    async fn stations_near(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<Arc<ChargingStation>>, ProviderError> {
        (**self).stations_near(center, radius_km).await
    }

    async fn stations_in_bounding_box(
        &self,
        bbox: BoundingBox,
    ) -> Result<Vec<Arc<ChargingStation>>, ProviderError> {
        (**self).stations_in_bounding_box(bbox).await
    }
}
