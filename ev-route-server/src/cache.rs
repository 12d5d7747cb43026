//! Caching layer for upstream provider responses.
//!
//! Geocodes, routes and station lookups change slowly, so successful
//! responses are kept for a TTL. Coordinates in cache keys are quantized to
//! 1e-5 degrees (about a metre), which lets requests for the same place
//! share an entry even when their floats differ in the last bits. Errors
//! are never cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{BoundingBox, ChargingStation, GeoPoint};
use crate::providers::{
    Directions, DirectionsProvider, Geocoder, ProviderError, StationDirectory,
};

/// Quantization steps per degree.
const STEPS_PER_DEGREE: f64 = 1e5;

/// A coordinate quantized to 1e-5 degrees.
type PointKey = (i64, i64);

type StationList = Arc<Vec<Arc<ChargingStation>>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries, per cache.
    pub max_capacity: u64,
}

impl CacheConfig {
    /// Set the TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(15 * 60),
            max_capacity: 1000,
        }
    }
}

fn quantize(degrees: f64) -> i64 {
    (degrees * STEPS_PER_DEGREE).round() as i64
}

fn point_key(point: GeoPoint) -> PointKey {
    (quantize(point.lat), quantize(point.lng))
}

fn place_key(place: &str) -> String {
    place.trim().to_lowercase()
}

/// Wraps any provider and caches its successful responses.
///
/// Clones share the same caches.
pub struct CachedProvider<P> {
    inner: Arc<P>,
    geocodes: MokaCache<String, GeoPoint>,
    routes: MokaCache<(PointKey, PointKey), Arc<Directions>>,
    /// Keyed by centre and radius in metres.
    near: MokaCache<(PointKey, u64), StationList>,
    bboxes: MokaCache<(PointKey, PointKey), StationList>,
}

impl<P> Clone for CachedProvider<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            geocodes: self.geocodes.clone(),
            routes: self.routes.clone(),
            near: self.near.clone(),
            bboxes: self.bboxes.clone(),
        }
    }
}

impl<P> CachedProvider<P> {
    /// Create a new cached wrapper around `inner`.
    pub fn new(inner: P, config: &CacheConfig) -> Self {
        Self {
            inner: Arc::new(inner),
            geocodes: build(config),
            routes: build(config),
            near: build(config),
            bboxes: build(config),
        }
    }
}

fn build<K, V>(config: &CacheConfig) -> MokaCache<K, V>
where
    K: std::hash::Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    MokaCache::builder()
        .time_to_live(config.ttl)
        .max_capacity(config.max_capacity)
        .build()
}

impl<P: Geocoder> Geocoder for CachedProvider<P> {
    async fn resolve(&self, place: &str) -> Result<GeoPoint, ProviderError> {
        let key = place_key(place);

        if let Some(point) = self.geocodes.get(&key).await {
            return Ok(point);
        }

        let point = self.inner.resolve(place).await?;
        self.geocodes.insert(key, point).await;
        Ok(point)
    }
}

impl<P: DirectionsProvider> DirectionsProvider for CachedProvider<P> {
    async fn route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<Directions, ProviderError> {
        let key = (point_key(origin), point_key(destination));

        if let Some(directions) = self.routes.get(&key).await {
            return Ok((*directions).clone());
        }

        let directions = self.inner.route(origin, destination).await?;
        self.routes.insert(key, Arc::new(directions.clone())).await;
        Ok(directions)
    }
}

impl<P: StationDirectory> StationDirectory for CachedProvider<P> {
    async fn stations_near(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<Arc<ChargingStation>>, ProviderError> {
        let key = (point_key(center), (radius_km * 1000.0).round() as u64);

        if let Some(stations) = self.near.get(&key).await {
            return Ok((*stations).clone());
        }

        let stations = self.inner.stations_near(center, radius_km).await?;
        self.near.insert(key, Arc::new(stations.clone())).await;
        Ok(stations)
    }

    async fn stations_in_bounding_box(
        &self,
        bbox: BoundingBox,
    ) -> Result<Vec<Arc<ChargingStation>>, ProviderError> {
        let key = (
            point_key(GeoPoint::new(bbox.min_lat, bbox.min_lng)),
            point_key(GeoPoint::new(bbox.max_lat, bbox.max_lng)),
        );

        if let Some(stations) = self.bboxes.get(&key).await {
            return Ok((*stations).clone());
        }

        let stations = self.inner.stations_in_bounding_box(bbox).await?;
        self.bboxes.insert(key, Arc::new(stations.clone())).await;
        Ok(stations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockProviders;

    fn cached() -> CachedProvider<MockProviders> {
        let mock = MockProviders::from_file("data/mock_corridor.json").unwrap();
        CachedProvider::new(mock, &CacheConfig::default())
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(900));
        assert_eq!(config.max_capacity, 1000);

        let config = config.with_ttl(Duration::from_secs(5));
        assert_eq!(config.ttl, Duration::from_secs(5));
    }

    #[test]
    fn quantization() {
        assert_eq!(quantize(47.606_21), 4_760_621);
        assert_eq!(quantize(-122.332_1), -12_233_210);
        // Differences below the step share a key.
        assert_eq!(point_key(GeoPoint::new(1.000_001, 2.0)), point_key(GeoPoint::new(1.0, 2.0)));
        assert_ne!(point_key(GeoPoint::new(1.000_02, 2.0)), point_key(GeoPoint::new(1.0, 2.0)));
    }

    #[test]
    fn place_keys_normalize() {
        assert_eq!(place_key("  Seattle, WA "), place_key("seattle, wa"));
    }

    #[tokio::test]
    async fn repeated_geocode_hits_cache() {
        let provider = cached();

        let first = provider.resolve("Seattle, WA").await.unwrap();
        let second = provider.resolve("seattle, wa").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.inner.call_count(), 1);
    }

    #[tokio::test]
    async fn repeated_route_hits_cache() {
        let provider = cached();
        let origin = GeoPoint::new(47.6062, -122.3321);
        let destination = GeoPoint::new(43.615, -116.2023);

        let first = provider.route(origin, destination).await.unwrap();
        let second = provider.route(origin, destination).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.inner.call_count(), 1);
    }

    #[tokio::test]
    async fn repeated_station_lookups_hit_cache() {
        let provider = cached();
        let center = GeoPoint::new(46.2112, -119.1372);
        let bbox = BoundingBox {
            min_lat: 43.0,
            min_lng: -123.0,
            max_lat: 48.0,
            max_lng: -116.0,
        };

        provider.stations_near(center, 10.0).await.unwrap();
        provider.stations_near(center, 10.0).await.unwrap();
        provider.stations_in_bounding_box(bbox).await.unwrap();
        provider.stations_in_bounding_box(bbox).await.unwrap();
        assert_eq!(provider.inner.call_count(), 2);

        // A different radius is a different request.
        provider.stations_near(center, 20.0).await.unwrap();
        assert_eq!(provider.inner.call_count(), 3);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let provider = cached();

        assert!(provider.resolve("Atlantis").await.is_err());
        assert!(provider.resolve("Atlantis").await.is_err());
        assert_eq!(provider.inner.call_count(), 2);
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let provider = cached();
        let clone = provider.clone();

        provider.resolve("Boise, ID").await.unwrap();
        clone.resolve("Boise, ID").await.unwrap();
        assert_eq!(clone.inner.call_count(), 1);

        provider.geocodes.invalidate_all();
        clone.resolve("Boise, ID").await.unwrap();
        assert_eq!(clone.inner.call_count(), 2);
    }
}
