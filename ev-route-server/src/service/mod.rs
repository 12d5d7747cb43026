//! Route planning orchestration.
//!
//! Resolves the endpoints, fetches directions and candidate stations, and
//! hands everything to the synchronous planner.

mod backend;

use std::sync::Arc;

use tracing::info;

use crate::domain::{ChargingStation, DomainError, EvSpec, GeoPoint, RangeModel, RoutePlan, RoutePrefs};
use crate::planner::{self, PlanError, PlannerConfig, corridor_bounding_box};
use crate::providers::{DirectionsProvider, Geocoder, ProviderError, StationDirectory};

pub use backend::{Backend, BackendError};

/// Error from a planning or lookup request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// Plans EV routes using the given collaborators.
#[derive(Debug, Clone)]
pub struct RoutePlanningService<G, D, S> {
    geocoder: G,
    directions: D,
    stations: S,
    config: PlannerConfig,
}

impl<G, D, S> RoutePlanningService<G, D, S>
where
    G: Geocoder,
    D: DirectionsProvider,
    S: StationDirectory,
{
    /// Create a new planning service.
    pub fn new(geocoder: G, directions: D, stations: S, config: PlannerConfig) -> Self {
        Self {
            geocoder,
            directions,
            stations,
            config,
        }
    }

    /// The planner configuration requests start from.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a route from `origin` to `destination` with charging stops.
    ///
    /// The vehicle and preferences are validated before any upstream call.
    /// Both endpoints are geocoded concurrently; directions and the station
    /// lookup for the corridor's bounding box then run concurrently too.
    pub async fn plan_route(
        &self,
        origin: &str,
        destination: &str,
        ev: &EvSpec,
        prefs: Option<&RoutePrefs>,
    ) -> Result<RoutePlan, ServiceError> {
        let range = RangeModel::new(ev.clone())?;
        let prefs = prefs.cloned().unwrap_or_default();
        prefs.validate()?;
        non_blank("origin", origin)?;
        non_blank("destination", destination)?;

        let config = self
            .config
            .clone()
            .with_planning_speed(prefs.planning_speed_kph);

        let (from, to) = futures::try_join!(
            self.geocoder.resolve(origin),
            self.geocoder.resolve(destination)
        )?;

        let bbox = corridor_bounding_box(
            from,
            to,
            config.search_radius_km,
            config.bbox_margin_fraction,
        );
        let (directions, stations) = futures::try_join!(
            self.directions.route(from, to),
            self.stations.stations_in_bounding_box(bbox)
        )?;

        let plan = planner::plan(&directions.polyline, &stations, &range, &config)?;

        info!(
            origin,
            destination,
            distance_km = plan.distance_km(),
            provider_distance_km = directions.total_distance_km,
            candidates = stations.len(),
            stops = plan.stops().len(),
            trip_minutes = plan.total_trip_minutes(),
            "Planned route"
        );

        Ok(plan)
    }

    /// Stations within `radius_km` of a point.
    pub async fn find_stations_near(
        &self,
        lat: f64,
        lng: f64,
        radius_km: f64,
    ) -> Result<Vec<Arc<ChargingStation>>, ServiceError> {
        let center = GeoPoint::checked(lat, lng)?;
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(DomainError::invalid("radiusKm", "must be positive").into());
        }

        Ok(self.stations.stations_near(center, radius_km).await?)
    }
}

fn non_blank(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::invalid(field, "must not be blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockProviders;

    type MockService =
        RoutePlanningService<Arc<MockProviders>, Arc<MockProviders>, Arc<MockProviders>>;

    fn service() -> (MockService, Arc<MockProviders>) {
        let mock = Arc::new(MockProviders::from_file("data/mock_corridor.json").unwrap());
        let service = RoutePlanningService::new(
            mock.clone(),
            mock.clone(),
            mock.clone(),
            PlannerConfig::default(),
        );
        (service, mock)
    }

    fn model_3() -> EvSpec {
        EvSpec {
            battery_capacity_kwh: 75.0,
            usable_soc_fraction: 0.9,
            consumption_wh_per_km: 160.0,
            max_charge_kw: 250.0,
            start_soc: 0.8,
            reserve_soc: 0.1,
        }
    }

    #[tokio::test]
    async fn plans_corridor_route() {
        let (service, _) = service();

        let plan = service
            .plan_route("Seattle, WA", "Boise, ID", &model_3(), None)
            .await
            .unwrap();

        assert!(!plan.stops().is_empty());
        assert_eq!(plan.legs().len(), plan.stops().len() + 1);
        // Prosser is the furthest station inside the starting range.
        assert_eq!(plan.stops()[0].station().id.as_str(), "OCM-10103");
        for stop in plan.stops() {
            assert!(stop.station().operational);
            assert_ne!(stop.station().id.as_str(), "OCM-10110");
        }
    }

    #[tokio::test]
    async fn invalid_vehicle_fails_before_upstream_calls() {
        let (service, mock) = service();
        let ev = EvSpec {
            start_soc: 0.3,
            reserve_soc: 0.5,
            ..model_3()
        };

        let err = service
            .plan_route("Seattle, WA", "Boise, ID", &ev, None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::InvalidSpecification { field: "reserveSoC", .. })
        ));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn invalid_prefs_are_rejected() {
        let (service, mock) = service();
        let prefs = RoutePrefs {
            planning_speed_kph: -5.0,
            ..RoutePrefs::default()
        };

        let err = service
            .plan_route("Seattle, WA", "Boise, ID", &model_3(), Some(&prefs))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Domain(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_place_is_not_found() {
        let (service, _) = service();

        let err = service
            .plan_route("Seattle, WA", "Atlantis", &model_3(), None)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ServiceError::Provider(ProviderError::NotFound("Atlantis".into()))
        );
    }

    #[tokio::test]
    async fn tiny_battery_is_infeasible() {
        let (service, _) = service();
        let ev = EvSpec {
            battery_capacity_kwh: 20.0,
            ..model_3()
        };

        let err = service
            .plan_route("Seattle, WA", "Boise, ID", &ev, None)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ServiceError::Plan(PlanError::RouteInfeasible { reached_km: 0.0 })
        );
    }

    #[tokio::test]
    async fn planning_speed_scales_drive_time() {
        let (service, _) = service();

        let fast = service
            .plan_route("Seattle, WA", "Tacoma, WA", &model_3(), None)
            .await
            .unwrap();
        let slow_prefs = RoutePrefs {
            planning_speed_kph: 50.0,
            ..RoutePrefs::default()
        };
        let slow = service
            .plan_route("Seattle, WA", "Tacoma, WA", &model_3(), Some(&slow_prefs))
            .await
            .unwrap();

        assert!(fast.stops().is_empty());
        let expected = planner::drive_minutes(fast.distance_km(), 50.0);
        assert_eq!(slow.total_drive_minutes(), expected);
    }

    #[tokio::test]
    async fn stations_near_validates_input() {
        let (service, mock) = service();

        assert!(service.find_stations_near(91.0, 0.0, 10.0).await.is_err());
        assert!(service.find_stations_near(46.0, -119.0, 0.0).await.is_err());
        assert_eq!(mock.call_count(), 0);

        let stations = service
            .find_stations_near(46.2112, -119.1372, 10.0)
            .await
            .unwrap();
        let ids: Vec<_> = stations.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["OCM-10104"]);
    }
}
