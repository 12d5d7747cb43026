//! Station corridor filter.
//!
//! Narrows a directory listing down to operational stations close enough to
//! the route to be used without a meaningful detour, ordered by where along
//! the route they sit.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::{BoundingBox, ChargingStation, GeoPoint, Polyline, distance_km, project_onto_route};

/// A station inside the route corridor.
#[derive(Debug, Clone, PartialEq)]
pub struct CorridorStation {
    pub station: Arc<ChargingStation>,
    /// Route distance from the origin to the station's projection.
    pub along_route_km: f64,
    /// Distance between the station and the route.
    pub lateral_km: f64,
}

/// Stations within `radius_km` of `route`, sorted by along-route distance.
///
/// Non-operational stations are dropped, as are repeated ids (the first
/// occurrence wins). The sort is stable, so stations at the same route
/// position keep their input order.
pub fn filter_corridor(
    route: &Polyline,
    stations: &[Arc<ChargingStation>],
    radius_km: f64,
) -> Vec<CorridorStation> {
    let mut seen = HashSet::new();

    let mut corridor: Vec<CorridorStation> = stations
        .iter()
        .filter(|s| s.operational)
        .filter(|s| seen.insert(s.id.clone()))
        .filter_map(|station| {
            let projection = project_onto_route(station.location, route);
            (projection.lateral_km <= radius_km).then(|| CorridorStation {
                station: station.clone(),
                along_route_km: projection.along_route_km,
                lateral_km: projection.lateral_km,
            })
        })
        .collect();

    corridor.sort_by(|a, b| a.along_route_km.total_cmp(&b.along_route_km));
    corridor
}

/// Box to query the station directory with before the route is known.
///
/// Encloses both endpoints, padded by the corridor radius plus
/// `margin_fraction` of the straight-line trip distance.
pub fn corridor_bounding_box(
    origin: GeoPoint,
    destination: GeoPoint,
    radius_km: f64,
    margin_fraction: f64,
) -> BoundingBox {
    let pad_km = radius_km + margin_fraction * distance_km(origin, destination);

    BoundingBox::spanning(origin, destination).expanded_by_km(pad_km)
}
