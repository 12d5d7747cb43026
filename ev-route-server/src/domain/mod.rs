//! Domain types for the EV route planner.
//!
//! This module contains the core domain model: geometry, vehicle range,
//! charging stations and planned itineraries. Types enforce their
//! invariants at construction time, so code that receives them can trust
//! their validity.

mod error;
mod ev;
mod geo;
mod plan;
mod prefs;
mod station;

pub use error::DomainError;
pub use ev::{EvSpec, RangeModel};
pub use geo::{
    BoundingBox, EARTH_RADIUS_KM, GeoPoint, Polyline, Projection, ROUTE_LENGTH_TOLERANCE_KM,
    distance_km, extract_segment, project_onto_route,
};
pub use plan::{LegSummary, PlannedStop, RoutePlan};
pub use prefs::{DEFAULT_PLANNING_SPEED_KPH, DEFAULT_TARGET_ARRIVAL_SOC, RoutePrefs};
pub use station::{ChargingStation, InvalidStationId, StationId};
