//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{
    ChargingStation, DEFAULT_PLANNING_SPEED_KPH, DEFAULT_TARGET_ARRIVAL_SOC, EvSpec, GeoPoint,
    LegSummary, PlannedStop, RoutePlan, RoutePrefs,
};
use crate::presets::EvPreset;

/// Request to plan a route.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRouteRequest {
    /// Free-text origin, geocoded by the server
    pub origin: String,

    /// Free-text destination
    pub destination: String,

    pub ev: EvSpecDto,

    #[serde(default)]
    pub prefs: Option<PrefsDto>,
}

/// Vehicle specification as sent by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvSpecDto {
    #[serde(rename = "batteryKwh", alias = "batteryCapacityKwh")]
    pub battery_kwh: f64,

    #[serde(rename = "usableSoCFraction")]
    pub usable_soc_fraction: f64,

    #[serde(rename = "consumptionWhPerKm")]
    pub consumption_wh_per_km: f64,

    #[serde(rename = "maxChargeKw")]
    pub max_charge_kw: f64,

    #[serde(rename = "startSoC")]
    pub start_soc: f64,

    #[serde(rename = "reserveSoC")]
    pub reserve_soc: f64,
}

impl From<EvSpecDto> for EvSpec {
    fn from(dto: EvSpecDto) -> Self {
        EvSpec {
            battery_capacity_kwh: dto.battery_kwh,
            usable_soc_fraction: dto.usable_soc_fraction,
            consumption_wh_per_km: dto.consumption_wh_per_km,
            max_charge_kw: dto.max_charge_kw,
            start_soc: dto.start_soc,
            reserve_soc: dto.reserve_soc,
        }
    }
}

impl From<&EvSpec> for EvSpecDto {
    fn from(spec: &EvSpec) -> Self {
        EvSpecDto {
            battery_kwh: spec.battery_capacity_kwh,
            usable_soc_fraction: spec.usable_soc_fraction,
            consumption_wh_per_km: spec.consumption_wh_per_km,
            max_charge_kw: spec.max_charge_kw,
            start_soc: spec.start_soc,
            reserve_soc: spec.reserve_soc,
        }
    }
}

/// Optional routing preferences. Missing fields take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrefsDto {
    #[serde(rename = "targetArrivalSoC")]
    pub target_arrival_soc: Option<f64>,

    #[serde(rename = "planningSpeedKph")]
    pub planning_speed_kph: Option<f64>,
}

impl From<PrefsDto> for RoutePrefs {
    fn from(dto: PrefsDto) -> Self {
        RoutePrefs {
            target_arrival_soc: dto.target_arrival_soc.unwrap_or(DEFAULT_TARGET_ARRIVAL_SOC),
            planning_speed_kph: dto.planning_speed_kph.unwrap_or(DEFAULT_PLANNING_SPEED_KPH),
        }
    }
}

/// A planned route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlanResponse {
    pub overall: LegResult,
    pub legs: Vec<LegResult>,
    pub stops: Vec<StopResult>,
    pub total_energy_kwh: f64,
    pub total_drive_minutes: u32,
    pub total_charge_minutes: u32,
    pub total_trip_minutes: u32,

    /// Echo of the requested arrival charge
    #[serde(rename = "targetArrivalSoC")]
    pub target_arrival_soc: f64,
}

impl RoutePlanResponse {
    pub fn from_plan(plan: &RoutePlan, prefs: &RoutePrefs) -> Self {
        Self {
            overall: LegResult::from_leg(plan.overall()),
            legs: plan.legs().iter().map(LegResult::from_leg).collect(),
            stops: plan.stops().iter().map(StopResult::from_stop).collect(),
            total_energy_kwh: plan.total_energy_kwh(),
            total_drive_minutes: plan.total_drive_minutes(),
            total_charge_minutes: plan.total_charge_minutes(),
            total_trip_minutes: plan.total_trip_minutes(),
            target_arrival_soc: prefs.target_arrival_soc,
        }
    }
}

/// A driving leg.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegResult {
    /// `[lat, lng]` pairs in driving order
    pub polyline: Vec<[f64; 2]>,
    pub distance_km: f64,
    pub drive_minutes: u32,
}

impl LegResult {
    pub fn from_leg(leg: &LegSummary) -> Self {
        Self {
            polyline: leg.polyline.points().iter().map(lat_lng).collect(),
            distance_km: leg.distance_km,
            drive_minutes: leg.drive_minutes,
        }
    }
}

fn lat_lng(point: &GeoPoint) -> [f64; 2] {
    [point.lat, point.lng]
}

/// A charging stop.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopResult {
    pub station: StationResult,
    pub along_route_km: f64,
    #[serde(rename = "arriveSoC")]
    pub arrive_soc: f64,
    #[serde(rename = "departSoC")]
    pub depart_soc: f64,
    pub charge_minutes: u32,
    pub energy_added_kwh: f64,
}

impl StopResult {
    pub fn from_stop(stop: &PlannedStop) -> Self {
        Self {
            station: StationResult::from_station(stop.station()),
            along_route_km: stop.along_route_km(),
            arrive_soc: stop.arrive_soc(),
            depart_soc: stop.depart_soc(),
            charge_minutes: stop.charge_minutes(),
            energy_added_kwh: stop.energy_added_kwh(),
        }
    }
}

/// A charging station.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationResult {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub connectors: Vec<String>,
    pub max_kw: f64,
    pub operational: bool,
}

impl StationResult {
    pub fn from_station(station: &ChargingStation) -> Self {
        Self {
            id: station.id.to_string(),
            name: station.name.clone(),
            lat: station.location.lat,
            lng: station.location.lng,
            connectors: station.connectors.iter().cloned().collect(),
            max_kw: station.max_power_kw,
            operational: station.operational,
        }
    }
}

/// Query for stations near a point.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationsNearQuery {
    pub lat: f64,
    pub lng: f64,

    /// Search radius, defaults to 10 km
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
}

fn default_radius_km() -> f64 {
    10.0
}

/// A built-in vehicle.
#[derive(Debug, Serialize)]
pub struct PresetResult {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(flatten)]
    pub spec: EvSpecDto,
}

impl PresetResult {
    pub fn from_preset(preset: &EvPreset) -> Self {
        Self {
            id: preset.id,
            name: preset.name,
            spec: EvSpecDto::from(&preset.spec),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
