//! Planned itinerary types.
//!
//! A `RoutePlan` is only ever built through [`RoutePlan::new`], which derives
//! the totals from its legs and stops, so a plan that exists is internally
//! consistent.

use std::sync::Arc;

use super::{ChargingStation, DomainError, Polyline};

/// A charging stop inserted into the route.
///
/// # Invariants
///
/// - `arrive_soc <= depart_soc <= 1`
/// - `energy_added_kwh == (depart_soc - arrive_soc) * usable_kwh`
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedStop {
    station: Arc<ChargingStation>,
    along_route_km: f64,
    arrive_soc: f64,
    depart_soc: f64,
    charge_minutes: u32,
    energy_added_kwh: f64,
}

impl PlannedStop {
    /// Construct a stop; the added energy is derived from the two SoC values.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `depart_soc < arrive_soc` or `depart_soc > 1`.
    pub fn new(
        station: Arc<ChargingStation>,
        along_route_km: f64,
        arrive_soc: f64,
        depart_soc: f64,
        charge_minutes: u32,
        usable_kwh: f64,
    ) -> Result<Self, DomainError> {
        if arrive_soc.is_nan() || depart_soc.is_nan() || depart_soc < arrive_soc {
            return Err(DomainError::InvalidStop(
                "depart SoC must not be below arrival SoC",
            ));
        }
        if depart_soc > 1.0 {
            return Err(DomainError::InvalidStop("depart SoC cannot exceed 1"));
        }

        Ok(Self {
            station,
            along_route_km,
            arrive_soc,
            depart_soc,
            charge_minutes,
            energy_added_kwh: (depart_soc - arrive_soc) * usable_kwh,
        })
    }

    pub fn station(&self) -> &Arc<ChargingStation> {
        &self.station
    }

    /// Route distance from the origin to the station's projection.
    pub fn along_route_km(&self) -> f64 {
        self.along_route_km
    }

    pub fn arrive_soc(&self) -> f64 {
        self.arrive_soc
    }

    pub fn depart_soc(&self) -> f64 {
        self.depart_soc
    }

    pub fn charge_minutes(&self) -> u32 {
        self.charge_minutes
    }

    pub fn energy_added_kwh(&self) -> f64 {
        self.energy_added_kwh
    }
}

/// One stretch of driving.
#[derive(Debug, Clone, PartialEq)]
pub struct LegSummary {
    pub polyline: Polyline,
    pub distance_km: f64,
    pub drive_minutes: u32,
}

/// A complete itinerary.
///
/// # Invariants
///
/// - `legs.len() == stops.len() + 1`
/// - `total_drive_minutes` is the sum of leg drive minutes
/// - `total_charge_minutes` is the sum of stop charge minutes
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    overall: LegSummary,
    stops: Vec<PlannedStop>,
    legs: Vec<LegSummary>,
    total_energy_kwh: f64,
    total_drive_minutes: u32,
    total_charge_minutes: u32,
}

impl RoutePlan {
    /// Assemble a plan, deriving the drive and charge totals.
    ///
    /// # Errors
    ///
    /// Returns `Err` unless there is exactly one more leg than stops.
    pub fn new(
        overall: LegSummary,
        stops: Vec<PlannedStop>,
        legs: Vec<LegSummary>,
        total_energy_kwh: f64,
    ) -> Result<Self, DomainError> {
        if legs.len() != stops.len() + 1 {
            return Err(DomainError::InvalidPlan(
                "leg count must be stop count plus one",
            ));
        }

        let total_drive_minutes = legs.iter().map(|l| l.drive_minutes).sum();
        let total_charge_minutes = stops.iter().map(|s| s.charge_minutes).sum();

        Ok(Self {
            overall,
            stops,
            legs,
            total_energy_kwh,
            total_drive_minutes,
            total_charge_minutes,
        })
    }

    /// The whole route as a single leg.
    pub fn overall(&self) -> &LegSummary {
        &self.overall
    }

    pub fn stops(&self) -> &[PlannedStop] {
        &self.stops
    }

    pub fn legs(&self) -> &[LegSummary] {
        &self.legs
    }

    /// Energy needed to drive the full route.
    pub fn total_energy_kwh(&self) -> f64 {
        self.total_energy_kwh
    }

    pub fn total_drive_minutes(&self) -> u32 {
        self.total_drive_minutes
    }

    pub fn total_charge_minutes(&self) -> u32 {
        self.total_charge_minutes
    }

    /// Driving plus charging time.
    pub fn total_trip_minutes(&self) -> u32 {
        self.total_drive_minutes + self.total_charge_minutes
    }

    /// Total route distance.
    pub fn distance_km(&self) -> f64 {
        self.overall.distance_km
    }
}
