//! Itinerary assembly.
//!
//! Turns the charge planner's stops and leg spans into a [`RoutePlan`] with
//! drive times and totals.

use std::sync::Arc;

use crate::domain::{ChargingStation, LegSummary, Polyline, RangeModel, RoutePlan};

use super::charge::{ChargePlan, ChargePlanner};
use super::config::PlannerConfig;
use super::corridor::filter_corridor;
use super::error::PlanError;

/// Minutes to drive `km` at `speed_kph`, rounded to the nearest minute.
///
/// # Examples
///
/// ```
/// use ev_route_server::planner::drive_minutes;
///
/// assert_eq!(drive_minutes(150.0, 100.0), 90);
/// assert_eq!(drive_minutes(0.9, 100.0), 1);
/// assert_eq!(drive_minutes(0.0, 100.0), 0);
/// ```
pub fn drive_minutes(km: f64, speed_kph: f64) -> u32 {
    (km / speed_kph * 60.0).round() as u32
}

/// Attaches timings and totals to a charge plan.
#[derive(Debug, Clone, Copy)]
pub struct ItineraryAssembler<'a> {
    range: &'a RangeModel,
    config: &'a PlannerConfig,
}

impl<'a> ItineraryAssembler<'a> {
    pub fn new(range: &'a RangeModel, config: &'a PlannerConfig) -> Self {
        Self { range, config }
    }

    /// Build the final plan for `route`.
    pub fn assemble(&self, route: &Polyline, plan: ChargePlan) -> Result<RoutePlan, PlanError> {
        let speed = self.config.planning_speed_kph;

        let legs: Vec<LegSummary> = plan
            .legs
            .into_iter()
            .map(|span| {
                let distance_km = span.end_km - span.start_km;
                LegSummary {
                    polyline: span.polyline,
                    distance_km,
                    drive_minutes: drive_minutes(distance_km, speed),
                }
            })
            .collect();

        let overall = LegSummary {
            polyline: route.clone(),
            distance_km: plan.total_route_km,
            drive_minutes: legs.iter().map(|l| l.drive_minutes).sum(),
        };
        let total_energy_kwh = self.range.energy_for_distance(plan.total_route_km);

        RoutePlan::new(overall, plan.stops, legs, total_energy_kwh).map_err(PlanError::from)
    }
}

/// Plan charging for `route` from a raw station list.
///
/// Runs the corridor filter, the charge planner and the assembler in turn.
pub fn plan(
    route: &Polyline,
    stations: &[Arc<ChargingStation>],
    range: &RangeModel,
    config: &PlannerConfig,
) -> Result<RoutePlan, PlanError> {
    let corridor = filter_corridor(route, stations, config.search_radius_km);
    let charge_plan = ChargePlanner::new(range, config).plan(route, &corridor)?;
    ItineraryAssembler::new(range, config).assemble(route, charge_plan)
}
