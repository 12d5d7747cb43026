//! Greedy charge-stop insertion.
//!
//! Walks the route from the origin, tracking state of charge. Whenever the
//! rest of the route is out of range, the planner stops at the reachable
//! corridor station furthest along the route and charges enough to cover a
//! fixed share of its range (or the rest of the trip, whichever is less).

use std::cmp::Ordering;

use tracing::debug;

use crate::domain::{PlannedStop, Polyline, RangeModel, extract_segment};

use super::config::{PlannerConfig, TieBreak};
use super::corridor::CorridorStation;
use super::error::PlanError;

/// Slack allowed when comparing arrival charge against the reserve.
const SOC_EPSILON: f64 = 1e-9;

/// A stretch of the route between two along-route positions.
#[derive(Debug, Clone, PartialEq)]
pub struct LegSpan {
    pub start_km: f64,
    pub end_km: f64,
    pub polyline: Polyline,
}

/// Output of the charge planner, before timings are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargePlan {
    pub stops: Vec<PlannedStop>,
    /// One more than `stops`.
    pub legs: Vec<LegSpan>,
    pub total_route_km: f64,
}

/// Plans charging stops for one vehicle over one route.
#[derive(Debug, Clone, Copy)]
pub struct ChargePlanner<'a> {
    range: &'a RangeModel,
    config: &'a PlannerConfig,
}

impl<'a> ChargePlanner<'a> {
    pub fn new(range: &'a RangeModel, config: &'a PlannerConfig) -> Self {
        Self { range, config }
    }

    /// Insert charging stops along `route`.
    ///
    /// `corridor` must be sorted by along-route distance, as returned by
    /// [`filter_corridor`](super::filter_corridor).
    ///
    /// # Errors
    ///
    /// - [`PlanError::RouteInfeasible`] when no corridor station is within
    ///   range of the current position
    /// - [`PlanError::PlanningDivergence`] when the iteration cap is reached
    pub fn plan(
        &self,
        route: &Polyline,
        corridor: &[CorridorStation],
    ) -> Result<ChargePlan, PlanError> {
        let spec = self.range.spec();
        let usable_kwh = self.range.usable_kwh();
        let total_route_km = route.length_km();

        let mut current_km = 0.0;
        let mut current_soc = spec.start_soc;
        let mut stops = Vec::new();
        let mut legs = Vec::new();

        for iteration in 0..self.config.max_iterations {
            let remaining_km = total_route_km - current_km;
            let max_range_km = self.range.max_range_km(current_soc);

            if remaining_km <= max_range_km {
                legs.push(LegSpan {
                    start_km: current_km,
                    end_km: total_route_km,
                    polyline: extract_segment(route, current_km, total_route_km)?,
                });
                debug!(
                    stops = stops.len(),
                    iterations = iteration + 1,
                    "Charge plan complete"
                );
                return Ok(ChargePlan {
                    stops,
                    legs,
                    total_route_km,
                });
            }

            let candidate = self
                .select_station(corridor, current_km, max_range_km)
                .ok_or(PlanError::RouteInfeasible {
                    reached_km: current_km,
                })?;

            let distance_to_station = candidate.along_route_km - current_km;
            let energy_to_station = self.range.energy_for_distance(distance_to_station);
            let arrive_soc = current_soc - self.range.soc_for_energy(energy_to_station);
            if arrive_soc < spec.reserve_soc - SOC_EPSILON {
                return Err(PlanError::RouteInfeasible {
                    reached_km: current_km,
                });
            }

            let lead_km =
                (remaining_km - distance_to_station).min(max_range_km * self.config.lead_fraction);
            let lead_soc = self.range.soc_for_energy(self.range.energy_for_distance(lead_km));
            let depart_soc = (arrive_soc + lead_soc).min(1.0);

            let energy_added = (depart_soc - arrive_soc) * usable_kwh;
            let avg_kw = candidate.station.max_power_kw.min(spec.max_charge_kw)
                * self.config.charge_efficiency;
            let charge_minutes = (energy_added / avg_kw * 60.0).ceil() as u32;

            debug!(
                station = %candidate.station.id,
                along_route_km = candidate.along_route_km,
                arrive_soc,
                depart_soc,
                charge_minutes,
                "Selected charging stop"
            );

            legs.push(LegSpan {
                start_km: current_km,
                end_km: candidate.along_route_km,
                polyline: extract_segment(route, current_km, candidate.along_route_km)?,
            });
            stops.push(PlannedStop::new(
                candidate.station.clone(),
                candidate.along_route_km,
                arrive_soc,
                depart_soc,
                charge_minutes,
                usable_kwh,
            )?);

            current_km = candidate.along_route_km;
            current_soc = depart_soc;
        }

        Err(PlanError::PlanningDivergence {
            iterations: self.config.max_iterations,
        })
    }

    /// The reachable station furthest along the route.
    ///
    /// Reachable means strictly past `current_km` and at most `range_km`
    /// beyond it.
    fn select_station<'c>(
        &self,
        corridor: &'c [CorridorStation],
        current_km: f64,
        range_km: f64,
    ) -> Option<&'c CorridorStation> {
        let limit_km = current_km + range_km;

        corridor
            .iter()
            .filter(|c| c.along_route_km > current_km && c.along_route_km <= limit_km)
            .max_by(|a, b| self.compare(a, b))
    }

    /// Orders candidates so that the preferred one is greatest.
    fn compare(&self, a: &CorridorStation, b: &CorridorStation) -> Ordering {
        let by_position = a.along_route_km.total_cmp(&b.along_route_km);
        // Lower ids win, so compare them reversed.
        let by_id = || b.station.id.cmp(&a.station.id);

        match self.config.tie_break {
            TieBreak::PowerThenId => by_position
                .then_with(|| a.station.max_power_kw.total_cmp(&b.station.max_power_kw))
                .then_with(by_id),
            TieBreak::IdOnly => by_position.then_with(by_id),
        }
    }
}
