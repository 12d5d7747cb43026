//! Per-request routing preferences.

use super::DomainError;

/// Default target state of charge on arrival.
pub const DEFAULT_TARGET_ARRIVAL_SOC: f64 = 0.15;

/// Default speed used to turn leg distances into drive times.
pub const DEFAULT_PLANNING_SPEED_KPH: f64 = 100.0;

/// Optional knobs a caller may send with a planning request.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePrefs {
    /// Desired state of charge on arrival at the destination.
    ///
    /// Validated and echoed back; the planner itself plans to the reserve.
    pub target_arrival_soc: f64,
    pub planning_speed_kph: f64,
}

impl RoutePrefs {
    /// Check both preferences against their domains.
    pub fn validate(&self) -> Result<(), DomainError> {
        let soc = self.target_arrival_soc;
        if !soc.is_finite() || !(0.0..=1.0).contains(&soc) {
            return Err(DomainError::invalid(
                "targetArrivalSoC",
                "must be within [0, 1]",
            ));
        }

        let speed = self.planning_speed_kph;
        if !speed.is_finite() || speed <= 0.0 {
            return Err(DomainError::invalid("planningSpeedKph", "must be positive"));
        }

        Ok(())
    }
}

impl Default for RoutePrefs {
    fn default() -> Self {
        Self {
            target_arrival_soc: DEFAULT_TARGET_ARRIVAL_SOC,
            planning_speed_kph: DEFAULT_PLANNING_SPEED_KPH,
        }
    }
}
