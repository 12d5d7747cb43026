//! Planner configuration.

use crate::domain::DEFAULT_PLANNING_SPEED_KPH;

/// How to choose between reachable stations at the same route position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Higher station power first, then lowest station id.
    #[default]
    PowerThenId,
    /// Lowest station id only.
    IdOnly,
}

/// Configuration parameters for charge planning.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Maximum lateral distance from the route for a usable station (km).
    pub search_radius_km: f64,

    /// Share of the current range a single post-stop leg is charged for.
    /// Lower values mean shorter dwell times but more stops.
    pub lead_fraction: f64,

    /// Fraction of the station/vehicle power that ends up in the battery.
    pub charge_efficiency: f64,

    /// Hard cap on planning iterations.
    pub max_iterations: usize,

    /// Speed used to derive drive minutes from leg distances (km/h).
    pub planning_speed_kph: f64,

    /// Extra station-lookup margin around the endpoints, as a fraction of
    /// their straight-line distance. Covers routes that bow away from the
    /// direct line.
    pub bbox_margin_fraction: f64,

    /// Ordering among equally distant reachable stations.
    pub tie_break: TieBreak,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        search_radius_km: f64,
        lead_fraction: f64,
        charge_efficiency: f64,
        max_iterations: usize,
        planning_speed_kph: f64,
        bbox_margin_fraction: f64,
    ) -> Self {
        Self {
            search_radius_km,
            lead_fraction,
            charge_efficiency,
            max_iterations,
            planning_speed_kph,
            bbox_margin_fraction,
            tie_break: TieBreak::default(),
        }
    }

    /// Set the corridor search radius.
    pub fn with_search_radius(mut self, km: f64) -> Self {
        self.search_radius_km = km;
        self
    }

    /// Set the lead fraction.
    pub fn with_lead_fraction(mut self, fraction: f64) -> Self {
        self.lead_fraction = fraction;
        self
    }

    /// Set the planning speed.
    pub fn with_planning_speed(mut self, kph: f64) -> Self {
        self.planning_speed_kph = kph;
        self
    }

    /// Set the station tie-break.
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            search_radius_km: 15.0,
            lead_fraction: 0.8,
            charge_efficiency: 0.9,
            max_iterations: 500,
            planning_speed_kph: DEFAULT_PLANNING_SPEED_KPH,
            bbox_margin_fraction: 0.25,
            tie_break: TieBreak::PowerThenId,
        }
    }
}
