//! Planning failures.

use crate::domain::DomainError;

/// Error from charge planning.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// No usable station lies within range of the current position.
    #[error("route infeasible: no reachable charging station beyond {reached_km:.1} km")]
    RouteInfeasible { reached_km: f64 },

    /// The iteration cap was hit before the destination was reached.
    #[error("planning did not converge after {iterations} iterations")]
    PlanningDivergence { iterations: usize },

    /// A geometry or plan invariant was violated.
    #[error(transparent)]
    Geometry(#[from] DomainError),
}
