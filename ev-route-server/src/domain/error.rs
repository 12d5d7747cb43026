//! Domain error types.
//!
//! These errors represent validation failures and data inconsistencies
//! in the domain layer. They are distinct from API/IO errors.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A vehicle or preference value is outside its documented domain
    #[error("invalid specification: {field} {reason}")]
    InvalidSpecification { field: &'static str, reason: String },

    /// Requested along-route interval does not lie within the route
    #[error("range error: {start_km} km to {end_km} km is outside a route of {length_km} km")]
    Range {
        start_km: f64,
        end_km: f64,
        length_km: f64,
    },

    /// Polyline cannot represent a traversable route
    #[error("invalid polyline: {0}")]
    InvalidPolyline(&'static str),

    /// Station record is unusable
    #[error("invalid station: {0}")]
    InvalidStation(&'static str),

    /// Planned stop violates its state-of-charge constraints
    #[error("invalid stop: {0}")]
    InvalidStop(&'static str),

    /// Legs and stops do not line up
    #[error("invalid plan: {0}")]
    InvalidPlan(&'static str),
}

impl DomainError {
    /// Shorthand for an [`DomainError::InvalidSpecification`].
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        DomainError::InvalidSpecification {
            field,
            reason: reason.into(),
        }
    }
}
