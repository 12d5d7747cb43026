//! Charging station types.

use std::collections::BTreeSet;
use std::fmt;

use super::{DomainError, GeoPoint};

/// Error returned when a station identifier is empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// A station directory identifier.
///
/// Identifiers are opaque, non-empty strings. Ordering is lexicographic and
/// is used as the final planning tie-break.
///
/// # Examples
///
/// ```
/// use ev_route_server::domain::StationId;
///
/// let id = StationId::new("OCM-1234").unwrap();
/// assert_eq!(id.as_str(), "OCM-1234");
///
/// // Empty identifiers are rejected
/// assert!(StationId::new("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(String);

impl StationId {
    /// Create a station id, rejecting empty strings.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidStationId> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(InvalidStationId {
                reason: "station id cannot be empty",
            });
        }
        Ok(StationId(s))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A charging station as reported by the station directory.
///
/// Stations are shared between the candidate list and planned stops behind
/// an `Arc`, so they are never copied once fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargingStation {
    pub id: StationId,
    pub name: String,
    pub location: GeoPoint,
    /// Connector type names (e.g. "CCS (Type 2)").
    pub connectors: BTreeSet<String>,
    /// Highest power any connector delivers.
    pub max_power_kw: f64,
    pub operational: bool,
}

impl ChargingStation {
    /// Create a station, validating its power rating.
    pub fn new(
        id: StationId,
        name: impl Into<String>,
        location: GeoPoint,
        connectors: impl IntoIterator<Item = String>,
        max_power_kw: f64,
        operational: bool,
    ) -> Result<Self, DomainError> {
        if !max_power_kw.is_finite() || max_power_kw <= 0.0 {
            return Err(DomainError::InvalidStation("max power must be positive"));
        }

        Ok(Self {
            id,
            name: name.into(),
            location,
            connectors: connectors.into_iter().collect(),
            max_power_kw,
            operational,
        })
    }
}
