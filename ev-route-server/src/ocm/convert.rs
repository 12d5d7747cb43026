//! Conversion from Open Charge Map DTOs to domain types.

use std::sync::Arc;

use tracing::warn;

use crate::domain::{ChargingStation, DomainError, GeoPoint, StationId};

use super::types::PoiDto;

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// No connection reports a positive power rating
    #[error("no connection with a power rating")]
    NoPower,

    /// Values outside their domain
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Convert a single POI.
///
/// Station power is the highest connection power. A missing status counts
/// as operational.
pub fn convert_poi(poi: &PoiDto) -> Result<ChargingStation, ConversionError> {
    let address = poi
        .address_info
        .as_ref()
        .ok_or(ConversionError::MissingField("AddressInfo"))?;
    let lat = address
        .latitude
        .ok_or(ConversionError::MissingField("AddressInfo.Latitude"))?;
    let lng = address
        .longitude
        .ok_or(ConversionError::MissingField("AddressInfo.Longitude"))?;

    let connections = poi.connections.as_deref().unwrap_or(&[]);
    let max_power_kw = connections
        .iter()
        .filter_map(|c| c.power_kw)
        .filter(|kw| kw.is_finite() && *kw > 0.0)
        .max_by(f64::total_cmp)
        .ok_or(ConversionError::NoPower)?;

    let connectors = connections
        .iter()
        .filter_map(|c| c.connection_type.as_ref()?.title.clone());

    let operational = poi
        .status_type
        .as_ref()
        .and_then(|s| s.is_operational)
        .unwrap_or(true);

    let id = StationId::new(format!("OCM-{}", poi.id))
        .map_err(|_| ConversionError::MissingField("ID"))?;
    let name = address
        .title
        .clone()
        .unwrap_or_else(|| format!("Station {}", poi.id));

    Ok(ChargingStation::new(
        id,
        name,
        GeoPoint::checked(lat, lng)?,
        connectors,
        max_power_kw,
        operational,
    )?)
}

/// Convert a POI list, skipping records that cannot be used.
pub fn convert_pois(pois: &[PoiDto]) -> Vec<Arc<ChargingStation>> {
    let mut stations = Vec::with_capacity(pois.len());

    for poi in pois {
        match convert_poi(poi) {
            Ok(station) => stations.push(Arc::new(station)),
            Err(e) => {
                warn!(poi_id = poi.id, error = %e, "Skipping unusable station");
            }
        }
    }

    stations
}
