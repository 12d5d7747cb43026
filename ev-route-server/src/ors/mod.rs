//! OpenRouteService client.
//!
//! Geocoding (`/geocode/search`) and driving directions
//! (`/v2/directions/driving-car/geojson`). Responses are GeoJSON, so
//! coordinates arrive as `[lng, lat]` and are swapped during conversion.

mod client;
mod convert;
mod error;
mod types;

pub use client::{OrsClient, OrsConfig};
pub use convert::{ConversionError, convert_directions, convert_geocode};
pub use error::OrsError;
pub use types::{DirectionsRequest, DirectionsResponse, GeocodeResponse};

/// Provider name used in upstream errors.
pub(crate) const PROVIDER: &str = "openrouteservice";
