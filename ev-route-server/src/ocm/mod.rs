//! Open Charge Map client.
//!
//! Looks up charging locations (`/poi`) by radius or bounding box and
//! converts them to [`ChargingStation`](crate::domain::ChargingStation)s.
//! Records without a location or a positive power rating are dropped.

mod client;
mod convert;
mod error;
mod types;

pub use client::{OcmClient, OcmConfig};
pub use convert::{ConversionError, convert_poi, convert_pois};
pub use error::OcmError;
pub use types::{AddressInfoDto, ConnectionDto, ConnectionTypeDto, PoiDto, StatusTypeDto};

/// Provider name used in upstream errors.
pub(crate) const PROVIDER: &str = "openchargemap";
