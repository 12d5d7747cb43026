//! Open Charge Map POI DTOs.
//!
//! Field names follow the API's PascalCase. Nearly everything is optional:
//! community-maintained records are frequently incomplete.

use serde::Deserialize;

/// One point of interest (a charging location).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PoiDto {
    #[serde(rename = "ID")]
    pub id: u64,

    pub address_info: Option<AddressInfoDto>,

    pub connections: Option<Vec<ConnectionDto>>,

    /// Absent when the status is unknown.
    pub status_type: Option<StatusTypeDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddressInfoDto {
    pub title: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConnectionDto {
    pub connection_type: Option<ConnectionTypeDto>,

    #[serde(rename = "PowerKW")]
    pub power_kw: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConnectionTypeDto {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusTypeDto {
    pub is_operational: Option<bool>,
}
