//! Conversion from OpenRouteService DTOs to domain types.

use crate::domain::{DomainError, GeoPoint, Polyline};
use crate::providers::Directions;

use super::types::{DirectionsRequest, DirectionsResponse, GeocodeResponse};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Coordinate array had fewer than two entries
    #[error("malformed coordinate: {0:?}")]
    MalformedCoordinate(Vec<f64>),

    /// Coordinates did not form a valid point or route
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Read a GeoJSON `[lng, lat, ...]` position.
fn position(coordinates: &[f64]) -> Result<GeoPoint, ConversionError> {
    match coordinates {
        [lng, lat, ..] => Ok(GeoPoint::checked(*lat, *lng)?),
        _ => Err(ConversionError::MalformedCoordinate(coordinates.to_vec())),
    }
}

/// The best geocoding match, if any.
pub fn convert_geocode(response: &GeocodeResponse) -> Result<Option<GeoPoint>, ConversionError> {
    response
        .features
        .first()
        .map(|feature| position(&feature.geometry.coordinates))
        .transpose()
}

/// The first route of a directions response.
pub fn convert_directions(response: &DirectionsResponse) -> Result<Directions, ConversionError> {
    let feature = response
        .features
        .first()
        .ok_or(ConversionError::MissingField("features"))?;

    let points = feature
        .geometry
        .coordinates
        .iter()
        .map(|c| position(c))
        .collect::<Result<Vec<_>, _>>()?;

    let summary = &feature.properties.summary;
    Ok(Directions {
        polyline: Polyline::new(points)?,
        total_distance_km: summary.distance / 1000.0,
        total_duration_minutes: summary.duration / 60.0,
    })
}

impl DirectionsRequest {
    /// Driving request between two points, without turn instructions.
    pub fn between(origin: GeoPoint, destination: GeoPoint) -> Self {
        Self {
            coordinates: [[origin.lng, origin.lat], [destination.lng, destination.lat]],
            instructions: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directions(json: &str) -> DirectionsResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn geocode_swaps_to_lat_lng() {
        let response: GeocodeResponse = serde_json::from_str(
            r#"{"features": [{"geometry": {"coordinates": [-122.3321, 47.6062]}, "properties": null}]}"#,
        )
        .unwrap();

        let point = convert_geocode(&response).unwrap().unwrap();
        assert_eq!(point, GeoPoint::new(47.6062, -122.3321));
    }

    #[test]
    fn geocode_without_features_is_none() {
        let response = GeocodeResponse { features: vec![] };
        assert_eq!(convert_geocode(&response).unwrap(), None);
    }

    #[test]
    fn geocode_rejects_out_of_range_latitude() {
        let response: GeocodeResponse = serde_json::from_str(
            r#"{"features": [{"geometry": {"coordinates": [10.0, 95.0]}, "properties": null}]}"#,
        )
        .unwrap();
        assert!(matches!(
            convert_geocode(&response),
            Err(ConversionError::Domain(_))
        ));
    }

    #[test]
    fn directions_convert_units_and_order() {
        let response = directions(
            r#"{"features": [{
                "properties": {"summary": {"distance": 12500.0, "duration": 900.0}},
                "geometry": {"coordinates": [[0.0, 1.0], [0.5, 1.5, 12.0], [1.0, 2.0]]}
            }]}"#,
        );

        let converted = convert_directions(&response).unwrap();
        assert_eq!(converted.polyline.start(), GeoPoint::new(1.0, 0.0));
        assert_eq!(converted.polyline.points()[1], GeoPoint::new(1.5, 0.5));
        assert_eq!(converted.total_distance_km, 12.5);
        assert_eq!(converted.total_duration_minutes, 15.0);
    }

    #[test]
    fn directions_without_route_is_missing_field() {
        let response = directions(r#"{"features": []}"#);
        assert_eq!(
            convert_directions(&response).unwrap_err(),
            ConversionError::MissingField("features")
        );
    }

    #[test]
    fn directions_with_short_coordinate_fail() {
        let response = directions(
            r#"{"features": [{
                "properties": {"summary": {}},
                "geometry": {"coordinates": [[0.0, 1.0], [2.0]]}
            }]}"#,
        );
        assert_eq!(
            convert_directions(&response).unwrap_err(),
            ConversionError::MalformedCoordinate(vec![2.0])
        );
    }

    #[test]
    fn request_uses_lng_lat_order() {
        let request = DirectionsRequest::between(GeoPoint::new(47.6, -122.3), GeoPoint::new(43.6, -116.2));
        assert_eq!(request.coordinates, [[-122.3, 47.6], [-116.2, 43.6]]);
        assert!(!request.instructions);
    }
}
