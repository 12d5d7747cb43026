//! OpenRouteService request and response DTOs.
//!
//! Both endpoints answer with GeoJSON, so every coordinate pair is
//! `[lng, lat]` (optionally followed by elevation).

use serde::{Deserialize, Serialize};

/// Response from `GET /geocode/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub features: Vec<GeocodeFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeFeature {
    pub geometry: PointGeometry,
    pub properties: Option<GeocodeProperties>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointGeometry {
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeProperties {
    /// Human-readable match, e.g. "Seattle, WA, USA".
    pub label: Option<String>,
}

/// Body of `POST /v2/directions/driving-car/geojson`.
#[derive(Debug, Clone, Serialize)]
pub struct DirectionsRequest {
    /// `[lng, lat]` of origin then destination.
    pub coordinates: [[f64; 2]; 2],
    pub instructions: bool,
}

/// Response from the directions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub features: Vec<RouteFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteFeature {
    pub geometry: LineGeometry,
    pub properties: RouteProperties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineGeometry {
    pub coordinates: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteProperties {
    pub summary: RouteSummary,
}

/// Totals for the whole route. ORS omits both for zero-length routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteSummary {
    /// Metres.
    #[serde(default)]
    pub distance: f64,
    /// Seconds.
    #[serde(default)]
    pub duration: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_geocode_response() {
        let json = r#"{
            "geocoding": {"version": "0.2"},
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-122.3321, 47.6062]},
                "properties": {"label": "Seattle, WA, USA", "confidence": 1}
            }]
        }"#;

        let response: GeocodeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.features.len(), 1);
        assert_eq!(response.features[0].geometry.coordinates, vec![-122.3321, 47.6062]);
        assert_eq!(
            response.features[0]
                .properties
                .as_ref()
                .and_then(|p| p.label.as_deref()),
            Some("Seattle, WA, USA")
        );
    }

    #[test]
    fn deserialize_empty_geocode_response() {
        let response: GeocodeResponse =
            serde_json::from_str(r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        assert!(response.features.is_empty());
    }

    #[test]
    fn deserialize_directions_response() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "bbox": [-122.33, 43.61, -116.2, 47.6],
                "properties": {
                    "summary": {"distance": 795412.3, "duration": 27720.5},
                    "way_points": [0, 2]
                },
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[-122.3321, 47.6062], [-120.5478, 46.9965, 480.0], [-116.2023, 43.615]]
                }
            }]
        }"#;

        let response: DirectionsResponse = serde_json::from_str(json).unwrap();
        let feature = &response.features[0];
        assert_eq!(feature.geometry.coordinates.len(), 3);
        assert_eq!(feature.geometry.coordinates[1].len(), 3);
        assert!((feature.properties.summary.distance - 795412.3).abs() < 1e-6);
    }

    #[test]
    fn summary_fields_default_to_zero() {
        let props: RouteProperties = serde_json::from_str(r#"{"summary": {}}"#).unwrap();
        assert_eq!(props.summary.distance, 0.0);
        assert_eq!(props.summary.duration, 0.0);
    }

    #[test]
    fn serialize_directions_request() {
        let request = DirectionsRequest {
            coordinates: [[-122.3321, 47.6062], [-116.2023, 43.615]],
            instructions: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "coordinates": [[-122.3321, 47.6062], [-116.2023, 43.615]],
                "instructions": false
            })
        );
    }
}
