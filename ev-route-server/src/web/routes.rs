//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderValue, Method, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{DomainError, EvSpec, RoutePrefs};
use crate::planner::PlanError;
use crate::presets::PRESETS;
use crate::providers::ProviderError;
use crate::service::ServiceError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
///
/// `cors_origins` lists the origins allowed to call the API from a browser;
/// `"*"` allows any origin.
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/api/route/plan", post(plan_route))
        .route("/api/stations/near", get(stations_near))
        .route("/api/health", get(health))
        .route("/api/ev/presets", get(presets))
        .with_state(state)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin, "Ignoring malformed CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "EV route planner is running",
    })
}

/// Built-in vehicle presets.
async fn presets() -> Json<Vec<PresetResult>> {
    Json(PRESETS.iter().map(PresetResult::from_preset).collect())
}

/// Plan a route with charging stops.
async fn plan_route(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RoutePlanResponse>, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: PlanRouteRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "Invalid plan request");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let ev = EvSpec::from(req.ev);
    let prefs = req.prefs.map(RoutePrefs::from).unwrap_or_default();

    let plan = state
        .planner
        .plan_route(&req.origin, &req.destination, &ev, Some(&prefs))
        .await?;

    Ok(Json(RoutePlanResponse::from_plan(&plan, &prefs)))
}

/// Stations around a point.
async fn stations_near(
    State(state): State<AppState>,
    Query(query): Query<StationsNearQuery>,
) -> Result<Json<Vec<StationResult>>, AppError> {
    let stations = state
        .planner
        .find_stations_near(query.lat, query.lng, query.radius_km)
        .await?;

    Ok(Json(
        stations
            .iter()
            .map(|s| StationResult::from_station(s))
            .collect(),
    ))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Infeasible { message: String },
    Upstream { message: String },
    Internal { message: String },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Infeasible { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Infeasible { message }
            | AppError::Upstream { message }
            | AppError::Internal { message } => message,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        let message = e.to_string();
        match e {
            ServiceError::Domain(DomainError::InvalidSpecification { .. }) => {
                AppError::BadRequest { message }
            }
            ServiceError::Provider(ProviderError::NotFound(_) | ProviderError::NoRoute { .. }) => {
                AppError::NotFound { message }
            }
            ServiceError::Provider(ProviderError::Upstream { .. }) => AppError::Upstream { message },
            ServiceError::Plan(PlanError::RouteInfeasible { .. }) => AppError::Infeasible { message },
            ServiceError::Plan(_) | ServiceError::Domain(_) => AppError::Internal { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, message = self.message(), "Request failed");
        } else {
            warn!(%status, message = self.message(), "Request rejected");
        }

        let body = Json(ErrorResponse {
            error: self.message().to_string(),
        });
        (status, body).into_response()
    }
}
