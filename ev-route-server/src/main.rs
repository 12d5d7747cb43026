use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use ev_route_server::config::AppConfig;
use ev_route_server::service::Backend;
use ev_route_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ev_route_server=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let backend = Backend::from_config(&config)?;

    let state = AppState::new(backend, config.planner.clone());
    let app = create_router(state, &config.cors_allowed_origins);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "EV route planner listening");
    info!("API endpoints:");
    info!("  POST /api/route/plan      - Plan a route with charging stops");
    info!("  GET  /api/stations/near   - Stations around a point");
    info!("  GET  /api/health          - Health check");
    info!("  GET  /api/ev/presets      - Built-in vehicle presets");

    axum::serve(listener, app).await?;
    Ok(())
}
