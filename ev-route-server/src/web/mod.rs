//! Web layer for the EV route planner.
//!
//! Provides HTTP endpoints for planning routes and looking up stations.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
