//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::PlannerConfig;
use crate::service::{Backend, RoutePlanningService};

/// The planning service as served over HTTP.
pub type Planner = RoutePlanningService<Backend, Backend, Backend>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<Planner>,
}

impl AppState {
    /// Create a new app state with one backend serving every collaborator.
    pub fn new(backend: Backend, config: PlannerConfig) -> Self {
        let planner = RoutePlanningService::new(backend.clone(), backend.clone(), backend, config);
        Self {
            planner: Arc::new(planner),
        }
    }
}
