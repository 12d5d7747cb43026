//! EV route planning server.
//!
//! Plans long-distance electric vehicle trips: resolves the endpoints,
//! fetches a driving route and the charging stations along it, and picks
//! where to stop and for how long.

pub mod cache;
pub mod config;
pub mod domain;
pub mod ocm;
pub mod ors;
pub mod planner;
pub mod presets;
pub mod providers;
pub mod service;
pub mod web;
