//! Charging-stop planner.
//!
//! Given a fixed route geometry, a vehicle and the stations the directory
//! knows about, this module decides where to stop and for how long:
//!
//! 1. [`filter_corridor`] keeps operational stations near the route, ordered
//!    by along-route distance.
//! 2. [`ChargePlanner`] walks the route greedily, stopping at the furthest
//!    reachable station whenever the rest of the trip is out of range.
//! 3. [`ItineraryAssembler`] attaches drive times and totals.
//!
//! Everything here is synchronous and free of I/O.

mod charge;
mod config;
mod corridor;
mod error;
mod itinerary;

pub use charge::{ChargePlan, ChargePlanner, LegSpan};
pub use config::{PlannerConfig, TieBreak};
pub use corridor::{CorridorStation, corridor_bounding_box, filter_corridor};
pub use error::PlanError;
pub use itinerary::{ItineraryAssembler, drive_minutes, plan};
