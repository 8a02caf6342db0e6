//! Sprint resource capacity planning.
//!
//! Work-location [`models::Configuration`]s, a man-days to story points
//! lookup table and a roster of resources whose capacity is derived by the
//! [`capacity::CapacityEngine`]. State lives in a client-local key/value
//! [`db::Database`] and is managed through a [`planner::Planner`].

pub mod capacity;
pub mod db;
pub mod error;
pub mod models;
pub mod planner;
pub mod render;
pub mod session;
pub mod settings;
pub mod store;

pub use error::{PlannerError, Result};
