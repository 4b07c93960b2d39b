//! complaint-router core
//!
//! Sanitation complaint tracking with real-time change notifications and
//! greedy nearest-neighbor route planning for field workers.

pub mod bus;
pub mod config;
pub mod error;
pub mod haversine;
pub mod lifecycle;
pub mod model;
pub mod planner;
pub mod server;
pub mod store;
pub mod traits;

pub use error::{Error, Result};
