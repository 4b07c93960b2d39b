//! Test fixtures for complaint-router.
//!
//! Provides realistic test data including:
//! - Real Bengaluru landmarks used as complaint sites
//! - In-memory collaborators that record what the core does to them

pub mod bengaluru_locations;
pub mod collaborators;

#[allow(unused_imports)]
pub use bengaluru_locations::*;
#[allow(unused_imports)]
pub use collaborators::*;
