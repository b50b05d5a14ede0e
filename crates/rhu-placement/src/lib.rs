//! Allocation engine for placing licensees into residential housing units (RHUs).
//!
//! The [`placement`] module owns the entity registry, ranking, conflict detection, the
//! occupancy state machine, and the cost ledger. The remaining modules carry the service
//! plumbing shared with the API binary.

pub mod config;
pub mod error;
pub mod placement;
pub mod telemetry;
