//! Licensee placement into residential housing units.
//!
//! [`PlacementRegistry`] owns every entity and composes the ranking engine, the conflict
//! detector, the occupancy state machine, and the session cost ledger for callers.

mod allocation;
pub mod conflict;
pub mod domain;
mod error;
pub mod ledger;
pub mod ranking;
mod registry;
pub mod router;

#[cfg(test)]
mod tests;

pub use conflict::{conflicting_flags, has_conflict};
pub use domain::{Licensee, LicenseeStatus, NewLicensee, NewRhu, PrisonId, Rhu, RhuId};
pub use error::PlacementError;
pub use ledger::CostLedger;
pub use ranking::{rank_units, score_unit, RankedUnit};
pub use registry::PlacementRegistry;
pub use router::{
    placement_router, AllocationRequest, CostRequest, NotesUpdate, ReleaseRequest,
};
