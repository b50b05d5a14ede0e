use super::domain::{LicenseeStatus, PrisonId, RhuId};

/// Failures raised by the placement registry and its components.
///
/// Every variant is a local, synchronous rejection; none leaves partial state behind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlacementError {
    #[error("{rhu} is at capacity ({capacity})")]
    CapacityExceeded { rhu: RhuId, capacity: u32 },
    #[error("licensee {prison_id} already occupies {rhu}")]
    AlreadyAllocated { prison_id: PrisonId, rhu: RhuId },
    #[error("invalid cost input: {reason}")]
    InvalidCostInput { reason: String },
    #[error("licensee {prison_id} is already registered")]
    DuplicateIdentity { prison_id: PrisonId },
    #[error("unknown licensee {prison_id}")]
    UnknownLicensee { prison_id: PrisonId },
    #[error("unknown {rhu}")]
    UnknownRhu { rhu: RhuId },
    #[error("licensee {prison_id} has exited and cannot change placement")]
    TerminalStatus { prison_id: PrisonId },
    #[error("licensee {prison_id} cannot move from {from} to {to} directly")]
    IllegalStatusTransition {
        prison_id: PrisonId,
        from: LicenseeStatus,
        to: LicenseeStatus,
    },
    #[error("licensee {prison_id} still occupies {rhu}; release it first")]
    StillOccupying { prison_id: PrisonId, rhu: RhuId },
    #[error("invalid unit definition: {reason}")]
    InvalidUnit { reason: String },
}

impl PlacementError {
    /// True for the two halves of an unknown-entity reference.
    pub fn is_unknown_entity(&self) -> bool {
        matches!(
            self,
            PlacementError::UnknownLicensee { .. } | PlacementError::UnknownRhu { .. }
        )
    }
}
