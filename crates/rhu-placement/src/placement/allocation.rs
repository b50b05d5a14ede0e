//! Occupancy state machine.
//!
//! Licensees move `Pending -> Allocated` through [`allocate`], back with [`deallocate`],
//! and into the terminal `Exited` state only through [`set_status`]. The occupant list
//! and the status field are written together under the registry's write lock, so a
//! licensee is `Allocated` exactly when one unit lists it.

use tracing::{info, warn};

use super::domain::{LicenseeStatus, PrisonId, RhuId};
use super::error::PlacementError;
use super::registry::RegistryState;

pub(crate) fn allocate(
    state: &mut RegistryState,
    prison_id: &PrisonId,
    rhu_id: RhuId,
) -> Result<(), PlacementError> {
    let slot = state.licensee_slot(prison_id)?;
    let unit = state.rhu_slot(rhu_id)?;

    if state.licensees[slot].status.is_terminal() {
        warn!(prison_id = %prison_id, rhu = %rhu_id, "allocation rejected for exited licensee");
        return Err(PlacementError::TerminalStatus {
            prison_id: prison_id.clone(),
        });
    }

    if let Some(current) = state.unit_holding(prison_id) {
        warn!(prison_id = %prison_id, rhu = %rhu_id, current = %current, "licensee already placed");
        return Err(PlacementError::AlreadyAllocated {
            prison_id: prison_id.clone(),
            rhu: current,
        });
    }

    let rhu = &mut state.rhus[unit];
    if !rhu.has_space() {
        warn!(prison_id = %prison_id, rhu = %rhu_id, capacity = rhu.capacity, "unit is full");
        return Err(PlacementError::CapacityExceeded {
            rhu: rhu_id,
            capacity: rhu.capacity,
        });
    }

    rhu.current_licensees.push(prison_id.clone());
    let occupancy = rhu.occupancy();
    state.licensees[slot].status = LicenseeStatus::Allocated;

    info!(prison_id = %prison_id, rhu = %rhu_id, occupancy, "licensee allocated");
    Ok(())
}

/// Remove the licensee from the unit if present. Returns whether anything changed.
pub(crate) fn deallocate(
    state: &mut RegistryState,
    prison_id: &PrisonId,
    rhu_id: RhuId,
) -> Result<bool, PlacementError> {
    let slot = state.licensee_slot(prison_id)?;
    let unit = state.rhu_slot(rhu_id)?;

    let occupants = &mut state.rhus[unit].current_licensees;
    let Some(position) = occupants.iter().position(|id| id == prison_id) else {
        return Ok(false);
    };

    occupants.remove(position);
    state.licensees[slot].status = LicenseeStatus::Pending;

    info!(prison_id = %prison_id, rhu = %rhu_id, "licensee released");
    Ok(true)
}

/// Direct status override, limited to the terminal `Exited` transition.
pub(crate) fn set_status(
    state: &mut RegistryState,
    prison_id: &PrisonId,
    status: LicenseeStatus,
) -> Result<(), PlacementError> {
    let slot = state.licensee_slot(prison_id)?;
    let current = state.licensees[slot].status;

    if status != LicenseeStatus::Exited {
        return Err(PlacementError::IllegalStatusTransition {
            prison_id: prison_id.clone(),
            from: current,
            to: status,
        });
    }

    if current == LicenseeStatus::Exited {
        return Ok(());
    }

    if let Some(rhu) = state.unit_holding(prison_id) {
        return Err(PlacementError::StillOccupying {
            prison_id: prison_id.clone(),
            rhu,
        });
    }

    state.licensees[slot].status = LicenseeStatus::Exited;
    info!(prison_id = %prison_id, from = %current, "licensee exited");
    Ok(())
}
