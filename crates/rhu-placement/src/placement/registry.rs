use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use super::allocation;
use super::conflict;
use super::domain::{Licensee, LicenseeStatus, NewLicensee, NewRhu, PrisonId, Rhu, RhuId};
use super::error::PlacementError;
use super::ledger::{daily_rate_pence, CostLedger};
use super::ranking::{rank_units, RankedUnit};

/// Arena holding every licensee and unit in registration order.
#[derive(Debug, Default)]
pub(crate) struct RegistryState {
    pub(crate) licensees: Vec<Licensee>,
    pub(crate) rhus: Vec<Rhu>,
    index: HashMap<PrisonId, usize>,
}

impl RegistryState {
    pub(crate) fn licensee_slot(&self, prison_id: &PrisonId) -> Result<usize, PlacementError> {
        self.index
            .get(prison_id)
            .copied()
            .ok_or_else(|| PlacementError::UnknownLicensee {
                prison_id: prison_id.clone(),
            })
    }

    pub(crate) fn rhu_slot(&self, rhu: RhuId) -> Result<usize, PlacementError> {
        if rhu.0 < self.rhus.len() {
            Ok(rhu.0)
        } else {
            Err(PlacementError::UnknownRhu { rhu })
        }
    }

    /// The unit currently listing this licensee, if any.
    pub(crate) fn unit_holding(&self, prison_id: &PrisonId) -> Option<RhuId> {
        self.rhus
            .iter()
            .find(|rhu| rhu.houses(prison_id))
            .map(|rhu| rhu.id)
    }

    fn licensee(&self, prison_id: &PrisonId) -> Result<&Licensee, PlacementError> {
        let slot = self.licensee_slot(prison_id)?;
        Ok(&self.licensees[slot])
    }

    fn rhu(&self, rhu: RhuId) -> Result<&Rhu, PlacementError> {
        let slot = self.rhu_slot(rhu)?;
        Ok(&self.rhus[slot])
    }
}

/// Owner of every licensee and RHU, and the facade external callers go through.
///
/// All entity state sits behind one lock: mutations take it exclusively so an occupant
/// list and the paired status change land together, and read operations see a
/// consistent snapshot. The cost ledger keeps its own lock.
#[derive(Debug, Default)]
pub struct PlacementRegistry {
    state: RwLock<RegistryState>,
    ledger: CostLedger,
}

impl PlacementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().expect("registry lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().expect("registry lock poisoned")
    }

    /// Register a licensee in `Pending` status.
    pub fn register_licensee(&self, intake: NewLicensee) -> Result<Licensee, PlacementError> {
        let mut state = self.write();
        if state.index.contains_key(&intake.prison_id) {
            return Err(PlacementError::DuplicateIdentity {
                prison_id: intake.prison_id,
            });
        }

        let licensee = Licensee::from_intake(intake);
        let slot = state.licensees.len();
        state.index.insert(licensee.prison_id.clone(), slot);
        state.licensees.push(licensee.clone());

        info!(prison_id = %licensee.prison_id, "licensee registered");
        Ok(licensee)
    }

    /// Register a unit, assigning the next [`RhuId`].
    pub fn register_rhu(&self, intake: NewRhu) -> Result<Rhu, PlacementError> {
        if intake.capacity == 0 {
            return Err(PlacementError::InvalidUnit {
                reason: format!("unit '{}' must have a positive capacity", intake.name),
            });
        }
        daily_rate_pence(intake.cost_per_day)
            .map_err(|reason| PlacementError::InvalidUnit { reason })?;

        let mut state = self.write();
        let rhu = Rhu::from_intake(RhuId(state.rhus.len()), intake);
        state.rhus.push(rhu.clone());

        info!(rhu = %rhu.id, name = %rhu.name, capacity = rhu.capacity, "unit registered");
        Ok(rhu)
    }

    pub fn list_licensees(&self) -> Vec<Licensee> {
        self.read().licensees.clone()
    }

    pub fn list_rhus(&self) -> Vec<Rhu> {
        self.read().rhus.clone()
    }

    pub fn licensee(&self, prison_id: &PrisonId) -> Result<Licensee, PlacementError> {
        self.read().licensee(prison_id).cloned()
    }

    pub fn rhu(&self, rhu: RhuId) -> Result<Rhu, PlacementError> {
        self.read().rhu(rhu).cloned()
    }

    /// Occupants of a unit in arrival order.
    pub fn occupants(&self, rhu: RhuId) -> Result<Vec<Licensee>, PlacementError> {
        let state = self.read();
        let unit = state.rhu(rhu)?;
        unit.current_licensees
            .iter()
            .map(|prison_id| state.licensee(prison_id).cloned())
            .collect()
    }

    /// Replace a licensee's free-text notes. Allowed in every status.
    pub fn update_notes(
        &self,
        prison_id: &PrisonId,
        notes: impl Into<String>,
    ) -> Result<Licensee, PlacementError> {
        let mut state = self.write();
        let slot = state.licensee_slot(prison_id)?;
        state.licensees[slot].health_and_misc_notes = notes.into();
        Ok(state.licensees[slot].clone())
    }

    /// Every registered unit scored for the licensee, best first.
    pub fn rank_rhus_for(&self, prison_id: &PrisonId) -> Result<Vec<RankedUnit>, PlacementError> {
        let state = self.read();
        let licensee = state.licensee(prison_id)?;
        let ranked = rank_units(licensee, &state.rhus);
        debug!(prison_id = %prison_id, candidates = ranked.len(), "units ranked");
        Ok(ranked)
    }

    pub fn has_conflict(&self, prison_id: &PrisonId, rhu: RhuId) -> Result<bool, PlacementError> {
        let state = self.read();
        Ok(conflict::has_conflict(
            state.licensee(prison_id)?,
            state.rhu(rhu)?,
        ))
    }

    pub fn conflicting_flags(
        &self,
        prison_id: &PrisonId,
        rhu: RhuId,
    ) -> Result<Vec<String>, PlacementError> {
        let state = self.read();
        Ok(conflict::conflicting_flags(
            state.licensee(prison_id)?,
            state.rhu(rhu)?,
        ))
    }

    /// Place the licensee, returning `Ok(false)` without any change when the unit is
    /// full. Conflicts are not checked here.
    pub fn allocate(&self, prison_id: &PrisonId, rhu: RhuId) -> Result<bool, PlacementError> {
        match self.try_allocate(prison_id, rhu) {
            Ok(()) => Ok(true),
            Err(PlacementError::CapacityExceeded { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Like [`Self::allocate`] but reports a full unit as `CapacityExceeded`.
    pub fn try_allocate(&self, prison_id: &PrisonId, rhu: RhuId) -> Result<(), PlacementError> {
        allocation::allocate(&mut self.write(), prison_id, rhu)
    }

    /// Release the licensee from the unit. Absent licensees are a no-op returning `false`.
    pub fn deallocate(&self, prison_id: &PrisonId, rhu: RhuId) -> Result<bool, PlacementError> {
        allocation::deallocate(&mut self.write(), prison_id, rhu)
    }

    pub fn set_status(
        &self,
        prison_id: &PrisonId,
        status: LicenseeStatus,
    ) -> Result<(), PlacementError> {
        allocation::set_status(&mut self.write(), prison_id, status)
    }

    pub fn ledger(&self) -> &CostLedger {
        &self.ledger
    }

    pub fn daily_cost(&self, rhu: RhuId) -> Result<f64, PlacementError> {
        let state = self.read();
        Ok(self.ledger.daily_cost(state.rhu(rhu)?))
    }

    pub fn total_cost(&self, days: i64, rhu: RhuId) -> Result<f64, PlacementError> {
        let unit = self.rhu(rhu)?;
        self.ledger.total_cost(days, &unit)
    }

    pub fn reset_costs(&self) {
        self.ledger.reset();
    }
}
