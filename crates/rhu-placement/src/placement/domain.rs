use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unique, immutable identity of a licensee.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrisonId(pub String);

impl PrisonId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PrisonId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for PrisonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry-assigned handle for an RHU. Unit names are not unique, so callers address
/// units through this identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RhuId(pub usize);

impl fmt::Display for RhuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rhu-{}", self.0)
    }
}

/// Placement lifecycle of a licensee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LicenseeStatus {
    Pending,
    Allocated,
    Exited,
}

impl LicenseeStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LicenseeStatus::Pending => "Pending",
            LicenseeStatus::Allocated => "Allocated",
            LicenseeStatus::Exited => "Exited",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, LicenseeStatus::Exited)
    }
}

impl fmt::Display for LicenseeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Intake payload for a licensee. Status is not accepted; every licensee starts `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLicensee {
    pub prison_id: PrisonId,
    pub name: String,
    pub release_date: NaiveDate,
    #[serde(default)]
    pub licence_conditions: BTreeSet<String>,
    #[serde(default)]
    pub required_matching_attributes: BTreeSet<String>,
    #[serde(default)]
    pub health_and_misc_notes: String,
}

/// A supervised individual awaiting or holding a placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Licensee {
    pub prison_id: PrisonId,
    pub name: String,
    pub release_date: NaiveDate,
    pub status: LicenseeStatus,
    pub licence_conditions: BTreeSet<String>,
    pub required_matching_attributes: BTreeSet<String>,
    pub health_and_misc_notes: String,
}

impl Licensee {
    pub(crate) fn from_intake(intake: NewLicensee) -> Self {
        Self {
            prison_id: intake.prison_id,
            name: intake.name,
            release_date: intake.release_date,
            status: LicenseeStatus::Pending,
            licence_conditions: intake.licence_conditions,
            required_matching_attributes: intake.required_matching_attributes,
            health_and_misc_notes: intake.health_and_misc_notes,
        }
    }

    /// Days from `today` until release; negative once the release date has passed.
    pub fn days_until_release(&self, today: NaiveDate) -> i64 {
        (self.release_date - today).num_days()
    }

    pub fn basic_info(&self) -> String {
        format!("Name: {}, Prison ID: {}", self.name, self.prison_id)
    }
}

impl fmt::Display for Licensee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) - {}", self.name, self.prison_id, self.status)
    }
}

/// Intake payload for a residential housing unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRhu {
    pub name: String,
    pub capacity: u32,
    pub cost_per_day: f64,
    #[serde(default)]
    pub supported_attributes: BTreeSet<String>,
    #[serde(default)]
    pub location_flags: BTreeSet<String>,
}

/// A capacity-bounded placement destination.
///
/// `current_licensees` holds prison ids into the registry in arrival order; the
/// licensee records themselves stay owned by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rhu {
    pub id: RhuId,
    pub name: String,
    pub capacity: u32,
    pub cost_per_day: f64,
    pub supported_attributes: BTreeSet<String>,
    pub location_flags: BTreeSet<String>,
    pub current_licensees: Vec<PrisonId>,
}

impl Rhu {
    pub(crate) fn from_intake(id: RhuId, intake: NewRhu) -> Self {
        Self {
            id,
            name: intake.name,
            capacity: intake.capacity,
            cost_per_day: intake.cost_per_day,
            supported_attributes: intake.supported_attributes,
            location_flags: intake.location_flags,
            current_licensees: Vec::new(),
        }
    }

    pub fn occupancy(&self) -> usize {
        self.current_licensees.len()
    }

    pub fn has_space(&self) -> bool {
        self.occupancy() < self.capacity as usize
    }

    pub fn houses(&self, prison_id: &PrisonId) -> bool {
        self.current_licensees.contains(prison_id)
    }
}

impl fmt::Display for Rhu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Cap: {}, £{:?}/day)",
            self.name, self.capacity, self.cost_per_day
        )
    }
}
