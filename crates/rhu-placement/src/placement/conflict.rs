use super::domain::{Licensee, Rhu};

/// True when any licence condition matches one of the unit's location flags.
///
/// Advisory only: allocation never consults this, callers gate on it.
pub fn has_conflict(licensee: &Licensee, rhu: &Rhu) -> bool {
    !licensee
        .licence_conditions
        .is_disjoint(&rhu.location_flags)
}

/// The overlapping tags, sorted.
pub fn conflicting_flags(licensee: &Licensee, rhu: &Rhu) -> Vec<String> {
    licensee
        .licence_conditions
        .intersection(&rhu.location_flags)
        .cloned()
        .collect()
}
