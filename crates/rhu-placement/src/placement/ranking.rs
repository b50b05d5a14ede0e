use serde::{Deserialize, Serialize};

use super::domain::{Licensee, Rhu};

/// Score awarded for each required attribute the unit supports.
pub const MATCHED_ATTRIBUTE_SCORE: f64 = 10.0;
/// Penalty for each unit location flag that matches a licence condition.
pub const CONFLICT_PENALTY: f64 = 5.0;

/// One scored candidate with the trail that produced its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedUnit {
    pub rhu: Rhu,
    pub score: f64,
    pub matched_attributes: Vec<String>,
    pub conflicting_flags: Vec<String>,
    pub cost_penalty: f64,
}

/// Score a single unit for a licensee.
///
/// Attribute matches add, conflicts subtract, and the raw daily cost is subtracted
/// without any normalization.
pub fn score_unit(licensee: &Licensee, rhu: &Rhu) -> RankedUnit {
    let mut score = 0.0;

    let matched_attributes: Vec<String> = licensee
        .required_matching_attributes
        .iter()
        .filter(|attribute| rhu.supported_attributes.contains(*attribute))
        .cloned()
        .collect();
    score += MATCHED_ATTRIBUTE_SCORE * matched_attributes.len() as f64;

    let conflicting_flags: Vec<String> = rhu
        .location_flags
        .iter()
        .filter(|flag| licensee.licence_conditions.contains(*flag))
        .cloned()
        .collect();
    score -= CONFLICT_PENALTY * conflicting_flags.len() as f64;

    let cost_penalty = rhu.cost_per_day;
    score -= cost_penalty;

    RankedUnit {
        rhu: rhu.clone(),
        score,
        matched_attributes,
        conflicting_flags,
        cost_penalty,
    }
}

/// Rank every unit, best first. Full and conflicting units are kept.
///
/// The sort is stable, so equal scores stay in the order `units` yields them.
pub fn rank_units<'a, I>(licensee: &Licensee, units: I) -> Vec<RankedUnit>
where
    I: IntoIterator<Item = &'a Rhu>,
{
    let mut ranked: Vec<RankedUnit> = units
        .into_iter()
        .map(|rhu| score_unit(licensee, rhu))
        .collect();
    ranked.sort_by(|left, right| right.score.total_cmp(&left.score));
    ranked
}
