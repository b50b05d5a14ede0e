use std::sync::Mutex;

use tracing::debug;

use super::domain::Rhu;
use super::error::PlacementError;

/// Minor currency units (pence) per pound.
pub const PENCE_PER_POUND: i64 = 100;

/// Session-wide cost accumulator shared by every cost computation.
///
/// The running total is not tied to a unit or a licensee; each `total_cost` call adds its
/// increment regardless of which unit it was computed for. Amounts are held in pence and
/// only converted to pounds on the way out, so split periods sum to the same total as one
/// combined period.
#[derive(Debug, Default)]
pub struct CostLedger {
    running_total_pence: Mutex<i64>,
}

impl CostLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn daily_cost(&self, rhu: &Rhu) -> f64 {
        rhu.cost_per_day
    }

    /// Cost of `days` at the unit's daily rate. The increment is added to the running
    /// total and returned; the running total itself is read through [`Self::running_total`].
    pub fn total_cost(&self, days: i64, rhu: &Rhu) -> Result<f64, PlacementError> {
        if days < 0 {
            return Err(PlacementError::InvalidCostInput {
                reason: format!("days must be non-negative, found {days}"),
            });
        }
        let rate = daily_rate_pence(rhu.cost_per_day)
            .map_err(|reason| PlacementError::InvalidCostInput { reason })?;
        let increment = days
            .checked_mul(rate)
            .ok_or_else(|| PlacementError::InvalidCostInput {
                reason: format!("{days} days at {} per day overflows the ledger", rhu.cost_per_day),
            })?;

        let mut total = self
            .running_total_pence
            .lock()
            .expect("ledger lock poisoned");
        *total = total
            .checked_add(increment)
            .ok_or_else(|| PlacementError::InvalidCostInput {
                reason: "running total overflows the ledger".to_string(),
            })?;
        debug!(
            rhu = %rhu.id,
            days,
            increment_pence = increment,
            running_total_pence = *total,
            "cost accumulated"
        );
        Ok(to_pounds(increment))
    }

    pub fn running_total(&self) -> f64 {
        to_pounds(self.running_total_pence())
    }

    pub fn running_total_pence(&self) -> i64 {
        *self
            .running_total_pence
            .lock()
            .expect("ledger lock poisoned")
    }

    pub fn reset(&self) {
        *self
            .running_total_pence
            .lock()
            .expect("ledger lock poisoned") = 0;
        debug!("cost ledger reset");
    }
}

/// Daily rate in whole pence, rounded to the nearest penny.
///
/// Rates must be finite, non-negative, and small enough to count in pence.
pub(crate) fn daily_rate_pence(cost_per_day: f64) -> Result<i64, String> {
    if !cost_per_day.is_finite() {
        return Err(format!("cost_per_day must be finite, found {cost_per_day}"));
    }
    if cost_per_day < 0.0 {
        return Err(format!(
            "cost_per_day must be non-negative, found {cost_per_day}"
        ));
    }
    let pence = (cost_per_day * PENCE_PER_POUND as f64).round();
    // 2^63 is exactly representable, so anything at or above it cannot fit.
    if pence >= i64::MAX as f64 {
        return Err(format!("cost_per_day is too large, found {cost_per_day}"));
    }
    Ok(pence as i64)
}

fn to_pounds(pence: i64) -> f64 {
    pence as f64 / PENCE_PER_POUND as f64
}
