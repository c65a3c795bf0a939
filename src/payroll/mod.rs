//! Payroll period calculation.
//!
//! Translates a per-employee cutoff-day configuration into concrete
//! pay-period date ranges. Pure arithmetic; performs no mutation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Smallest allowed cutoff day.
pub const MIN_CUTOFF_DAY: u8 = 1;
/// Largest allowed cutoff day. Bounded to 28 so period arithmetic never
/// depends on a month's variable length.
pub const MAX_CUTOFF_DAY: u8 = 28;

/// Per-employee payroll cutoff configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollCutoffConfig {
    /// The employee the cutoff applies to.
    pub employee_id: String,
    /// The day of month that closes one pay period and opens the next.
    pub payroll_cutoff_day: u8,
}

impl PayrollCutoffConfig {
    /// Creates a cutoff configuration, validating the day bounds.
    pub fn new(employee_id: String, payroll_cutoff_day: u8) -> EngineResult<Self> {
        if !(MIN_CUTOFF_DAY..=MAX_CUTOFF_DAY).contains(&payroll_cutoff_day) {
            return Err(EngineError::validation(
                "payroll_cutoff_day",
                format!(
                    "{} is outside [{}, {}]",
                    payroll_cutoff_day, MIN_CUTOFF_DAY, MAX_CUTOFF_DAY
                ),
            ));
        }
        Ok(Self {
            employee_id,
            payroll_cutoff_day,
        })
    }
}

/// An inclusive pay-period date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The first day of the period (inclusive).
    pub start_date: NaiveDate,
    /// The last day of the period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Checks if a given date falls within this pay period.
    ///
    /// The check is inclusive of both start and end dates.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Computes the pay period ending in the target month.
///
/// With cutoff day `D` and target month `M`, the period runs from the
/// day after day `D` of month `M-1` through day `D` of month `M`,
/// inclusive. `D` is bounded to [1, 28] so both endpoints always exist.
///
/// # Example
///
/// ```
/// use attendance_engine::payroll::pay_period;
/// use chrono::NaiveDate;
///
/// let period = pay_period(18, 2026, 2).unwrap();
/// assert_eq!(period.start_date, NaiveDate::from_ymd_opt(2026, 1, 19).unwrap());
/// assert_eq!(period.end_date, NaiveDate::from_ymd_opt(2026, 2, 18).unwrap());
/// ```
pub fn pay_period(cutoff_day: u8, year: i32, month: u32) -> EngineResult<PayPeriod> {
    if !(MIN_CUTOFF_DAY..=MAX_CUTOFF_DAY).contains(&cutoff_day) {
        return Err(EngineError::validation(
            "payroll_cutoff_day",
            format!(
                "{} is outside [{}, {}]",
                cutoff_day, MIN_CUTOFF_DAY, MAX_CUTOFF_DAY
            ),
        ));
    }
    if !(1..=12).contains(&month) {
        return Err(EngineError::validation(
            "month",
            format!("{} is not a calendar month", month),
        ));
    }

    let (prior_year, prior_month) = if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    };

    // Day `cutoff_day` exists in every month because of the [1, 28]
    // bound; the period starts the day after the previous cutoff.
    let prior_cutoff = NaiveDate::from_ymd_opt(prior_year, prior_month, cutoff_day as u32)
        .ok_or_else(|| EngineError::validation("year", format!("{} is out of range", year)))?;
    let end_date = NaiveDate::from_ymd_opt(year, month, cutoff_day as u32)
        .ok_or_else(|| EngineError::validation("year", format!("{} is out of range", year)))?;
    let start_date = prior_cutoff
        .succ_opt()
        .ok_or_else(|| EngineError::validation("year", format!("{} is out of range", year)))?;

    Ok(PayPeriod {
        start_date,
        end_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ==========================================================================
    // Scenario E: cutoff 18, target 2026-02
    // ==========================================================================
    #[test]
    fn test_cutoff_18_february_2026() {
        let period = pay_period(18, 2026, 2).unwrap();
        assert_eq!(period.start_date, date(2026, 1, 19));
        assert_eq!(period.end_date, date(2026, 2, 18));
    }

    #[test]
    fn test_january_period_crosses_year_boundary() {
        let period = pay_period(15, 2026, 1).unwrap();
        assert_eq!(period.start_date, date(2025, 12, 16));
        assert_eq!(period.end_date, date(2026, 1, 15));
    }

    #[test]
    fn test_cutoff_28_after_short_february() {
        // Feb 2026 has 28 days; the period starts on March-eve's
        // successor, i.e. 2026-03-01.
        let period = pay_period(28, 2026, 3).unwrap();
        assert_eq!(period.start_date, date(2026, 3, 1));
        assert_eq!(period.end_date, date(2026, 3, 28));
    }

    #[test]
    fn test_cutoff_day_bounds_enforced() {
        assert!(matches!(
            pay_period(0, 2026, 2),
            Err(EngineError::Validation { .. })
        ));
        assert!(matches!(
            pay_period(29, 2026, 2),
            Err(EngineError::Validation { .. })
        ));
        assert!(PayrollCutoffConfig::new("emp_001".to_string(), 29).is_err());
        assert!(PayrollCutoffConfig::new("emp_001".to_string(), 1).is_ok());
    }

    #[test]
    fn test_invalid_month_rejected() {
        assert!(matches!(
            pay_period(15, 2026, 13),
            Err(EngineError::Validation { .. })
        ));
    }

    #[test]
    fn test_contains_date_is_inclusive() {
        let period = pay_period(18, 2026, 2).unwrap();
        assert!(period.contains_date(date(2026, 1, 19)));
        assert!(period.contains_date(date(2026, 2, 18)));
        assert!(!period.contains_date(date(2026, 1, 18)));
        assert!(!period.contains_date(date(2026, 2, 19)));
    }

    proptest! {
        // Consecutive periods tile the calendar: each period starts the
        // day after the previous one ends, for every cutoff day.
        #[test]
        fn prop_periods_are_contiguous(
            cutoff in 1u8..=28,
            month in 2u32..=12,
            year in 2000i32..2100,
        ) {
            let previous = pay_period(cutoff, year, month - 1).unwrap();
            let current = pay_period(cutoff, year, month).unwrap();
            prop_assert_eq!(
                previous.end_date.succ_opt().unwrap(),
                current.start_date
            );
            prop_assert!(current.end_date > current.start_date);
        }
    }
}
