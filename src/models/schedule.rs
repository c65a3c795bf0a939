//! Work schedule and assignment models.
//!
//! This module defines the [`WorkSchedule`] an employee is measured
//! against and the [`EmployeeScheduleAssignment`] rows linking employees
//! to schedules over time.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Break policy attached to a work schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakPolicy {
    /// Minutes deducted per automatic break.
    pub default_break_minutes: u32,
    /// Worked hours after which a break is assumed taken.
    pub break_start_after_hours: Decimal,
    /// Whether the engine deducts breaks without explicit break records.
    pub deduct_break_automatically: bool,
    /// Whether more than one automatic break may apply per day.
    pub allow_multiple_breaks: bool,
    /// Upper bound on automatic breaks per day.
    pub max_breaks_per_day: u32,
}

/// A named work schedule owned by HR configuration.
///
/// The tolerance and half-day fields are nullable: `None` means "use the
/// engine-wide default", which must be supplied by configuration; the
/// engine carries no hardcoded fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkSchedule {
    /// Unique identifier of the schedule.
    pub id: String,
    /// Weekday numbers 1 (Monday) through 7 (Sunday) that are working days.
    pub working_days: BTreeSet<u8>,
    /// Scheduled start of the working day.
    pub day_start: NaiveTime,
    /// Scheduled end of the working day.
    pub day_end: NaiveTime,
    /// Minutes of lateness tolerated before a clock-in counts as late.
    pub tolerance_late_minutes: Option<u32>,
    /// Minutes of early departure tolerated before a clock-out counts
    /// as an early leave.
    pub tolerance_early_leave_minutes: Option<u32>,
    /// Worked hours below which the day is classified partial.
    pub min_hours_for_half_day: Option<Decimal>,
    /// The break policy applied during hour computation.
    pub break_policy: BreakPolicy,
    /// Inactive schedules are kept for history but never assigned.
    pub is_active: bool,
    /// Optimistic version, bumped on every admin edit.
    pub version: u32,
}

impl WorkSchedule {
    /// True when the given weekday number (1 = Monday) is a working day.
    pub fn is_working_weekday(&self, weekday_number: u8) -> bool {
        self.working_days.contains(&weekday_number)
    }

    /// Scheduled day length in hours.
    pub fn scheduled_hours(&self) -> Decimal {
        let minutes = (self.day_end - self.day_start).num_minutes();
        Decimal::from(minutes) / Decimal::from(60)
    }
}

/// Links an employee to a schedule from a start date onward.
///
/// An employee accumulates assignments over time; the registry resolves
/// "schedule as of date" by picking the latest assignment whose
/// `start_date` is on or before the date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeScheduleAssignment {
    /// The employee being assigned.
    pub employee_id: String,
    /// The schedule assigned.
    pub schedule_id: String,
    /// First date the assignment applies.
    pub start_date: NaiveDate,
    /// Whether this is the employee's primary assignment.
    pub is_primary: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn standard_schedule() -> WorkSchedule {
        WorkSchedule {
            id: "std_39h".to_string(),
            working_days: [1, 2, 3, 4, 5].into_iter().collect(),
            day_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            day_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            tolerance_late_minutes: Some(10),
            tolerance_early_leave_minutes: Some(10),
            min_hours_for_half_day: Some(Decimal::from(4)),
            break_policy: BreakPolicy {
                default_break_minutes: 60,
                break_start_after_hours: Decimal::from(6),
                deduct_break_automatically: true,
                allow_multiple_breaks: false,
                max_breaks_per_day: 1,
            },
            is_active: true,
            version: 1,
        }
    }

    #[test]
    fn test_working_weekday_monday_to_friday() {
        let schedule = standard_schedule();
        for day in 1..=5 {
            assert!(schedule.is_working_weekday(day));
        }
        assert!(!schedule.is_working_weekday(6));
        assert!(!schedule.is_working_weekday(7));
    }

    #[test]
    fn test_scheduled_hours_nine_to_five() {
        let schedule = standard_schedule();
        assert_eq!(schedule.scheduled_hours(), Decimal::from(8));
    }

    #[test]
    fn test_scheduled_hours_half_hour_granularity() {
        let mut schedule = standard_schedule();
        schedule.day_end = NaiveTime::from_hms_opt(17, 30, 0).unwrap();
        assert_eq!(
            schedule.scheduled_hours(),
            Decimal::from_str("8.5").unwrap()
        );
    }

    #[test]
    fn test_nullable_tolerances_serialize_as_null() {
        let mut schedule = standard_schedule();
        schedule.tolerance_late_minutes = None;
        let json = serde_json::to_value(&schedule).unwrap();
        assert!(json["tolerance_late_minutes"].is_null());
    }

    #[test]
    fn test_assignment_round_trips_through_json() {
        let assignment = EmployeeScheduleAssignment {
            employee_id: "emp_001".to_string(),
            schedule_id: "std_39h".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            is_primary: true,
        };
        let json = serde_json::to_string(&assignment).unwrap();
        let back: EmployeeScheduleAssignment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, assignment);
    }
}
