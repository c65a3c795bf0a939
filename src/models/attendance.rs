//! Attendance record model and the closed day-status set.
//!
//! This module defines [`DayStatus`], the single authoritative enumeration
//! of per-day classifications, together with the daily attendance record
//! it is stored on. The stored-string mapping ([`DayStatus::as_str`]) and
//! the validation list ([`DayStatus::ALL`]) are both derived from the one
//! enum so the persisted constraint can never drift from the code.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The classification assigned to one employee on one calendar date.
///
/// This is a closed set: no other value is valid, and every match on it
/// in the engine is exhaustive. Adding a variant requires updating
/// [`DayStatus::ALL`], [`DayStatus::as_str`] and [`DayStatus::from_str`]
/// in the same change; the startup consistency check and the tests in
/// this module assert the three never diverge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// Not yet evaluated.
    Pending,
    /// Present and on time.
    Present,
    /// No clock-in on a scheduled working day.
    Absent,
    /// Clock-in later than the late tolerance.
    Late,
    /// Worked hours below the half-day minimum.
    Partial,
    /// Clock-out earlier than the early-leave tolerance allows.
    EarlyLeave,
    /// Public holiday on a scheduled working day, not worked.
    Holiday,
    /// Public holiday on a scheduled working day, worked; all hours are
    /// billed at the top overtime tier.
    HolidayOvertime,
    /// The weekday is not in the employee's working days.
    Weekend,
    /// Covered by an approved leave interval.
    Leave,
    /// Covered by an approved mission interval.
    Mission,
    /// Covered by an approved training interval.
    Training,
    /// Covered by an approved sick interval.
    Sick,
    /// A recovery day off was credited to the employee.
    RecoveryOff,
    /// The employee owes work on this date (recovery debt).
    Recovery,
    /// A validated overtime record covers the day. Written by overtime
    /// recording flows, never by the classifier.
    Overtime,
}

impl DayStatus {
    /// Every valid status, in declaration order.
    ///
    /// This is the single source for the stored validation constraint.
    pub const ALL: [DayStatus; 16] = [
        DayStatus::Pending,
        DayStatus::Present,
        DayStatus::Absent,
        DayStatus::Late,
        DayStatus::Partial,
        DayStatus::EarlyLeave,
        DayStatus::Holiday,
        DayStatus::HolidayOvertime,
        DayStatus::Weekend,
        DayStatus::Leave,
        DayStatus::Mission,
        DayStatus::Training,
        DayStatus::Sick,
        DayStatus::RecoveryOff,
        DayStatus::Recovery,
        DayStatus::Overtime,
    ];

    /// Returns the stored string form of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            DayStatus::Pending => "pending",
            DayStatus::Present => "present",
            DayStatus::Absent => "absent",
            DayStatus::Late => "late",
            DayStatus::Partial => "partial",
            DayStatus::EarlyLeave => "early_leave",
            DayStatus::Holiday => "holiday",
            DayStatus::HolidayOvertime => "holiday_overtime",
            DayStatus::Weekend => "weekend",
            DayStatus::Leave => "leave",
            DayStatus::Mission => "mission",
            DayStatus::Training => "training",
            DayStatus::Sick => "sick",
            DayStatus::RecoveryOff => "recovery_off",
            DayStatus::Recovery => "recovery",
            DayStatus::Overtime => "overtime",
        }
    }

    /// Parses a stored string back into a status.
    ///
    /// Returns `None` for any string outside the closed set.
    pub fn from_str(s: &str) -> Option<DayStatus> {
        DayStatus::ALL.iter().copied().find(|v| v.as_str() == s)
    }
}

/// A structured, queryable flag attached to an attendance record.
///
/// Replaces the historical practice of appending free-text markers to the
/// record's notes when an automatic reclassification changed the status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayTag {
    /// The status was set because of a public holiday on the date.
    HolidayApplied {
        /// The name of the holiday that drove the classification.
        holiday_name: String,
        /// The status the record held before the holiday cascade.
        previous_status: DayStatus,
    },
    /// The status reflects a recovery declaration the employee is
    /// assigned to.
    RecoveryAssigned {
        /// The id of the driving recovery declaration.
        declaration_id: String,
    },
    /// Hours beyond the scheduled day were forwarded to the overtime
    /// rate engine.
    OvertimeForwarded {
        /// The number of excess hours forwarded.
        hours: Decimal,
    },
}

/// Validated clock-in / clock-out timestamps for one employee-date.
///
/// Capture and device validation happen upstream; the engine only
/// consumes the resulting timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ClockEvents {
    /// The first clock-in of the day, if any.
    pub clock_in: Option<NaiveDateTime>,
    /// The last clock-out of the day, if any.
    pub clock_out: Option<NaiveDateTime>,
}

impl ClockEvents {
    /// True when no clock event at all was recorded for the day.
    pub fn is_empty(&self) -> bool {
        self.clock_in.is_none() && self.clock_out.is_none()
    }
}

/// One row per employee per day: the status plus its derived quantities.
///
/// Created when a day is first evaluated, mutated by re-classification,
/// never silently deleted; corrections are new classifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceDailyRecord {
    /// The employee the record belongs to.
    pub employee_id: String,
    /// The calendar day the record tracks.
    pub work_date: NaiveDate,
    /// The day's classification.
    pub day_status: DayStatus,
    /// Hours worked after break deduction.
    pub hours_worked: Decimal,
    /// Whether the schedule marks this date as a working day.
    pub is_working_day: bool,
    /// Structured flags describing why the status is what it is.
    #[serde(default)]
    pub tags: Vec<DayTag>,
    /// Free-form human notes. Never machine-parsed.
    #[serde(default)]
    pub notes: Option<String>,
}
