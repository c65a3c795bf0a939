//! The day classifier state machine.
//!
//! Decision order for a given (employee, date):
//! 1. an approved leave interval is terminal for the day;
//! 2. a recovery day off credits the employee;
//! 3. a public holiday on a scheduled working day classifies as holiday
//!    or holiday-overtime and suspends any recovery debt on the date;
//! 4. a recovery debt day classifies as recovery whether or not the
//!    employee shows up (absence is handled by the ledger, not here);
//! 5. a weekday outside the schedule's working days is a weekend;
//! 6. otherwise clock events and tolerances decide.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EngineDefaults;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceDailyRecord, ClockEvents, DayStatus, DayTag, EmployeeRecovery, PublicHoliday,
    WorkSchedule,
};

use super::breaks::deduct_breaks;

/// The flavor of an approved absence interval, as flagged by the leave
/// workflow collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveKind {
    /// Ordinary approved leave.
    Leave,
    /// Business mission.
    Mission,
    /// Training session.
    Training,
    /// Sick leave.
    Sick,
}

impl LeaveKind {
    /// The day status a covering interval of this kind produces.
    pub fn day_status(&self) -> DayStatus {
        match self {
            LeaveKind::Leave => DayStatus::Leave,
            LeaveKind::Mission => DayStatus::Mission,
            LeaveKind::Training => DayStatus::Training,
            LeaveKind::Sick => DayStatus::Sick,
        }
    }
}

/// Everything the classifier needs to know about one employee-date.
///
/// All fields are facts gathered by the caller; the classifier performs
/// no lookups of its own and is therefore trivially repeatable.
#[derive(Debug, Clone)]
pub struct DayFacts<'a> {
    /// The employee being classified.
    pub employee_id: &'a str,
    /// The date being classified.
    pub date: NaiveDate,
    /// The schedule applicable on the date.
    pub schedule: &'a WorkSchedule,
    /// Engine defaults for null schedule fields.
    pub defaults: &'a EngineDefaults,
    /// The public holiday covering the date, if any.
    pub holiday: Option<&'a PublicHoliday>,
    /// The approved leave interval covering the date, if any.
    pub leave: Option<LeaveKind>,
    /// The employee's recovery assignment on the date, if any.
    pub recovery: Option<&'a EmployeeRecovery>,
    /// Validated clock events for the date.
    pub clocks: ClockEvents,
}

/// The classifier's output for one employee-date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayClassification {
    /// The derived day status.
    pub day_status: DayStatus,
    /// Hours worked after break deduction.
    pub hours_worked: Decimal,
    /// Whether the schedule marks the date as a working day.
    pub is_working_day: bool,
    /// Hours beyond the scheduled day, forwarded to the rate engine.
    /// Zero unless the base status allows overtime.
    pub overtime_hours: Decimal,
    /// Structured flags describing the classification.
    pub tags: Vec<DayTag>,
}

impl DayClassification {
    /// Materializes the classification as a daily record.
    pub fn into_record(self, employee_id: &str, work_date: NaiveDate) -> AttendanceDailyRecord {
        AttendanceDailyRecord {
            employee_id: employee_id.to_string(),
            work_date,
            day_status: self.day_status,
            hours_worked: self.hours_worked,
            is_working_day: self.is_working_day,
            tags: self.tags,
            notes: None,
        }
    }
}

/// Derives the day status for one employee-date.
///
/// Pure and deterministic: calling it twice with the same facts yields
/// an identical classification.
///
/// # Errors
///
/// Returns a validation error when the clock events are inconsistent
/// (clock-out before clock-in).
pub fn classify(facts: &DayFacts<'_>) -> EngineResult<DayClassification> {
    if let (Some(clock_in), Some(clock_out)) = (facts.clocks.clock_in, facts.clocks.clock_out) {
        if clock_out < clock_in {
            return Err(EngineError::validation(
                "clocks",
                format!(
                    "clock-out {} precedes clock-in {} for employee '{}'",
                    clock_out, clock_in, facts.employee_id
                ),
            ));
        }
    }

    let schedule = facts.schedule;
    let weekday_number = facts.date.weekday().number_from_monday() as u8;
    let is_working_day = schedule.is_working_weekday(weekday_number);

    // 1. Approved leave is terminal for the day.
    if let Some(kind) = facts.leave {
        return Ok(DayClassification {
            day_status: kind.day_status(),
            hours_worked: Decimal::ZERO,
            is_working_day,
            overtime_hours: Decimal::ZERO,
            tags: vec![],
        });
    }

    // 2. Recovery day off: the employee is credited the day.
    if let Some(recovery) = facts.recovery {
        if recovery.is_day_off {
            return Ok(DayClassification {
                day_status: DayStatus::RecoveryOff,
                hours_worked: Decimal::ZERO,
                is_working_day,
                overtime_hours: Decimal::ZERO,
                tags: vec![DayTag::RecoveryAssigned {
                    declaration_id: recovery.recovery_declaration_id.clone(),
                }],
            });
        }
    }

    // 3. Public holiday on a scheduled working day. Evaluated before
    //    recovery debt: a holiday suspends the debt for the date, which
    //    is what lets the holiday cascade flip recovery rows.
    if is_working_day {
        if let Some(holiday) = facts.holiday {
            let worked = if facts.clocks.is_empty() {
                Decimal::ZERO
            } else {
                worked_hours(facts)?
            };
            let status = if facts.clocks.is_empty() {
                DayStatus::Holiday
            } else {
                // All worked hours are billed at the top overtime tier;
                // the rate engine applies the holiday override.
                DayStatus::HolidayOvertime
            };
            return Ok(DayClassification {
                day_status: status,
                hours_worked: worked,
                is_working_day,
                overtime_hours: worked,
                tags: vec![DayTag::HolidayApplied {
                    holiday_name: holiday.name.clone(),
                    previous_status: DayStatus::Pending,
                }],
            });
        }
    }

    // 4. Recovery debt: the status is recovery regardless of presence;
    //    the ledger decides completion or deduction afterwards.
    if let Some(recovery) = facts.recovery {
        let worked = if facts.clocks.is_empty() {
            Decimal::ZERO
        } else {
            worked_hours(facts)?
        };
        return Ok(DayClassification {
            day_status: DayStatus::Recovery,
            hours_worked: worked,
            is_working_day,
            overtime_hours: Decimal::ZERO,
            tags: vec![DayTag::RecoveryAssigned {
                declaration_id: recovery.recovery_declaration_id.clone(),
            }],
        });
    }

    // 5. Weekday outside the schedule's working days.
    if !is_working_day {
        return Ok(DayClassification {
            day_status: DayStatus::Weekend,
            hours_worked: Decimal::ZERO,
            is_working_day,
            overtime_hours: Decimal::ZERO,
            tags: vec![],
        });
    }

    // 6. Clock events against schedule tolerances.
    classify_from_clocks(facts)
}

/// Worked hours after break deduction for the recorded clock span.
fn worked_hours(facts: &DayFacts<'_>) -> EngineResult<Decimal> {
    let (clock_in, clock_out) = match (facts.clocks.clock_in, facts.clocks.clock_out) {
        (Some(i), Some(o)) => (i, o),
        _ => return Ok(Decimal::ZERO),
    };
    let span_minutes = (clock_out - clock_in).num_minutes();
    let span_hours = Decimal::from(span_minutes) / Decimal::from(60);
    Ok(deduct_breaks(span_hours, &facts.schedule.break_policy))
}

fn classify_from_clocks(facts: &DayFacts<'_>) -> EngineResult<DayClassification> {
    let schedule = facts.schedule;
    let defaults = facts.defaults;

    let clock_in = match facts.clocks.clock_in {
        None => {
            return Ok(DayClassification {
                day_status: DayStatus::Absent,
                hours_worked: Decimal::ZERO,
                is_working_day: true,
                overtime_hours: Decimal::ZERO,
                tags: vec![],
            });
        }
        Some(clock_in) => clock_in,
    };

    // A clock-in without a clock-out cannot be resolved yet.
    let clock_out = match facts.clocks.clock_out {
        None => {
            return Ok(DayClassification {
                day_status: DayStatus::Pending,
                hours_worked: Decimal::ZERO,
                is_working_day: true,
                overtime_hours: Decimal::ZERO,
                tags: vec![],
            });
        }
        Some(clock_out) => clock_out,
    };

    let tolerance_late = schedule
        .tolerance_late_minutes
        .unwrap_or(defaults.tolerance_late_minutes);
    let tolerance_early = schedule
        .tolerance_early_leave_minutes
        .unwrap_or(defaults.tolerance_early_leave_minutes);
    let min_half_day = schedule
        .min_hours_for_half_day
        .unwrap_or(defaults.min_hours_for_half_day);

    let hours = worked_hours(facts)?;

    let late_by = (clock_in.time() - schedule.day_start).num_minutes();
    let left_early_by = (schedule.day_end - clock_out.time()).num_minutes();

    let day_status = if hours < min_half_day {
        DayStatus::Partial
    } else if left_early_by > tolerance_early as i64 {
        DayStatus::EarlyLeave
    } else if late_by > tolerance_late as i64 {
        DayStatus::Late
    } else {
        DayStatus::Present
    };

    let scheduled = schedule.scheduled_hours();
    let (overtime_hours, tags) = if hours > scheduled {
        let excess = hours - scheduled;
        (excess, vec![DayTag::OvertimeForwarded { hours: excess }])
    } else {
        (Decimal::ZERO, vec![])
    };

    Ok(DayClassification {
        day_status,
        hours_worked: hours,
        is_working_day: true,
        overtime_hours,
        tags,
    })
}
