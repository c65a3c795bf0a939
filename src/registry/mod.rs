//! Schedule & holiday registry.
//!
//! Read-only lookups: which [`WorkSchedule`] applies to an employee on a
//! date, and whether a date is a public holiday.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};
use crate::models::{EmployeeScheduleAssignment, PublicHoliday, WorkSchedule};

/// Resolves employees to their applicable work schedule.
#[derive(Debug, Clone, Default)]
pub struct ScheduleRegistry {
    schedules: HashMap<String, WorkSchedule>,
    assignments: Vec<EmployeeScheduleAssignment>,
}

impl ScheduleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces a schedule.
    pub fn upsert_schedule(&mut self, schedule: WorkSchedule) {
        self.schedules.insert(schedule.id.clone(), schedule);
    }

    /// Returns a schedule by id.
    pub fn schedule(&self, schedule_id: &str) -> Option<&WorkSchedule> {
        self.schedules.get(schedule_id)
    }

    /// Adds an assignment linking an employee to a schedule.
    ///
    /// The referenced schedule must exist and be active.
    pub fn add_assignment(&mut self, assignment: EmployeeScheduleAssignment) -> EngineResult<()> {
        match self.schedules.get(&assignment.schedule_id) {
            None => Err(EngineError::NotFound {
                entity: "work_schedule".to_string(),
                id: assignment.schedule_id.clone(),
            }),
            Some(schedule) if !schedule.is_active => Err(EngineError::validation(
                "schedule_id",
                format!("schedule '{}' is inactive", assignment.schedule_id),
            )),
            Some(_) => {
                self.assignments.push(assignment);
                Ok(())
            }
        }
    }

    /// Resolves the schedule applicable to an employee on a date.
    ///
    /// Picks the latest assignment whose `start_date` is on or before
    /// `date`; fails with [`EngineError::NoScheduleAssigned`] when no
    /// assignment covers the date.
    pub fn schedule_for(&self, employee_id: &str, date: NaiveDate) -> EngineResult<&WorkSchedule> {
        let assignment = self
            .assignments
            .iter()
            .filter(|a| a.employee_id == employee_id && a.start_date <= date)
            .max_by_key(|a| a.start_date)
            .ok_or_else(|| EngineError::NoScheduleAssigned {
                employee_id: employee_id.to_string(),
                date,
            })?;

        self.schedules
            .get(&assignment.schedule_id)
            .ok_or_else(|| EngineError::NotFound {
                entity: "work_schedule".to_string(),
                id: assignment.schedule_id.clone(),
            })
    }
}

/// The public-holiday calendar.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    holidays: Vec<PublicHoliday>,
}

impl HolidayCalendar {
    /// Creates an empty calendar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a holiday. The date must not already be covered.
    pub fn add(&mut self, holiday: PublicHoliday) -> EngineResult<()> {
        if self.holiday_on(holiday.holiday_date).is_some() {
            return Err(EngineError::constraint(format!(
                "a public holiday already covers {}",
                holiday.holiday_date
            )));
        }
        self.holidays.push(holiday);
        Ok(())
    }

    /// Removes a holiday by id and returns it.
    pub fn remove(&mut self, holiday_id: &str) -> EngineResult<PublicHoliday> {
        let position = self
            .holidays
            .iter()
            .position(|h| h.id == holiday_id)
            .ok_or_else(|| EngineError::NotFound {
                entity: "public_holiday".to_string(),
                id: holiday_id.to_string(),
            })?;
        Ok(self.holidays.remove(position))
    }

    /// Returns the holiday covering a date, if any.
    pub fn holiday_on(&self, date: NaiveDate) -> Option<&PublicHoliday> {
        self.holidays.iter().find(|h| h.applies_on(date))
    }
}
