//! The overtime log: declared windows and persisted records.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{OvertimeConfig, OvertimePeriod, OvertimePeriodStatus, OvertimeRecord};

use super::rate::{rate_overtime, DayContext};

/// Stores manager-declared overtime windows and recorded overtime, and
/// enforces the write-time rules: period approval, window caps and
/// duplicate rejection.
#[derive(Debug, Clone, Default)]
pub struct OvertimeLog {
    periods: HashMap<String, OvertimePeriod>,
    records: Vec<OvertimeRecord>,
}

impl OvertimeLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an overtime window.
    pub fn declare_period(&mut self, period: OvertimePeriod) -> EngineResult<()> {
        if period.end_time <= period.start_time {
            return Err(EngineError::validation(
                "end_time",
                "an overtime window must end after it starts",
            ));
        }
        if self.periods.contains_key(&period.id) {
            return Err(EngineError::constraint(format!(
                "overtime period '{}' already exists",
                period.id
            )));
        }
        self.periods.insert(period.id.clone(), period);
        Ok(())
    }

    /// Cancels a declared window; its records keep their link.
    pub fn cancel_period(&mut self, period_id: &str) -> EngineResult<()> {
        let period = self
            .periods
            .get_mut(period_id)
            .ok_or_else(|| EngineError::NotFound {
                entity: "overtime_period".to_string(),
                id: period_id.to_string(),
            })?;
        period.status = OvertimePeriodStatus::Cancelled;
        Ok(())
    }

    /// Returns a declared window by id.
    pub fn period(&self, period_id: &str) -> Option<&OvertimePeriod> {
        self.periods.get(period_id)
    }

    /// All records for an employee within an inclusive date range.
    pub fn records_in(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<&OvertimeRecord> {
        self.records
            .iter()
            .filter(|r| {
                r.employee_id == employee_id && r.overtime_date >= start && r.overtime_date <= end
            })
            .collect()
    }

    /// Records overtime for one employee-date.
    ///
    /// The submitted hours are capped to the daily threshold and to the
    /// remaining weekly allowance; hours that would push the calendar
    /// month past `monthly_max_hours` are rejected with a policy error
    /// naming the cap, never truncated. When the configuration requires
    /// prior approval the record must resolve to exactly one active
    /// window for the date and department; without it the record links
    /// to the single matching window when there is one and is stored
    /// unlinked otherwise. Duplicates for the same (employee, date,
    /// window) are rejected, not merged.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &mut self,
        id: String,
        employee_id: String,
        overtime_date: NaiveDate,
        hours: Decimal,
        department_id: &str,
        config: &OvertimeConfig,
        context: DayContext,
    ) -> EngineResult<&OvertimeRecord> {
        if hours <= Decimal::ZERO {
            return Err(EngineError::validation(
                "hours",
                "overtime hours must be positive",
            ));
        }

        // Daily cap.
        let mut classified = hours.min(config.daily_threshold_hours);

        // Weekly cap: only the remaining allowance is classifiable.
        let week_total = self.week_total(&employee_id, overtime_date);
        let weekly_allowance = (config.weekly_threshold_hours - week_total).max(Decimal::ZERO);
        classified = classified.min(weekly_allowance);
        if classified <= Decimal::ZERO {
            return Err(EngineError::PolicyRejection {
                message: format!(
                    "employee '{}' has no classifiable overtime left in the week of {}",
                    employee_id, overtime_date
                ),
                cap: format!("weekly_threshold_hours = {}", config.weekly_threshold_hours),
            });
        }

        // Monthly cap is a hard refusal, not a truncation.
        let month_total = self.month_total(&employee_id, overtime_date);
        if month_total + classified > config.monthly_max_hours {
            warn!(
                employee_id = %employee_id,
                %overtime_date,
                month_total = %month_total,
                "overtime record refused by monthly cap"
            );
            return Err(EngineError::PolicyRejection {
                message: format!(
                    "recording {} hours would bring {}-{:02} to {} hours for employee '{}'",
                    classified,
                    overtime_date.year(),
                    overtime_date.month(),
                    month_total + classified,
                    employee_id
                ),
                cap: format!("monthly_max_hours = {}", config.monthly_max_hours),
            });
        }

        let overtime_period_id =
            self.resolve_period(overtime_date, department_id, config.requires_prior_approval)?;

        if self.records.iter().any(|r| {
            r.employee_id == employee_id
                && r.overtime_date == overtime_date
                && r.overtime_period_id == overtime_period_id
        }) {
            return Err(EngineError::constraint(format!(
                "an overtime record already exists for employee '{}' on {} (period {:?})",
                employee_id, overtime_date, overtime_period_id
            )));
        }

        let rated = rate_overtime(classified, config, context)?;
        info!(
            employee_id = %employee_id,
            %overtime_date,
            hours = %classified,
            override_applied = rated.override_applied,
            "recorded overtime"
        );

        self.records.push(OvertimeRecord {
            id,
            employee_id,
            overtime_date,
            hours: classified,
            buckets: rated.buckets,
            overtime_period_id,
        });
        Ok(self.records.last().expect("just pushed"))
    }

    /// Resolves the window a record should link to.
    fn resolve_period(
        &self,
        date: NaiveDate,
        department_id: &str,
        approval_required: bool,
    ) -> EngineResult<Option<String>> {
        let matching: Vec<&OvertimePeriod> = self
            .periods
            .values()
            .filter(|p| {
                p.status == OvertimePeriodStatus::Active
                    && p.date == date
                    && p.department_id == department_id
            })
            .collect();

        match (approval_required, matching.as_slice()) {
            (_, [only]) => Ok(Some(only.id.clone())),
            (true, []) => Err(EngineError::constraint(format!(
                "prior approval is required and no active overtime window covers {} for department '{}'",
                date, department_id
            ))),
            (true, many) => Err(EngineError::constraint(format!(
                "{} overtime windows cover {} for department '{}'; exactly one is required",
                many.len(),
                date,
                department_id
            ))),
            // Without the approval requirement, linking is best-effort:
            // no window, or an ambiguous set of windows, stores the
            // record unlinked.
            (false, _) => Ok(None),
        }
    }

    fn week_total(&self, employee_id: &str, date: NaiveDate) -> Decimal {
        let week = date.iso_week();
        self.records
            .iter()
            .filter(|r| r.employee_id == employee_id && r.overtime_date.iso_week() == week)
            .map(|r| r.hours)
            .sum()
    }

    fn month_total(&self, employee_id: &str, date: NaiveDate) -> Decimal {
        self.records
            .iter()
            .filter(|r| {
                r.employee_id == employee_id
                    && r.overtime_date.year() == date.year()
                    && r.overtime_date.month() == date.month()
            })
            .map(|r| r.hours)
            .sum()
    }
}
