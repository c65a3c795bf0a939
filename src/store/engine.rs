//! The engine store: entity ownership, upserts and bulk cascades.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classification::{classify, DayFacts, LeaveKind};
use crate::config::EngineDefaults;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceDailyRecord, ClockEvents, DayStatus, DayTag, EmployeeScheduleAssignment,
    OvertimeConfig, OvertimePeriod, OvertimeRecord, PublicHoliday, RecoveryScope, WorkSchedule,
};
use crate::overtime::{rate_overtime, span_overlaps_night, DayContext, OvertimeLog, RatedOvertime};
use crate::payroll::{pay_period, PayPeriod, PayrollCutoffConfig};
use crate::recovery::{RecoveryLedger, ResolutionOutcome};
use crate::registry::{HolidayCalendar, ScheduleRegistry};

/// The result of a holiday add/remove cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeReport {
    /// The holiday date the cascade ran for.
    pub holiday_date: NaiveDate,
    /// Number of attendance rows whose status changed.
    pub rows_changed: usize,
}

type RecordKey = (String, NaiveDate);

#[derive(Debug)]
struct Inner {
    registry: ScheduleRegistry,
    calendar: HolidayCalendar,
    records: BTreeMap<RecordKey, AttendanceDailyRecord>,
    clocks: HashMap<RecordKey, ClockEvents>,
    leaves: HashMap<RecordKey, LeaveKind>,
    ledger: RecoveryLedger,
    overtime: OvertimeLog,
    overtime_config: OvertimeConfig,
    defaults: EngineDefaults,
    cutoffs: HashMap<String, u8>,
    /// The status list the persistence layer validates against,
    /// mirroring a stored CHECK constraint.
    status_constraint: Vec<String>,
}

/// Owns all persisted engine state behind one lock.
///
/// Every mutating operation validates on staged copies first and only
/// then writes, so a failed call leaves the store untouched. The single
/// lock serializes writes to any (employee, date) row.
#[derive(Debug)]
pub struct EngineStore {
    inner: Mutex<Inner>,
}

impl EngineStore {
    /// Creates a store whose stored status constraint is generated from
    /// the in-code enum, the only non-drifting way to build one.
    pub fn new(defaults: EngineDefaults) -> Self {
        let constraint = DayStatus::ALL.iter().map(|s| s.as_str().to_string()).collect();
        Self::with_status_constraint(defaults, constraint)
            .expect("constraint generated from the enum is always consistent")
    }

    /// Creates a store against an externally supplied status constraint
    /// (e.g. read back from an existing database).
    ///
    /// Fails with [`EngineError::ConfigurationInconsistency`] when the
    /// constraint disagrees with [`DayStatus::ALL`]; the engine refuses
    /// to serve until the two are migrated together.
    pub fn with_status_constraint(
        defaults: EngineDefaults,
        status_constraint: Vec<String>,
    ) -> EngineResult<Self> {
        verify_status_constraint(&status_constraint)?;
        let overtime_config = defaults.overtime.clone();
        Ok(Self {
            inner: Mutex::new(Inner {
                registry: ScheduleRegistry::new(),
                calendar: HolidayCalendar::new(),
                records: BTreeMap::new(),
                clocks: HashMap::new(),
                leaves: HashMap::new(),
                ledger: RecoveryLedger::new(),
                overtime: OvertimeLog::new(),
                overtime_config,
                defaults,
                cutoffs: HashMap::new(),
                status_constraint,
            }),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Registers a new work schedule.
    pub fn add_schedule(&self, schedule: WorkSchedule) {
        self.lock().registry.upsert_schedule(schedule);
    }

    /// Replaces a schedule under optimistic versioning.
    ///
    /// `expected_version` must match the stored version or the update is
    /// rejected; the stored version is bumped on success.
    pub fn update_schedule(
        &self,
        mut schedule: WorkSchedule,
        expected_version: u32,
    ) -> EngineResult<()> {
        let mut inner = self.lock();
        let current = inner
            .registry
            .schedule(&schedule.id)
            .ok_or_else(|| EngineError::NotFound {
                entity: "work_schedule".to_string(),
                id: schedule.id.clone(),
            })?;
        if current.version != expected_version {
            return Err(EngineError::constraint(format!(
                "schedule '{}' is at version {}, expected {}",
                schedule.id, current.version, expected_version
            )));
        }
        schedule.version = expected_version + 1;
        inner.registry.upsert_schedule(schedule);
        Ok(())
    }

    /// Assigns an employee to a schedule from a start date.
    pub fn assign_schedule(&self, assignment: EmployeeScheduleAssignment) -> EngineResult<()> {
        self.lock().registry.add_assignment(assignment)
    }

    /// Replaces the active overtime configuration under optimistic
    /// versioning.
    pub fn update_overtime_config(
        &self,
        mut config: OvertimeConfig,
        expected_version: u32,
    ) -> EngineResult<()> {
        let mut inner = self.lock();
        if inner.overtime_config.version != expected_version {
            return Err(EngineError::constraint(format!(
                "overtime configuration is at version {}, expected {}",
                inner.overtime_config.version, expected_version
            )));
        }
        config.version = expected_version + 1;
        inner.overtime_config = config;
        Ok(())
    }

    /// The currently active overtime configuration.
    pub fn overtime_config(&self) -> OvertimeConfig {
        self.lock().overtime_config.clone()
    }

    /// Sets an employee's payroll cutoff day.
    pub fn set_payroll_cutoff(&self, employee_id: String, cutoff_day: u8) -> EngineResult<()> {
        let config = PayrollCutoffConfig::new(employee_id, cutoff_day)?;
        self.lock()
            .cutoffs
            .insert(config.employee_id, config.payroll_cutoff_day);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Facts
    // ------------------------------------------------------------------

    /// Stores validated clock events for an employee-date.
    pub fn set_clock_events(
        &self,
        employee_id: String,
        date: NaiveDate,
        events: ClockEvents,
    ) -> EngineResult<()> {
        if let (Some(clock_in), Some(clock_out)) = (events.clock_in, events.clock_out) {
            if clock_out < clock_in {
                return Err(EngineError::validation(
                    "clocks",
                    format!("clock-out {} precedes clock-in {}", clock_out, clock_in),
                ));
            }
        }
        self.lock().clocks.insert((employee_id, date), events);
        Ok(())
    }

    /// Stores an approved leave flag for an employee-date.
    pub fn set_leave(&self, employee_id: String, date: NaiveDate, kind: LeaveKind) {
        self.lock().leaves.insert((employee_id, date), kind);
    }

    // ------------------------------------------------------------------
    // Classification
    // ------------------------------------------------------------------

    /// Classifies one employee-date and upserts its attendance record.
    ///
    /// Repeatable: with unchanged facts the resulting status is
    /// identical. Human notes on an existing record survive the upsert.
    pub fn classify_day(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> EngineResult<AttendanceDailyRecord> {
        let mut inner = self.lock();
        let record = classify_in(&inner, employee_id, date)?;
        check_status(&inner.status_constraint, record.day_status)?;

        let key = (employee_id.to_string(), date);
        let record = match inner.records.get(&key) {
            Some(existing) => {
                let mut merged = record;
                merged.notes = existing.notes.clone();
                merged
            }
            None => record,
        };
        inner.records.insert(key, record.clone());
        Ok(record)
    }

    /// Reads an attendance record, if the day was ever evaluated.
    pub fn record(&self, employee_id: &str, date: NaiveDate) -> Option<AttendanceDailyRecord> {
        self.lock()
            .records
            .get(&(employee_id.to_string(), date))
            .cloned()
    }

    // ------------------------------------------------------------------
    // Holiday cascade
    // ------------------------------------------------------------------

    /// Adds a public holiday and reclassifies affected attendance rows.
    ///
    /// Every existing record on a date the holiday covers whose status
    /// is `recovery`, `holiday` or `holiday_overtime` is re-evaluated
    /// with the new calendar fact. All rows commit or none do; the
    /// report carries the number of rows whose status changed.
    pub fn add_holiday(&self, holiday: PublicHoliday) -> EngineResult<CascadeReport> {
        let mut inner = self.lock();
        let holiday_date = holiday.holiday_date;

        // Stage the calendar change on a copy.
        let mut staged_calendar = inner.calendar.clone();
        staged_calendar.add(holiday.clone())?;

        let staged = stage_cascade(&inner, &staged_calendar, &holiday)?;
        let rows_changed = commit_cascade(&mut inner, staged);
        inner.calendar = staged_calendar;

        info!(%holiday_date, rows_changed, "holiday added, cascade applied");
        Ok(CascadeReport {
            holiday_date,
            rows_changed,
        })
    }

    /// Removes a public holiday and restores affected rows.
    ///
    /// Reclassification is deterministic, so removing the holiday that
    /// flipped a row restores its prior classification exactly.
    pub fn remove_holiday(&self, holiday_id: &str) -> EngineResult<CascadeReport> {
        let mut inner = self.lock();

        let mut staged_calendar = inner.calendar.clone();
        let removed = staged_calendar.remove(holiday_id)?;

        let staged = stage_cascade(&inner, &staged_calendar, &removed)?;
        let rows_changed = commit_cascade(&mut inner, staged);
        inner.calendar = staged_calendar;

        info!(holiday_date = %removed.holiday_date, rows_changed, "holiday removed, cascade applied");
        Ok(CascadeReport {
            holiday_date: removed.holiday_date,
            rows_changed,
        })
    }

    // ------------------------------------------------------------------
    // Recovery
    // ------------------------------------------------------------------

    /// Creates a recovery period.
    #[allow(clippy::too_many_arguments)]
    pub fn create_recovery_period(
        &self,
        id: String,
        name: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        total_hours: Decimal,
        scope: RecoveryScope,
    ) -> EngineResult<()> {
        self.lock()
            .ledger
            .create_period(id, name, start_date, end_date, total_hours, scope)
            .map(|_| ())
    }

    /// Creates a scheduled recovery declaration.
    #[allow(clippy::too_many_arguments)]
    pub fn create_recovery_declaration(
        &self,
        id: String,
        period_id: String,
        recovery_date: NaiveDate,
        hours_to_recover: Decimal,
        is_day_off: bool,
        scope: RecoveryScope,
    ) -> EngineResult<()> {
        self.lock()
            .ledger
            .create_declaration(id, period_id, recovery_date, hours_to_recover, is_day_off, scope)
            .map(|_| ())
    }

    /// Assigns an employee to a recovery declaration.
    pub fn assign_recovery(
        &self,
        id: String,
        employee_id: String,
        declaration_id: &str,
    ) -> EngineResult<()> {
        self.lock()
            .ledger
            .assign_employee(id, employee_id, declaration_id)
            .map(|_| ())
    }

    /// Resolves a recovery declaration against recorded attendance.
    ///
    /// The worked hours come from the attendance records of the
    /// assigned employees on the declaration date; days never evaluated
    /// count as zero hours. `deduction_amount` is valued by the external
    /// payroll-penalty configuration.
    pub fn resolve_recovery_declaration(
        &self,
        declaration_id: &str,
        as_of: NaiveDate,
        deduction_amount: Decimal,
    ) -> EngineResult<Vec<ResolutionOutcome>> {
        let mut inner = self.lock();

        let assignments = inner.ledger.assignments_for(declaration_id);
        let mut worked: HashMap<String, Decimal> = HashMap::new();
        for assignment in assignments {
            let key = (assignment.employee_id.clone(), assignment.recovery_date);
            let hours = inner
                .records
                .get(&key)
                .map(|r| r.hours_worked)
                .unwrap_or(Decimal::ZERO);
            worked.insert(assignment.employee_id.clone(), hours);
        }

        inner
            .ledger
            .resolve_declaration(declaration_id, as_of, &worked, deduction_amount)
    }

    /// Remaining hours of a recovery period, for HR surfaces.
    pub fn recovery_hours_remaining(&self, period_id: &str) -> EngineResult<Decimal> {
        self.lock()
            .ledger
            .period(period_id)
            .map(|p| p.hours_remaining)
            .ok_or_else(|| EngineError::NotFound {
                entity: "recovery_period".to_string(),
                id: period_id.to_string(),
            })
    }

    // ------------------------------------------------------------------
    // Overtime
    // ------------------------------------------------------------------

    /// Declares a manager overtime window.
    pub fn declare_overtime_period(&self, period: OvertimePeriod) -> EngineResult<()> {
        self.lock().overtime.declare_period(period)
    }

    /// Records overtime for an employee-date under the active
    /// configuration, deriving the day context from stored facts.
    pub fn record_overtime(
        &self,
        id: String,
        employee_id: String,
        date: NaiveDate,
        hours: Decimal,
        department_id: &str,
    ) -> EngineResult<OvertimeRecord> {
        let mut inner = self.lock();
        let context = day_context(&inner, &employee_id, date)?;
        let config = inner.overtime_config.clone();
        inner
            .overtime
            .record(id, employee_id, date, hours, department_id, &config, context)
            .map(|r| r.clone())
    }

    /// Rates hours under the active configuration without persisting,
    /// for payroll previews.
    pub fn rate_hours(&self, hours: Decimal, context: DayContext) -> EngineResult<RatedOvertime> {
        let inner = self.lock();
        rate_overtime(hours, &inner.overtime_config, context)
    }

    /// Overtime records for an employee within a pay period.
    pub fn overtime_in_period(&self, employee_id: &str, period: PayPeriod) -> Vec<OvertimeRecord> {
        self.lock()
            .overtime
            .records_in(employee_id, period.start_date, period.end_date)
            .into_iter()
            .cloned()
            .collect()
    }

    // ------------------------------------------------------------------
    // Payroll
    // ------------------------------------------------------------------

    /// The pay period ending in the target month for an employee.
    pub fn pay_period_for(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> EngineResult<PayPeriod> {
        let cutoff = *self
            .lock()
            .cutoffs
            .get(employee_id)
            .ok_or_else(|| EngineError::NotFound {
                entity: "payroll_cutoff".to_string(),
                id: employee_id.to_string(),
            })?;
        pay_period(cutoff, year, month)
    }
}

/// Validates the stored status constraint against the in-code enum.
fn verify_status_constraint(constraint: &[String]) -> EngineResult<()> {
    let expected: Vec<&str> = DayStatus::ALL.iter().map(|s| s.as_str()).collect();
    let stored: Vec<&str> = constraint.iter().map(|s| s.as_str()).collect();
    if stored != expected {
        return Err(EngineError::ConfigurationInconsistency {
            message: format!(
                "stored day-status constraint {:?} does not match the code's status set {:?}",
                stored, expected
            ),
        });
    }
    Ok(())
}

/// Validates a status against the stored constraint before a write.
fn check_status(constraint: &[String], status: DayStatus) -> EngineResult<()> {
    if !constraint.iter().any(|s| s == status.as_str()) {
        return Err(EngineError::ConfigurationInconsistency {
            message: format!(
                "status '{}' is not covered by the stored constraint",
                status.as_str()
            ),
        });
    }
    Ok(())
}

/// Classifies one employee-date from the facts the store holds.
fn classify_in(
    inner: &Inner,
    employee_id: &str,
    date: NaiveDate,
) -> EngineResult<AttendanceDailyRecord> {
    classify_with_calendar(inner, &inner.calendar, employee_id, date)
}

fn classify_with_calendar(
    inner: &Inner,
    calendar: &HolidayCalendar,
    employee_id: &str,
    date: NaiveDate,
) -> EngineResult<AttendanceDailyRecord> {
    let schedule = inner.registry.schedule_for(employee_id, date)?;
    let key = (employee_id.to_string(), date);
    let facts = DayFacts {
        employee_id,
        date,
        schedule,
        defaults: &inner.defaults,
        holiday: calendar.holiday_on(date),
        leave: inner.leaves.get(&key).copied(),
        recovery: inner.ledger.assignment_on(employee_id, date),
        clocks: inner.clocks.get(&key).copied().unwrap_or_default(),
    };
    let classification = classify(&facts)?;
    Ok(classification.into_record(employee_id, date))
}

/// Statuses a calendar-fact change may flip.
fn cascade_eligible(status: DayStatus) -> bool {
    matches!(
        status,
        DayStatus::Recovery | DayStatus::Holiday | DayStatus::HolidayOvertime
    )
}

/// Stages the re-evaluation of every record a holiday change touches.
///
/// Returns the staged rows; any classification failure aborts the whole
/// cascade with the failing row named, nothing applied.
fn stage_cascade(
    inner: &Inner,
    staged_calendar: &HolidayCalendar,
    holiday: &PublicHoliday,
) -> EngineResult<Vec<(RecordKey, AttendanceDailyRecord)>> {
    let mut staged = Vec::new();
    for (key, existing) in &inner.records {
        if !holiday.applies_on(key.1) || !cascade_eligible(existing.day_status) {
            continue;
        }
        let mut reclassified =
            classify_with_calendar(inner, staged_calendar, &key.0, key.1).map_err(|e| {
                EngineError::CascadeFailure {
                    date: holiday.holiday_date,
                    message: format!("row ({}, {}): {}", key.0, key.1, e),
                }
            })?;
        check_status(&inner.status_constraint, reclassified.day_status).map_err(|e| {
            EngineError::CascadeFailure {
                date: holiday.holiday_date,
                message: format!("row ({}, {}): {}", key.0, key.1, e),
            }
        })?;

        reclassified.notes = existing.notes.clone();
        // Record the flip's provenance on the tag.
        for tag in &mut reclassified.tags {
            if let DayTag::HolidayApplied { previous_status, .. } = tag {
                *previous_status = existing.day_status;
            }
        }
        staged.push((key.clone(), reclassified));
    }
    Ok(staged)
}

/// Commits staged cascade rows, returning how many changed status.
fn commit_cascade(inner: &mut Inner, staged: Vec<(RecordKey, AttendanceDailyRecord)>) -> usize {
    let mut rows_changed = 0;
    for (key, record) in staged {
        let changed = inner
            .records
            .get(&key)
            .map(|existing| existing.day_status != record.day_status)
            .unwrap_or(true);
        if changed {
            rows_changed += 1;
        }
        inner.records.insert(key, record);
    }
    rows_changed
}

/// Derives the rating context for an employee-date from stored facts.
fn day_context(inner: &Inner, employee_id: &str, date: NaiveDate) -> EngineResult<DayContext> {
    let schedule = inner.registry.schedule_for(employee_id, date)?;
    let weekday_number = chrono::Datelike::weekday(&date).number_from_monday() as u8;
    let is_weekend = !schedule.is_working_weekday(weekday_number);
    let is_holiday = inner.calendar.holiday_on(date).is_some();

    let key = (employee_id.to_string(), date);
    let is_night = match inner.clocks.get(&key) {
        Some(ClockEvents {
            clock_in: Some(clock_in),
            clock_out: Some(clock_out),
        }) => span_overlaps_night(clock_in.time(), clock_out.time(), &inner.overtime_config),
        _ => false,
    };

    Ok(DayContext {
        is_night,
        is_weekend,
        is_holiday,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefaultsLoader;
    use crate::models::BreakPolicy;
    use chrono::NaiveTime;
    use std::str::FromStr;

    const DEFAULTS_YAML: &str = r#"
tolerance_late_minutes: 10
tolerance_early_leave_minutes: 10
min_hours_for_half_day: "4"
overtime:
  daily_threshold_hours: "12"
  weekly_threshold_hours: "40"
  monthly_max_hours: "60"
  rate_25_multiplier: "1.25"
  rate_50_multiplier: "1.5"
  rate_100_multiplier: "2.0"
  rate_25_threshold_hours: "8"
  rate_50_threshold_hours: "16"
  night_start: "21:00:00"
  night_end: "06:00:00"
  apply_100_for_night: true
  apply_100_for_weekend: true
  apply_100_for_holiday: true
  requires_prior_approval: false
  version: 1
"#;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn defaults() -> EngineDefaults {
        DefaultsLoader::from_yaml(DEFAULTS_YAML, "test")
            .unwrap()
            .defaults()
            .clone()
    }

    fn schedule() -> WorkSchedule {
        WorkSchedule {
            id: "std".to_string(),
            working_days: [1, 2, 3, 4, 5].into_iter().collect(),
            day_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            day_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            tolerance_late_minutes: Some(10),
            tolerance_early_leave_minutes: Some(10),
            min_hours_for_half_day: Some(dec("4")),
            break_policy: BreakPolicy {
                default_break_minutes: 60,
                break_start_after_hours: dec("6"),
                deduct_break_automatically: true,
                allow_multiple_breaks: false,
                max_breaks_per_day: 1,
            },
            is_active: true,
            version: 1,
        }
    }

    fn store_with_employee() -> EngineStore {
        let store = EngineStore::new(defaults());
        store.add_schedule(schedule());
        store
            .assign_schedule(EmployeeScheduleAssignment {
                employee_id: "emp_001".to_string(),
                schedule_id: "std".to_string(),
                start_date: date(2025, 1, 1),
                is_primary: true,
            })
            .unwrap();
        store
    }

    fn holiday(on: NaiveDate) -> PublicHoliday {
        PublicHoliday {
            id: "h_001".to_string(),
            holiday_date: on,
            name: "Labour Day".to_string(),
            is_recurring: false,
        }
    }

    #[test]
    fn test_divergent_constraint_is_fatal() {
        let mut constraint: Vec<String> = DayStatus::ALL
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        constraint.pop(); // the classic "added a status, forgot the constraint"
        let result = EngineStore::with_status_constraint(defaults(), constraint);
        assert!(matches!(
            result,
            Err(EngineError::ConfigurationInconsistency { .. })
        ));
    }

    #[test]
    fn test_generated_constraint_always_passes() {
        let store = EngineStore::new(defaults());
        // Any classification write validates against the constraint.
        store.add_schedule(schedule());
        store
            .assign_schedule(EmployeeScheduleAssignment {
                employee_id: "emp_001".to_string(),
                schedule_id: "std".to_string(),
                start_date: date(2025, 1, 1),
                is_primary: true,
            })
            .unwrap();
        let record = store.classify_day("emp_001", date(2026, 1, 15)).unwrap();
        assert_eq!(record.day_status, DayStatus::Absent);
    }

    #[test]
    fn test_classify_day_is_idempotent_through_the_store() {
        let store = store_with_employee();
        let workday = date(2026, 1, 15);
        store
            .set_clock_events(
                "emp_001".to_string(),
                workday,
                ClockEvents {
                    clock_in: Some(workday.and_hms_opt(9, 20, 0).unwrap()),
                    clock_out: Some(workday.and_hms_opt(17, 0, 0).unwrap()),
                },
            )
            .unwrap();
        let first = store.classify_day("emp_001", workday).unwrap();
        let second = store.classify_day("emp_001", workday).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.day_status, DayStatus::Late);
    }

    #[test]
    fn test_cascade_round_trip_restores_prior_statuses() {
        let store = store_with_employee();
        let workday = date(2026, 5, 1); // Friday

        // Put the employee in recovery debt on the date.
        store
            .create_recovery_period(
                "period_001".to_string(),
                "May recovery".to_string(),
                date(2026, 5, 1),
                date(2026, 5, 31),
                dec("8"),
                RecoveryScope::All,
            )
            .unwrap();
        store
            .create_recovery_declaration(
                "decl_001".to_string(),
                "period_001".to_string(),
                workday,
                dec("8"),
                false,
                RecoveryScope::All,
            )
            .unwrap();
        store
            .assign_recovery("er_001".to_string(), "emp_001".to_string(), "decl_001")
            .unwrap();

        let before = store.classify_day("emp_001", workday).unwrap();
        assert_eq!(before.day_status, DayStatus::Recovery);

        let added = store.add_holiday(holiday(workday)).unwrap();
        assert_eq!(added.rows_changed, 1);
        let flipped = store.record("emp_001", workday).unwrap();
        assert_eq!(flipped.day_status, DayStatus::Holiday);
        assert!(flipped.tags.iter().any(|t| matches!(
            t,
            DayTag::HolidayApplied {
                previous_status: DayStatus::Recovery,
                ..
            }
        )));

        let removed = store.remove_holiday("h_001").unwrap();
        assert_eq!(removed.rows_changed, 1);
        let restored = store.record("emp_001", workday).unwrap();
        assert_eq!(restored.day_status, before.day_status);
        assert_eq!(restored.hours_worked, before.hours_worked);
    }

    #[test]
    fn test_cascade_reports_zero_when_nothing_eligible() {
        let store = store_with_employee();
        let workday = date(2026, 1, 15);
        let evaluated = store.classify_day("emp_001", workday).unwrap();
        assert_eq!(evaluated.day_status, DayStatus::Absent);

        // Absent rows are not cascade-eligible.
        let report = store.add_holiday(holiday(workday)).unwrap();
        assert_eq!(report.rows_changed, 0);
        assert_eq!(
            store.record("emp_001", workday).unwrap().day_status,
            DayStatus::Absent
        );
    }

    #[test]
    fn test_duplicate_holiday_rejected_without_side_effects() {
        let store = store_with_employee();
        let workday = date(2026, 5, 1);
        store.add_holiday(holiday(workday)).unwrap();
        let mut second = holiday(workday);
        second.id = "h_002".to_string();
        assert!(matches!(
            store.add_holiday(second),
            Err(EngineError::ConstraintViolation { .. })
        ));
    }

    #[test]
    fn test_schedule_update_requires_matching_version() {
        let store = store_with_employee();
        let mut edited = schedule();
        edited.tolerance_late_minutes = Some(15);

        let stale = store.update_schedule(edited.clone(), 7);
        assert!(matches!(stale, Err(EngineError::ConstraintViolation { .. })));

        store.update_schedule(edited, 1).unwrap();
        let bumped = store.update_schedule(schedule(), 1);
        assert!(matches!(bumped, Err(EngineError::ConstraintViolation { .. })));
    }

    #[test]
    fn test_overtime_config_versioning() {
        let store = store_with_employee();
        let mut config = store.overtime_config();
        config.requires_prior_approval = true;
        store.update_overtime_config(config.clone(), 1).unwrap();
        assert_eq!(store.overtime_config().version, 2);
        assert!(matches!(
            store.update_overtime_config(config, 1),
            Err(EngineError::ConstraintViolation { .. })
        ));
    }

    #[test]
    fn test_resolve_recovery_pulls_hours_from_attendance() {
        let store = store_with_employee();
        let workday = date(2026, 5, 1);
        store
            .create_recovery_period(
                "period_001".to_string(),
                "May recovery".to_string(),
                date(2026, 5, 1),
                date(2026, 5, 31),
                dec("8"),
                RecoveryScope::All,
            )
            .unwrap();
        store
            .create_recovery_declaration(
                "decl_001".to_string(),
                "period_001".to_string(),
                workday,
                dec("7"),
                false,
                RecoveryScope::All,
            )
            .unwrap();
        store
            .assign_recovery("er_001".to_string(), "emp_001".to_string(), "decl_001")
            .unwrap();

        // Full 9:00-17:00 day = 7h after the break.
        store
            .set_clock_events(
                "emp_001".to_string(),
                workday,
                ClockEvents {
                    clock_in: Some(workday.and_hms_opt(9, 0, 0).unwrap()),
                    clock_out: Some(workday.and_hms_opt(17, 0, 0).unwrap()),
                },
            )
            .unwrap();
        store.classify_day("emp_001", workday).unwrap();

        let outcomes = store
            .resolve_recovery_declaration("decl_001", date(2026, 5, 2), dec("100"))
            .unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].was_present);
        assert_eq!(
            store.recovery_hours_remaining("period_001").unwrap(),
            dec("1")
        );
    }

    #[test]
    fn test_record_overtime_derives_holiday_context() {
        let store = store_with_employee();
        let workday = date(2026, 5, 1);
        store.add_holiday(holiday(workday)).unwrap();

        let record = store
            .record_overtime(
                "ot_001".to_string(),
                "emp_001".to_string(),
                workday,
                dec("5"),
                "dept_01",
            )
            .unwrap();
        // Holiday override: everything at the top tier.
        assert_eq!(record.buckets.rate_100_hours, dec("5"));
        assert_eq!(record.buckets.rate_25_hours, Decimal::ZERO);
    }

    #[test]
    fn test_record_overtime_derives_night_context_for_overnight_shift() {
        let store = store_with_employee();
        let workday = date(2026, 5, 4); // Monday
        store
            .set_clock_events(
                "emp_001".to_string(),
                workday,
                ClockEvents {
                    clock_in: Some(workday.and_hms_opt(22, 0, 0).unwrap()),
                    clock_out: Some(date(2026, 5, 5).and_hms_opt(2, 0, 0).unwrap()),
                },
            )
            .unwrap();

        let record = store
            .record_overtime(
                "ot_001".to_string(),
                "emp_001".to_string(),
                workday,
                dec("4"),
                "dept_01",
            )
            .unwrap();
        // 22:00-02:00 sits inside the 21:00-06:00 night window.
        assert_eq!(record.buckets.rate_100_hours, dec("4"));
        assert_eq!(record.buckets.rate_25_hours, Decimal::ZERO);
        assert_eq!(record.buckets.rate_50_hours, Decimal::ZERO);
    }

    #[test]
    fn test_pay_period_for_uses_employee_cutoff() {
        let store = store_with_employee();
        store.set_payroll_cutoff("emp_001".to_string(), 18).unwrap();
        let period = store.pay_period_for("emp_001", 2026, 2).unwrap();
        assert_eq!(period.start_date, date(2026, 1, 19));
        assert_eq!(period.end_date, date(2026, 2, 18));

        assert!(matches!(
            store.pay_period_for("emp_404", 2026, 2),
            Err(EngineError::NotFound { .. })
        ));
    }

    #[test]
    fn test_overtime_in_period_windows_records() {
        let store = store_with_employee();
        store.set_payroll_cutoff("emp_001".to_string(), 18).unwrap();
        for (id, day) in [("ot_1", date(2026, 1, 20)), ("ot_2", date(2026, 2, 25))] {
            store
                .record_overtime(
                    id.to_string(),
                    "emp_001".to_string(),
                    day,
                    dec("2"),
                    "dept_01",
                )
                .unwrap();
        }
        let period = store.pay_period_for("emp_001", 2026, 2).unwrap();
        let windowed = store.overtime_in_period("emp_001", period);
        assert_eq!(windowed.len(), 1);
        assert_eq!(windowed[0].overtime_date, date(2026, 1, 20));
    }
}
