//! Recovery period, declaration and per-employee assignment models.
//!
//! A recovery *period* groups declared debt or credit days; a
//! *declaration* is one dated entry inside a period; an
//! [`EmployeeRecovery`] is the per-employee materialization of a
//! declaration, resolved once the date has passed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Who a recovery period or declaration applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecoveryScope {
    /// Applies to every employee.
    All,
    /// Applies to one department.
    Department {
        /// The department identifier.
        department_id: String,
    },
    /// Applies to one segment.
    Segment {
        /// The segment identifier.
        segment_id: String,
    },
    /// Applies to one centre.
    Centre {
        /// The centre identifier.
        centre_id: String,
    },
}

/// Lifecycle of a recovery period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryPeriodStatus {
    /// Declarations may still be added and resolved.
    Active,
    /// All hours recovered.
    Completed,
    /// Abandoned; totals frozen.
    Cancelled,
}

/// Lifecycle of a single recovery declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationStatus {
    /// The date has not been resolved yet.
    Scheduled,
    /// Resolved with the employee present for the owed hours.
    Completed,
    /// Withdrawn before resolution.
    Cancelled,
}

/// A window of declared recovery debt or credit.
///
/// `hours_recovered` and `hours_remaining` are derived quantities,
/// recomputed atomically with every declaration-status change and never
/// written directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryPeriod {
    /// Unique identifier of the period.
    pub id: String,
    /// Display name (e.g. "Bridge day 2026-05").
    pub name: String,
    /// First date of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last date of the period (inclusive).
    pub end_date: NaiveDate,
    /// Total hours the scoped employees owe across the period.
    pub total_hours_to_recover: Decimal,
    /// Sum of completed, non-day-off declaration hours. Derived.
    pub hours_recovered: Decimal,
    /// `total_hours_to_recover - hours_recovered`. Derived, never negative.
    pub hours_remaining: Decimal,
    /// Who the period applies to.
    pub scope: RecoveryScope,
    /// Lifecycle status.
    pub status: RecoveryPeriodStatus,
}

/// One dated debt or credit entry inside a recovery period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryDeclaration {
    /// Unique identifier of the declaration.
    pub id: String,
    /// The period this declaration belongs to.
    pub recovery_period_id: String,
    /// The date the debt is worked (or the credit taken).
    pub recovery_date: NaiveDate,
    /// Hours owed on this date (ignored for day-off credits).
    pub hours_to_recover: Decimal,
    /// True = the employee is credited a day off; false = the employee
    /// owes work.
    pub is_day_off: bool,
    /// Who the declaration applies to.
    pub scope: RecoveryScope,
    /// Lifecycle status.
    pub status: DeclarationStatus,
}

/// Per-employee materialization of a recovery declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecovery {
    /// Unique identifier of the row.
    pub id: String,
    /// The employee concerned.
    pub employee_id: String,
    /// The driving declaration. Unique per (employee, declaration).
    pub recovery_declaration_id: String,
    /// Copied from the declaration for direct date lookup.
    pub recovery_date: NaiveDate,
    /// Copied from the declaration.
    pub is_day_off: bool,
    /// Always `!is_day_off`.
    pub expected_to_work: bool,
    /// Unresolved until the date has passed and the ledger has run.
    pub was_present: Option<bool>,
    /// Hours actually recovered on the date.
    pub hours_recovered: Decimal,
    /// Whether a payroll deduction was applied for a missed debt day.
    pub deduction_applied: bool,
    /// The deduction amount, valued by external payroll configuration.
    pub deduction_amount: Decimal,
}

impl EmployeeRecovery {
    /// Creates an unresolved assignment from a declaration.
    pub fn assign(id: String, employee_id: String, declaration: &RecoveryDeclaration) -> Self {
        EmployeeRecovery {
            id,
            employee_id,
            recovery_declaration_id: declaration.id.clone(),
            recovery_date: declaration.recovery_date,
            is_day_off: declaration.is_day_off,
            expected_to_work: !declaration.is_day_off,
            was_present: None,
            hours_recovered: Decimal::ZERO,
            deduction_applied: false,
            deduction_amount: Decimal::ZERO,
        }
    }
}
