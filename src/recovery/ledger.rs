//! The recovery ledger and its reconciliation rules.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    DeclarationStatus, EmployeeRecovery, RecoveryDeclaration, RecoveryPeriod,
    RecoveryPeriodStatus, RecoveryScope,
};

/// The per-employee outcome of resolving a declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionOutcome {
    /// The employee the outcome belongs to.
    pub employee_id: String,
    /// Whether the employee worked the owed hours.
    pub was_present: bool,
    /// Hours credited against the debt.
    pub hours_recovered: Decimal,
    /// Whether a payroll deduction was applied.
    pub deduction_applied: bool,
}

/// Tracks recovery periods, their declarations and per-employee
/// assignments.
///
/// All mutating operations validate first and write second, so a failed
/// call leaves the ledger untouched. Period totals are recomputed inside
/// every declaration-status write, never as a separate step.
#[derive(Debug, Clone, Default)]
pub struct RecoveryLedger {
    periods: HashMap<String, RecoveryPeriod>,
    declarations: HashMap<String, RecoveryDeclaration>,
    assignments: Vec<EmployeeRecovery>,
}

impl RecoveryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an active recovery period with zeroed derived totals.
    pub fn create_period(
        &mut self,
        id: String,
        name: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        total_hours_to_recover: Decimal,
        scope: RecoveryScope,
    ) -> EngineResult<&RecoveryPeriod> {
        if end_date < start_date {
            return Err(EngineError::validation(
                "end_date",
                format!("period ends {} before it starts {}", end_date, start_date),
            ));
        }
        if total_hours_to_recover < Decimal::ZERO {
            return Err(EngineError::validation(
                "total_hours_to_recover",
                "must not be negative",
            ));
        }
        if self.periods.contains_key(&id) {
            return Err(EngineError::constraint(format!(
                "recovery period '{}' already exists",
                id
            )));
        }

        let period = RecoveryPeriod {
            id: id.clone(),
            name,
            start_date,
            end_date,
            total_hours_to_recover,
            hours_recovered: Decimal::ZERO,
            hours_remaining: total_hours_to_recover,
            scope,
            status: RecoveryPeriodStatus::Active,
        };
        self.periods.insert(id.clone(), period);
        Ok(&self.periods[&id])
    }

    /// Adds a scheduled declaration to an active period.
    pub fn create_declaration(
        &mut self,
        id: String,
        recovery_period_id: String,
        recovery_date: NaiveDate,
        hours_to_recover: Decimal,
        is_day_off: bool,
        scope: RecoveryScope,
    ) -> EngineResult<&RecoveryDeclaration> {
        let period = self
            .periods
            .get(&recovery_period_id)
            .ok_or_else(|| EngineError::NotFound {
                entity: "recovery_period".to_string(),
                id: recovery_period_id.clone(),
            })?;
        if period.status != RecoveryPeriodStatus::Active {
            return Err(EngineError::validation(
                "recovery_period_id",
                format!("period '{}' is not active", recovery_period_id),
            ));
        }
        if recovery_date < period.start_date || recovery_date > period.end_date {
            return Err(EngineError::validation(
                "recovery_date",
                format!(
                    "{} is outside period [{}, {}]",
                    recovery_date, period.start_date, period.end_date
                ),
            ));
        }
        if !is_day_off && hours_to_recover <= Decimal::ZERO {
            return Err(EngineError::validation(
                "hours_to_recover",
                "a debt declaration must owe a positive number of hours",
            ));
        }
        if self.declarations.contains_key(&id) {
            return Err(EngineError::constraint(format!(
                "recovery declaration '{}' already exists",
                id
            )));
        }

        let declaration = RecoveryDeclaration {
            id: id.clone(),
            recovery_period_id,
            recovery_date,
            hours_to_recover,
            is_day_off,
            scope,
            status: DeclarationStatus::Scheduled,
        };
        self.declarations.insert(id.clone(), declaration);
        Ok(&self.declarations[&id])
    }

    /// Assigns an employee to a declaration.
    ///
    /// At most one assignment may exist per (employee, declaration).
    pub fn assign_employee(
        &mut self,
        id: String,
        employee_id: String,
        declaration_id: &str,
    ) -> EngineResult<&EmployeeRecovery> {
        let declaration =
            self.declarations
                .get(declaration_id)
                .ok_or_else(|| EngineError::NotFound {
                    entity: "recovery_declaration".to_string(),
                    id: declaration_id.to_string(),
                })?;
        if self
            .assignments
            .iter()
            .any(|a| a.employee_id == employee_id && a.recovery_declaration_id == declaration_id)
        {
            return Err(EngineError::constraint(format!(
                "employee '{}' is already assigned to declaration '{}'",
                employee_id, declaration_id
            )));
        }

        let assignment = EmployeeRecovery::assign(id, employee_id, declaration);
        self.assignments.push(assignment);
        Ok(self.assignments.last().expect("just pushed"))
    }

    /// The employee's assignment on a given date, if any.
    pub fn assignment_on(&self, employee_id: &str, date: NaiveDate) -> Option<&EmployeeRecovery> {
        self.assignments
            .iter()
            .find(|a| a.employee_id == employee_id && a.recovery_date == date)
    }

    /// All assignments belonging to a declaration.
    pub fn assignments_for(&self, declaration_id: &str) -> Vec<&EmployeeRecovery> {
        self.assignments
            .iter()
            .filter(|a| a.recovery_declaration_id == declaration_id)
            .collect()
    }

    /// Returns a period by id.
    pub fn period(&self, period_id: &str) -> Option<&RecoveryPeriod> {
        self.periods.get(period_id)
    }

    /// Returns a declaration by id.
    pub fn declaration(&self, declaration_id: &str) -> Option<&RecoveryDeclaration> {
        self.declarations.get(declaration_id)
    }

    /// Resolves a debt declaration once its date has passed.
    ///
    /// `worked_hours` maps each assigned employee to the hours the
    /// classifier reports for the recovery date. An employee who worked
    /// at least the owed hours completes their debt; anyone else gets
    /// the deduction path with `deduction_amount` (valued by external
    /// payroll-penalty configuration). The declaration completes when at
    /// least one expected-to-work assignee repaid the debt, and the
    /// owning period's totals are recomputed in the same write.
    pub fn resolve_declaration(
        &mut self,
        declaration_id: &str,
        as_of: NaiveDate,
        worked_hours: &HashMap<String, Decimal>,
        deduction_amount: Decimal,
    ) -> EngineResult<Vec<ResolutionOutcome>> {
        let declaration =
            self.declarations
                .get(declaration_id)
                .ok_or_else(|| EngineError::NotFound {
                    entity: "recovery_declaration".to_string(),
                    id: declaration_id.to_string(),
                })?;
        if declaration.status != DeclarationStatus::Scheduled {
            return Err(EngineError::validation(
                "declaration_id",
                format!("declaration '{}' is already resolved", declaration_id),
            ));
        }
        if as_of <= declaration.recovery_date {
            return Err(EngineError::validation(
                "as_of",
                format!(
                    "declaration '{}' for {} cannot be resolved before the day has passed",
                    declaration_id, declaration.recovery_date
                ),
            ));
        }

        let owed = declaration.hours_to_recover;
        let is_day_off = declaration.is_day_off;
        let period_id = declaration.recovery_period_id.clone();

        // Stage the per-employee outcomes before touching any state.
        let mut staged: Vec<(usize, EmployeeRecovery)> = Vec::new();
        let mut outcomes = Vec::new();
        for (index, assignment) in self.assignments.iter().enumerate() {
            if assignment.recovery_declaration_id != declaration_id {
                continue;
            }
            let mut updated = assignment.clone();
            if !assignment.expected_to_work {
                // Day-off credits have nothing to reconcile.
                updated.was_present = Some(false);
            } else {
                let actual = worked_hours
                    .get(&assignment.employee_id)
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                if actual >= owed {
                    updated.was_present = Some(true);
                    updated.hours_recovered = actual;
                } else {
                    updated.was_present = Some(false);
                    updated.deduction_applied = true;
                    updated.deduction_amount = deduction_amount;
                }
            }
            outcomes.push(ResolutionOutcome {
                employee_id: updated.employee_id.clone(),
                was_present: updated.was_present.unwrap_or(false),
                hours_recovered: updated.hours_recovered,
                deduction_applied: updated.deduction_applied,
            });
            staged.push((index, updated));
        }

        let repaid = !is_day_off && outcomes.iter().any(|o| o.was_present);
        let new_status = if is_day_off || repaid {
            DeclarationStatus::Completed
        } else {
            DeclarationStatus::Scheduled
        };

        // Validate the totals the write would produce before committing.
        let totals = self.compute_period_totals(&period_id, Some((declaration_id, new_status)))?;

        // Commit: assignments, declaration status and period totals as
        // one all-or-nothing write.
        for (index, updated) in staged {
            self.assignments[index] = updated;
        }
        self.declarations
            .get_mut(declaration_id)
            .expect("declaration checked above")
            .status = new_status;
        self.apply_period_totals(&period_id, totals);

        info!(
            declaration_id,
            status = ?new_status,
            outcomes = outcomes.len(),
            "resolved recovery declaration"
        );
        Ok(outcomes)
    }

    /// Cancels a scheduled declaration and recomputes its period totals
    /// in the same write.
    pub fn cancel_declaration(&mut self, declaration_id: &str) -> EngineResult<()> {
        let declaration =
            self.declarations
                .get(declaration_id)
                .ok_or_else(|| EngineError::NotFound {
                    entity: "recovery_declaration".to_string(),
                    id: declaration_id.to_string(),
                })?;
        let period_id = declaration.recovery_period_id.clone();

        let totals = self.compute_period_totals(
            &period_id,
            Some((declaration_id, DeclarationStatus::Cancelled)),
        )?;

        self.declarations
            .get_mut(declaration_id)
            .expect("declaration checked above")
            .status = DeclarationStatus::Cancelled;
        self.apply_period_totals(&period_id, totals);
        Ok(())
    }

    /// Recomputes a period's derived totals from its declarations.
    ///
    /// Exposed for consistency audits; every status write already runs
    /// this internally.
    pub fn recompute_period_totals(&mut self, period_id: &str) -> EngineResult<()> {
        let totals = self.compute_period_totals(period_id, None)?;
        self.apply_period_totals(period_id, totals);
        Ok(())
    }

    /// Computes (hours_recovered, hours_remaining) for a period,
    /// optionally with one declaration's status overridden to preview a
    /// pending write. A negative remaining is an inconsistency, reported
    /// and never clamped.
    fn compute_period_totals(
        &self,
        period_id: &str,
        override_status: Option<(&str, DeclarationStatus)>,
    ) -> EngineResult<(Decimal, Decimal)> {
        let period = self.periods.get(period_id).ok_or_else(|| EngineError::NotFound {
            entity: "recovery_period".to_string(),
            id: period_id.to_string(),
        })?;

        let recovered: Decimal = self
            .declarations
            .values()
            .filter(|d| d.recovery_period_id == period_id && !d.is_day_off)
            .filter(|d| {
                let status = match override_status {
                    Some((id, status)) if id == d.id => status,
                    _ => d.status,
                };
                status == DeclarationStatus::Completed
            })
            .map(|d| d.hours_to_recover)
            .sum();

        let remaining = period.total_hours_to_recover - recovered;
        if remaining < Decimal::ZERO {
            return Err(EngineError::constraint(format!(
                "period '{}' would recover {} of {} hours; remaining hours may not go negative",
                period_id, recovered, period.total_hours_to_recover
            )));
        }
        Ok((recovered, remaining))
    }

    fn apply_period_totals(&mut self, period_id: &str, totals: (Decimal, Decimal)) {
        let period = self
            .periods
            .get_mut(period_id)
            .expect("validated by compute_period_totals");
        period.hours_recovered = totals.0;
        period.hours_remaining = totals.1;
        if period.hours_remaining == Decimal::ZERO {
            period.status = RecoveryPeriodStatus::Completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ledger_with_period(total: &str) -> RecoveryLedger {
        let mut ledger = RecoveryLedger::new();
        ledger
            .create_period(
                "period_001".to_string(),
                "Bridge days May".to_string(),
                date(2026, 5, 1),
                date(2026, 5, 31),
                dec(total),
                RecoveryScope::All,
            )
            .unwrap();
        ledger
    }

    fn add_debt(ledger: &mut RecoveryLedger, id: &str, day: u32, hours: &str) {
        ledger
            .create_declaration(
                id.to_string(),
                "period_001".to_string(),
                date(2026, 5, day),
                dec(hours),
                false,
                RecoveryScope::All,
            )
            .unwrap();
    }

    fn worked(pairs: &[(&str, &str)]) -> HashMap<String, Decimal> {
        pairs
            .iter()
            .map(|(employee, hours)| (employee.to_string(), dec(hours)))
            .collect()
    }

    #[test]
    fn test_new_period_has_full_remaining() {
        let ledger = ledger_with_period("40");
        let period = ledger.period("period_001").unwrap();
        assert_eq!(period.hours_recovered, Decimal::ZERO);
        assert_eq!(period.hours_remaining, dec("40"));
        assert_eq!(period.status, RecoveryPeriodStatus::Active);
    }

    #[test]
    fn test_inverted_period_range_is_rejected() {
        let mut ledger = RecoveryLedger::new();
        let result = ledger.create_period(
            "period_x".to_string(),
            "Bad".to_string(),
            date(2026, 5, 31),
            date(2026, 5, 1),
            dec("8"),
            RecoveryScope::All,
        );
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }

    #[test]
    fn test_declaration_outside_period_range_is_rejected() {
        let mut ledger = ledger_with_period("40");
        let result = ledger.create_declaration(
            "decl_x".to_string(),
            "period_001".to_string(),
            date(2026, 6, 1),
            dec("8"),
            false,
            RecoveryScope::All,
        );
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }

    #[test]
    fn test_duplicate_assignment_is_rejected() {
        let mut ledger = ledger_with_period("40");
        add_debt(&mut ledger, "decl_001", 9, "8");
        ledger
            .assign_employee("er_001".to_string(), "emp_001".to_string(), "decl_001")
            .unwrap();
        let result =
            ledger.assign_employee("er_002".to_string(), "emp_001".to_string(), "decl_001");
        assert!(matches!(
            result,
            Err(EngineError::ConstraintViolation { .. })
        ));
    }

    // ==========================================================================
    // Scenario D: total 40h, completed debts of 10h and 15h
    // ==========================================================================
    #[test]
    fn test_completed_declarations_drive_period_totals() {
        let mut ledger = ledger_with_period("40");
        add_debt(&mut ledger, "decl_010", 9, "10");
        add_debt(&mut ledger, "decl_015", 16, "15");
        for decl in ["decl_010", "decl_015"] {
            ledger
                .assign_employee(format!("er_{}", decl), "emp_001".to_string(), decl)
                .unwrap();
        }

        ledger
            .resolve_declaration(
                "decl_010",
                date(2026, 5, 10),
                &worked(&[("emp_001", "10")]),
                dec("0"),
            )
            .unwrap();
        ledger
            .resolve_declaration(
                "decl_015",
                date(2026, 5, 17),
                &worked(&[("emp_001", "16")]),
                dec("0"),
            )
            .unwrap();

        let period = ledger.period("period_001").unwrap();
        assert_eq!(period.hours_recovered, dec("25"));
        assert_eq!(period.hours_remaining, dec("15"));
    }

    #[test]
    fn test_absent_employee_gets_deduction() {
        let mut ledger = ledger_with_period("8");
        add_debt(&mut ledger, "decl_001", 9, "8");
        ledger
            .assign_employee("er_001".to_string(), "emp_001".to_string(), "decl_001")
            .unwrap();

        let outcomes = ledger
            .resolve_declaration("decl_001", date(2026, 5, 10), &worked(&[]), dec("120"))
            .unwrap();

        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].was_present);
        assert!(outcomes[0].deduction_applied);
        let assignment = ledger.assignment_on("emp_001", date(2026, 5, 9)).unwrap();
        assert_eq!(assignment.was_present, Some(false));
        assert_eq!(assignment.deduction_amount, dec("120"));
        // Nothing recovered, declaration still scheduled.
        assert_eq!(
            ledger.declaration("decl_001").unwrap().status,
            DeclarationStatus::Scheduled
        );
        assert_eq!(
            ledger.period("period_001").unwrap().hours_recovered,
            Decimal::ZERO
        );
    }

    #[test]
    fn test_partial_hours_do_not_complete_the_debt() {
        let mut ledger = ledger_with_period("8");
        add_debt(&mut ledger, "decl_001", 9, "8");
        ledger
            .assign_employee("er_001".to_string(), "emp_001".to_string(), "decl_001")
            .unwrap();

        let outcomes = ledger
            .resolve_declaration(
                "decl_001",
                date(2026, 5, 10),
                &worked(&[("emp_001", "5")]),
                dec("60"),
            )
            .unwrap();
        assert!(!outcomes[0].was_present);
        assert!(outcomes[0].deduction_applied);
    }

    #[test]
    fn test_resolution_before_the_date_is_rejected() {
        let mut ledger = ledger_with_period("8");
        add_debt(&mut ledger, "decl_001", 9, "8");
        let result = ledger.resolve_declaration(
            "decl_001",
            date(2026, 5, 9),
            &worked(&[]),
            dec("0"),
        );
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }

    #[test]
    fn test_double_resolution_is_rejected() {
        let mut ledger = ledger_with_period("8");
        add_debt(&mut ledger, "decl_001", 9, "8");
        ledger
            .assign_employee("er_001".to_string(), "emp_001".to_string(), "decl_001")
            .unwrap();
        ledger
            .resolve_declaration(
                "decl_001",
                date(2026, 5, 10),
                &worked(&[("emp_001", "8")]),
                dec("0"),
            )
            .unwrap();
        let again = ledger.resolve_declaration(
            "decl_001",
            date(2026, 5, 11),
            &worked(&[("emp_001", "8")]),
            dec("0"),
        );
        assert!(matches!(again, Err(EngineError::Validation { .. })));
    }

    #[test]
    fn test_over_recovery_is_reported_not_clamped() {
        // Period only allows 8 hours but two 8h debts complete.
        let mut ledger = ledger_with_period("8");
        add_debt(&mut ledger, "decl_001", 9, "8");
        add_debt(&mut ledger, "decl_002", 16, "8");
        for decl in ["decl_001", "decl_002"] {
            ledger
                .assign_employee(format!("er_{}", decl), "emp_001".to_string(), decl)
                .unwrap();
        }
        ledger
            .resolve_declaration(
                "decl_001",
                date(2026, 5, 10),
                &worked(&[("emp_001", "8")]),
                dec("0"),
            )
            .unwrap();

        let result = ledger.resolve_declaration(
            "decl_002",
            date(2026, 5, 17),
            &worked(&[("emp_001", "8")]),
            dec("0"),
        );
        assert!(matches!(
            result,
            Err(EngineError::ConstraintViolation { .. })
        ));
        // The failed write left nothing behind.
        assert_eq!(
            ledger.declaration("decl_002").unwrap().status,
            DeclarationStatus::Scheduled
        );
        let period = ledger.period("period_001").unwrap();
        assert_eq!(period.hours_recovered, dec("8"));
        assert_eq!(period.hours_remaining, Decimal::ZERO);
    }

    #[test]
    fn test_fully_recovered_period_completes() {
        let mut ledger = ledger_with_period("8");
        add_debt(&mut ledger, "decl_001", 9, "8");
        ledger
            .assign_employee("er_001".to_string(), "emp_001".to_string(), "decl_001")
            .unwrap();
        ledger
            .resolve_declaration(
                "decl_001",
                date(2026, 5, 10),
                &worked(&[("emp_001", "9")]),
                dec("0"),
            )
            .unwrap();

        let period = ledger.period("period_001").unwrap();
        assert_eq!(period.status, RecoveryPeriodStatus::Completed);
        // Actual hours are kept on the assignment even when they exceed
        // the owed amount; period totals count the owed hours.
        let assignment = ledger.assignment_on("emp_001", date(2026, 5, 9)).unwrap();
        assert_eq!(assignment.hours_recovered, dec("9"));
        assert_eq!(period.hours_recovered, dec("8"));
    }

    #[test]
    fn test_cancel_recomputes_totals_in_same_write() {
        let mut ledger = ledger_with_period("16");
        add_debt(&mut ledger, "decl_001", 9, "8");
        ledger.cancel_declaration("decl_001").unwrap();
        assert_eq!(
            ledger.declaration("decl_001").unwrap().status,
            DeclarationStatus::Cancelled
        );
        let period = ledger.period("period_001").unwrap();
        assert_eq!(period.hours_recovered, Decimal::ZERO);
        assert_eq!(period.hours_remaining, dec("16"));
    }

    #[test]
    fn test_ledger_invariant_after_every_status_change() {
        let mut ledger = ledger_with_period("40");
        add_debt(&mut ledger, "decl_a", 2, "10");
        add_debt(&mut ledger, "decl_b", 3, "15");
        add_debt(&mut ledger, "decl_c", 4, "5");
        for decl in ["decl_a", "decl_b", "decl_c"] {
            ledger
                .assign_employee(format!("er_{}", decl), "emp_001".to_string(), decl)
                .unwrap();
        }

        ledger
            .resolve_declaration(
                "decl_a",
                date(2026, 5, 20),
                &worked(&[("emp_001", "10")]),
                dec("0"),
            )
            .unwrap();
        let check = |ledger: &RecoveryLedger| {
            let p = ledger.period("period_001").unwrap();
            assert_eq!(p.hours_remaining, p.total_hours_to_recover - p.hours_recovered);
        };
        check(&ledger);

        ledger.cancel_declaration("decl_b").unwrap();
        check(&ledger);

        ledger
            .resolve_declaration(
                "decl_c",
                date(2026, 5, 20),
                &worked(&[("emp_001", "6")]),
                dec("0"),
            )
            .unwrap();
        check(&ledger);
    }
}
