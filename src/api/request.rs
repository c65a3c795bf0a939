//! Request types for the attendance engine API.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::classification::LeaveKind;
use crate::models::ClockEvents;

/// Body of `POST /classify`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyRequest {
    /// The employee to classify.
    pub employee_id: String,
    /// The date to classify.
    pub date: NaiveDate,
    /// Validated clock-in timestamp, if any.
    #[serde(default)]
    pub clock_in: Option<NaiveDateTime>,
    /// Validated clock-out timestamp, if any.
    #[serde(default)]
    pub clock_out: Option<NaiveDateTime>,
    /// Approved leave flag from the leave workflow, if any.
    #[serde(default)]
    pub leave: Option<LeaveKind>,
}

impl ClassifyRequest {
    /// The clock events submitted with the request.
    pub fn clock_events(&self) -> ClockEvents {
        ClockEvents {
            clock_in: self.clock_in,
            clock_out: self.clock_out,
        }
    }
}

/// Body of `POST /holidays`.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayRequest {
    /// Identifier for the new holiday.
    pub id: String,
    /// The holiday date.
    pub holiday_date: NaiveDate,
    /// Display name.
    pub name: String,
    /// Whether the holiday recurs yearly.
    #[serde(default)]
    pub is_recurring: bool,
}

/// Body of `POST /recovery/declarations/{id}/resolve`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveRecoveryRequest {
    /// The date the resolution runs on; must be after the recovery date.
    pub as_of: NaiveDate,
    /// Deduction amount from the external payroll-penalty configuration.
    pub deduction_amount: Decimal,
}

/// Body of `POST /overtime/records`.
#[derive(Debug, Clone, Deserialize)]
pub struct OvertimeRecordRequest {
    /// Identifier for the new record.
    pub id: String,
    /// The employee the overtime belongs to.
    pub employee_id: String,
    /// The date the overtime was worked.
    pub overtime_date: NaiveDate,
    /// Submitted overtime hours.
    pub hours: Decimal,
    /// The employee's department, used to resolve declared windows.
    pub department_id: String,
}

/// Query of `GET /payroll/period`.
#[derive(Debug, Clone, Deserialize)]
pub struct PayPeriodQuery {
    /// The employee whose cutoff applies.
    pub employee_id: String,
    /// Target year.
    pub year: i32,
    /// Target month (1-12).
    pub month: u32,
}
