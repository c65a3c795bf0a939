//! Engine-defaults configuration types.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::OvertimeConfig;

/// Engine-wide defaults, deserialized from `defaults.yaml`.
///
/// A [`WorkSchedule`](crate::models::WorkSchedule) whose tolerance or
/// half-day field is null falls back to the value here. The overtime
/// section is the initially-active [`OvertimeConfig`].
#[derive(Debug, Clone, Deserialize)]
pub struct EngineDefaults {
    /// Fallback for `WorkSchedule::tolerance_late_minutes`.
    pub tolerance_late_minutes: u32,
    /// Fallback for `WorkSchedule::tolerance_early_leave_minutes`.
    pub tolerance_early_leave_minutes: u32,
    /// Fallback for `WorkSchedule::min_hours_for_half_day`.
    pub min_hours_for_half_day: Decimal,
    /// The active overtime configuration at startup.
    pub overtime: OvertimeConfig,
}
