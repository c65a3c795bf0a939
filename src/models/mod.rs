//! Core data models for the attendance engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod holiday;
mod overtime;
mod recovery;
mod schedule;

pub use attendance::{AttendanceDailyRecord, ClockEvents, DayStatus, DayTag};
pub use holiday::PublicHoliday;
pub use overtime::{OvertimeConfig, OvertimePeriod, OvertimePeriodStatus, OvertimeRecord, RateTier, TierBuckets};
pub use recovery::{
    DeclarationStatus, EmployeeRecovery, RecoveryDeclaration, RecoveryPeriod, RecoveryPeriodStatus,
    RecoveryScope,
};
pub use schedule::{BreakPolicy, EmployeeScheduleAssignment, WorkSchedule};
