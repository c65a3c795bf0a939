//! Overtime rating and recording.
//!
//! The rate computation is a pure function of the worked hours, the
//! injected [`OvertimeConfig`](crate::models::OvertimeConfig) and the
//! day context; the log enforces caps, prior approval and duplicate
//! rejection when a record is written.

mod log;
mod rate;

pub use log::OvertimeLog;
pub use rate::{rate_overtime, span_overlaps_night, DayContext, RatedOvertime};
