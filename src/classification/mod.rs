//! Attendance day classification.
//!
//! The classifier is the core state machine of the engine: it derives
//! exactly one [`DayStatus`](crate::models::DayStatus) per employee and
//! date from schedule facts, calendar facts, recovery assignments and
//! clock events. It is a pure function of its inputs, so re-running it
//! with unchanged facts always yields the same status.

mod breaks;
mod classifier;

pub use breaks::deduct_breaks;
pub use classifier::{classify, DayClassification, DayFacts, LeaveKind};
