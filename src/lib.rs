//! Attendance / Recovery / Overtime computation engine.
//!
//! This crate turns raw presence facts, calendar facts (public holidays,
//! weekends) and declared recovery schedules into a closed set of per-day
//! attendance statuses, then converts those statuses into payroll-relevant
//! quantities: tiered overtime amounts, recovery hours owed and repaid, and
//! pay-period windows.

#![warn(missing_docs)]

pub mod api;
pub mod classification;
pub mod config;
pub mod error;
pub mod models;
pub mod overtime;
pub mod payroll;
pub mod recovery;
pub mod registry;
pub mod store;
