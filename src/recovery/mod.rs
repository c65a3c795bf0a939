//! Recovery ledger.
//!
//! Tracks debt (hours owed) and credit (days off) schedules and
//! reconciles actual recovery against them. Period totals are derived
//! quantities recomputed atomically with every declaration-status write.

mod ledger;

pub use ledger::{RecoveryLedger, ResolutionOutcome};
