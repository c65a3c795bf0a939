//! HTTP API module for the attendance engine.
//!
//! This module provides the REST endpoints through which collaborators
//! submit facts and read classifications, ledger state and pay periods.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{ClassifyRequest, HolidayRequest, OvertimeRecordRequest, ResolveRecoveryRequest};
pub use response::ApiError;
pub use state::AppState;
