//! HTTP request handlers for the attendance engine API.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::PublicHoliday;

use super::request::{
    ClassifyRequest, HolidayRequest, OvertimeRecordRequest, PayPeriodQuery, ResolveRecoveryRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/classify", post(classify_handler))
        .route("/holidays", post(add_holiday_handler))
        .route("/holidays/:id", delete(remove_holiday_handler))
        .route(
            "/recovery/declarations/:id/resolve",
            post(resolve_recovery_handler),
        )
        .route("/overtime/records", post(record_overtime_handler))
        .route("/payroll/period", get(pay_period_handler))
        .with_state(state)
}

/// Handler for POST /classify.
///
/// Stores the submitted facts and classifies the employee-date.
async fn classify_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "processing classification request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return (StatusCode::BAD_REQUEST, Json(error)).into_response();
        }
    };

    let store = state.store();
    let events = request.clock_events();
    if let Err(err) = store.set_clock_events(request.employee_id.clone(), request.date, events) {
        let response: ApiErrorResponse = err.into();
        return response.into_response();
    }
    if let Some(kind) = request.leave {
        store.set_leave(request.employee_id.clone(), request.date, kind);
    }

    match store.classify_day(&request.employee_id, request.date) {
        Ok(record) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %record.employee_id,
                status = record.day_status.as_str(),
                "classified day"
            );
            (StatusCode::OK, Json(record)).into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "classification failed");
            let response: ApiErrorResponse = err.into();
            response.into_response()
        }
    }
}

/// Handler for POST /holidays: calendar-fact change with cascade.
async fn add_holiday_handler(
    State(state): State<AppState>,
    Json(request): Json<HolidayRequest>,
) -> impl IntoResponse {
    let holiday = PublicHoliday {
        id: request.id,
        holiday_date: request.holiday_date,
        name: request.name,
        is_recurring: request.is_recurring,
    };
    match state.store().add_holiday(holiday) {
        Ok(report) => (StatusCode::CREATED, Json(report)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for DELETE /holidays/{id}: the inverse cascade.
async fn remove_holiday_handler(
    State(state): State<AppState>,
    Path(holiday_id): Path<String>,
) -> impl IntoResponse {
    match state.store().remove_holiday(&holiday_id) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for POST /recovery/declarations/{id}/resolve.
async fn resolve_recovery_handler(
    State(state): State<AppState>,
    Path(declaration_id): Path<String>,
    Json(request): Json<ResolveRecoveryRequest>,
) -> impl IntoResponse {
    match state.store().resolve_recovery_declaration(
        &declaration_id,
        request.as_of,
        request.deduction_amount,
    ) {
        Ok(outcomes) => (StatusCode::OK, Json(outcomes)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for POST /overtime/records.
async fn record_overtime_handler(
    State(state): State<AppState>,
    Json(request): Json<OvertimeRecordRequest>,
) -> impl IntoResponse {
    match state.store().record_overtime(
        request.id,
        request.employee_id,
        request.overtime_date,
        request.hours,
        &request.department_id,
    ) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for GET /payroll/period.
async fn pay_period_handler(
    State(state): State<AppState>,
    Query(query): Query<PayPeriodQuery>,
) -> impl IntoResponse {
    match state
        .store()
        .pay_period_for(&query.employee_id, query.year, query.month)
    {
        Ok(period) => (StatusCode::OK, Json(period)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}
