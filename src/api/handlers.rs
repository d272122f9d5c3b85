//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::batch::{BatchFailure, BatchOptions, CancellationFlag};
use crate::store::PayrollStore;

use super::request::{BatchCalculationRequest, SingleCalculationRequest};
use super::response::{ApiError, ApiErrorResponse, BatchCalculationResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router<S: PayrollStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/payroll/calculate", post(calculate_handler::<S>))
        .route("/payroll/calculate/batch", post(calculate_batch_handler::<S>))
        .with_state(state)
}

/// Converts a JSON extraction rejection into the error envelope.
fn rejection_to_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {err}"))
        }
        JsonRejection::MissingJsonContentType(_) => ApiError::new(
            "MISSING_CONTENT_TYPE",
            "Content-Type must be application/json",
        ),
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

/// Handler for POST /payroll/calculate.
///
/// Accepts a single-employee calculation request and returns the
/// calculation result.
async fn calculate_handler<S: PayrollStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<SingleCalculationRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let error = rejection_to_error(correlation_id, rejection);
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let engine_request = match request.into_engine_request() {
        Ok(engine_request) => engine_request,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Invalid request");
            let api_error: ApiErrorResponse = err.into();
            return api_error.into_response();
        }
    };

    match state.engine().calculate_employee(&engine_request).await {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %result.employee_id,
                gross_salary = %result.gross_salary,
                net_salary = %result.net_salary,
                "Calculation completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(result),
            )
                .into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Calculation failed");
            let api_error: ApiErrorResponse = err.into();
            api_error.into_response()
        }
    }
}

/// Handler for POST /payroll/calculate/batch.
///
/// Runs the batch calculation over the requested roster and returns the
/// collected results, per-employee failures, and the summary.
async fn calculate_batch_handler<S: PayrollStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<BatchCalculationRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing batch calculation request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let error = rejection_to_error(correlation_id, rejection);
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let month = match request.month() {
        Ok(month) => month,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Invalid month");
            let api_error: ApiErrorResponse = err.into();
            return api_error.into_response();
        }
    };

    let engine = state.engine();
    let roster = match engine.store().roster(request.unit.as_deref()).await {
        Ok(roster) => roster,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Roster read failed");
            let api_error: ApiErrorResponse = err.into();
            return api_error.into_response();
        }
    };

    // Explicit ids restrict the roster; unknown ids become failures so
    // the caller sees them rather than a silently shorter result list.
    let (roster, mut missing_failures) = match &request.employee_ids {
        Some(ids) => {
            let selected: Vec<_> = roster
                .into_iter()
                .filter(|e| ids.contains(&e.id))
                .collect();
            let missing: Vec<BatchFailure> = ids
                .iter()
                .filter(|id| !selected.iter().any(|e| &e.id == *id))
                .map(|id| BatchFailure {
                    employee_id: id.clone(),
                    employee_name: String::new(),
                    error: format!("Employee not found: {id}"),
                })
                .collect();
            (selected, missing)
        }
        None => (roster, Vec::new()),
    };

    let mut options = BatchOptions::from_config(&engine.config().batch);
    if let Some(batch_size) = request.batch_size {
        options.batch_size = batch_size.max(1);
    }

    let cancellation = CancellationFlag::new();
    let outcome = engine
        .calculate_batch(&roster, month, &options, &cancellation, None)
        .await;

    info!(
        correlation_id = %correlation_id,
        succeeded = outcome.summary.succeeded,
        failed = outcome.summary.failed,
        "Batch calculation completed"
    );

    let mut response = BatchCalculationResponse::from(outcome);
    response.failures.append(&mut missing_failures);
    response.summary.failed = response.failures.len();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(response),
    )
        .into_response()
}
