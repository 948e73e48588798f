use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use wms_core::DomainError;
use wms_infra::{AdjustmentError, StoreError};

pub fn adjustment_error_to_response(err: AdjustmentError) -> axum::response::Response {
    match err {
        AdjustmentError::InvalidInput(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        e @ AdjustmentError::InsufficientQuantity { .. } => {
            json_error(StatusCode::CONFLICT, "insufficient_quantity", e.to_string())
        }
        AdjustmentError::Storage(msg) => storage_failure(msg),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        StoreError::Storage(msg) => storage_failure(msg),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}

pub fn not_found(what: &str) -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", format!("{what} not found"))
}

fn storage_failure(msg: String) -> axum::response::Response {
    tracing::warn!(error = %msg, "request failed in storage");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "storage_error",
        "internal storage error",
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
