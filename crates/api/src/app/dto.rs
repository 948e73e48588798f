use std::str::FromStr;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};

use wms_core::DomainError;

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

/// `GET /inventory?sku_id=..&hub_id=..`
///
/// Raw strings so that a missing or malformed id maps to our own 400 body.
#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    pub sku_id: Option<String>,
    pub hub_id: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// -------------------------
// Extraction helpers
// -------------------------

/// Unwrap a JSON body, turning axum's rejection into our error shape.
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, axum::response::Response> {
    payload
        .map(|Json(v)| v)
        .map_err(|rej| {
            errors::json_error(
                axum::http::StatusCode::BAD_REQUEST,
                "invalid_body",
                rej.body_text(),
            )
        })
}

/// Parse a required identifier from a path or query value.
pub fn parse_id<T>(raw: Option<&str>, name: &str) -> Result<T, axum::response::Response>
where
    T: FromStr<Err = DomainError>,
{
    let raw = raw
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            errors::domain_error_to_response(DomainError::invalid_id(format!("{name} is required")))
        })?;
    raw.parse::<T>().map_err(errors::domain_error_to_response)
}
