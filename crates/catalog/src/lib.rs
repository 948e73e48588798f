//! Catalog domain module: hubs (warehouse locations) and SKUs.
//!
//! Plain records with creation-time validation. No IO.

pub mod hub;
pub mod sku;

pub use hub::{Hub, NewHub};
pub use sku::{NewSku, Sku};

use wms_core::{check_len, check_opt_len, DomainError, DomainResult};

/// Trim `value` and reject it when nothing is left or it exceeds `max` chars.
pub(crate) fn required(field: &str, value: String, max: usize) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    check_len(field, trimmed, max)?;
    Ok(trimmed.to_string())
}

pub(crate) fn limited(field: &str, value: String, max: usize) -> DomainResult<String> {
    check_len(field, &value, max)?;
    Ok(value)
}

pub(crate) fn limited_opt(
    field: &str,
    value: Option<String>,
    max: usize,
) -> DomainResult<Option<String>> {
    check_opt_len(field, value.as_deref(), max)?;
    Ok(value)
}
