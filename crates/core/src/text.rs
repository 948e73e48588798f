//! Length limits shared by every free-text field that is persisted.

use crate::error::{DomainError, DomainResult};

/// Reject `value` when it holds more than `max` characters.
///
/// Counts chars, not bytes, to match `VARCHAR(n)` semantics.
pub fn check_len(field: &str, value: &str, max: usize) -> DomainResult<()> {
    if value.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{field} cannot exceed {max} characters"
        )));
    }
    Ok(())
}

/// [`check_len`] for optional fields; `None` always passes.
pub fn check_opt_len(field: &str, value: Option<&str>, max: usize) -> DomainResult<()> {
    value.map_or(Ok(()), |v| check_len(field, v, max))
}
