//! Input validation helpers shared by the API extractor and the services.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::{Validate, ValidationErrors};

use crate::errors::{AppError, AppResult};

/// Phone numbers: optional leading `+`, digits only.
pub static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{1,14}$").expect("phone regex is valid"));

/// Run derive-based validation and convert failures into a `Validation`
/// error of the form `field: reason[, field: reason]`.
pub fn validate_input<T: Validate>(input: &T) -> AppResult<()> {
    input
        .validate()
        .map_err(|e| AppError::validation(format_validation_errors(&e)))
}

/// Length rules count whitespace; names also have to carry some text.
pub fn ensure_not_blank(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::invalid_field(field, "must not be blank"));
    }
    Ok(())
}

/// Format validation errors into a stable, user-facing string.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let reason = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{}: {}", field, reason)
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}
