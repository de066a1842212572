//! Error handling
//!
//! The error types themselves live in `shared::error`; this module adds the
//! conversions from the catalog's own failure sources.

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

use axum::extract::multipart::MultipartError;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::db::repository::RepoError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) | RepoError::Conflict(msg) => AppError::conflict(msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Convert `validator` output into a single validation error.
///
/// The first failing field decides the message; every failing field is
/// listed under the `fields` detail.
pub fn from_validation_errors(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<String> = Vec::new();
    let mut first_message: Option<String> = None;

    collect_field_errors(&errors, "", &mut fields, &mut first_message);
    fields.sort();

    let message = first_message.unwrap_or_else(|| "Validation failed".to_string());
    AppError::with_message(ErrorCode::ValidationFailed, message).with_detail("fields", fields)
}

fn collect_field_errors(
    errors: &ValidationErrors,
    prefix: &str,
    fields: &mut Vec<String>,
    first_message: &mut Option<String>,
) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(errs) => {
                if first_message.is_none() {
                    *first_message = errs
                        .iter()
                        .find_map(|e| e.message.as_ref().map(|m| m.to_string()));
                }
                fields.push(path);
            }
            ValidationErrorsKind::Struct(inner) => {
                collect_field_errors(inner, &path, fields, first_message);
            }
            ValidationErrorsKind::List(items) => {
                for inner in items.values() {
                    collect_field_errors(inner, &path, fields, first_message);
                }
            }
        }
    }
}

/// Multipart decoding failures are the caller's fault
pub fn from_multipart_error(e: MultipartError) -> AppError {
    AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {}", e))
}
