use api_core::problem::{from_parts, ProblemResponse, ValidationError};
use axum::http::StatusCode;

use crate::domain::error::DomainError;

/// Map domain error to RFC 9457 ProblemResponse.
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::SelfReport => from_parts(
            StatusCode::BAD_REQUEST,
            "MODERATION_SELF_REPORT",
            "Invalid report",
            "You cannot report yourself",
            instance,
        ),
        DomainError::DuplicateReport => from_parts(
            StatusCode::BAD_REQUEST,
            "MODERATION_DUPLICATE_REPORT",
            "Duplicate report",
            "You have already reported this content",
            instance,
        ),
        DomainError::Validation { field, message } => {
            let resp = from_parts(
                StatusCode::BAD_REQUEST,
                "MODERATION_VALIDATION",
                "Validation error",
                format!("{e}"),
                instance,
            );
            ProblemResponse(resp.0.with_errors(vec![ValidationError {
                detail: message.clone(),
                pointer: format!("/{field}"),
            }]))
        }
        DomainError::Database { .. } => {
            tracing::error!(error = ?e, "Database error in moderation");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "Internal error",
                "An internal error occurred",
                instance,
            )
        }
    }
}
