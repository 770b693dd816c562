use api_core::problem::{from_parts, ProblemResponse, ValidationError};
use axum::http::StatusCode;

use crate::domain::error::DomainError;

/// Map domain error to RFC 9457 ProblemResponse.
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::ProfileNotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "PROFILES_NOT_FOUND",
            "Profile not found",
            format!("Profile with id {} was not found", id),
            instance,
        ),
        DomainError::ProfileAlreadyExists => from_parts(
            StatusCode::BAD_REQUEST,
            "PROFILES_ALREADY_EXISTS",
            "Profile already exists",
            "This account already has a profile",
            instance,
        ),
        DomainError::NicknameTaken { nickname } => from_parts(
            StatusCode::BAD_REQUEST,
            "PROFILES_NICKNAME_TAKEN",
            "Nickname already taken",
            format!("Nickname '{nickname}' is already taken"),
            instance,
        ),
        DomainError::Validation { field, message } => {
            let resp = from_parts(
                StatusCode::BAD_REQUEST,
                "PROFILES_VALIDATION",
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
            tracing::error!(error = ?e, "Database error in profiles");
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
