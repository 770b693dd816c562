use axum::http::StatusCode;
use api_core::problem::{from_parts, ProblemResponse, ValidationError};

use crate::domain::error::DomainError;

/// Map domain error to RFC 9457 ProblemResponse.
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::UserNotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "ACCOUNTS_NOT_FOUND",
            "User not found",
            format!("User with id {} was not found", id),
            instance,
        ),
        DomainError::EmailAlreadyExists => from_parts(
            StatusCode::BAD_REQUEST,
            "ACCOUNTS_EMAIL_TAKEN",
            "User already exists",
            "A user with this email already exists",
            instance,
        ),
        DomainError::PhoneAlreadyExists => from_parts(
            StatusCode::BAD_REQUEST,
            "ACCOUNTS_PHONE_TAKEN",
            "User already exists",
            "A user with this phone number already exists",
            instance,
        ),
        DomainError::InvalidCredentials => from_parts(
            StatusCode::UNAUTHORIZED,
            "ACCOUNTS_INVALID_CREDENTIALS",
            "Unauthorized",
            "Invalid credentials",
            instance,
        ),
        DomainError::Validation { field, message } => {
            let resp = from_parts(
                StatusCode::BAD_REQUEST,
                "ACCOUNTS_VALIDATION",
                "Validation error",
                format!("{e}"),
                instance,
            );
            ProblemResponse(resp.0.with_errors(vec![ValidationError {
                detail: message.clone(),
                pointer: format!("/{field}"),
            }]))
        }
        DomainError::Database { .. } | DomainError::Internal { .. } => {
            // Log the internal error details but don't expose them to the client.
            tracing::error!(error = ?e, "Internal error in accounts");
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

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn conflict_maps_to_400_per_interface_contract() {
        let resp = map_domain_error(&DomainError::EmailAlreadyExists, "/api/auth/register");
        assert_eq!(resp.0.status, 400);
    }

    #[test]
    fn validation_carries_field_pointer() {
        let err = DomainError::validation("birthYear", "out of range");
        let resp = map_domain_error(&err, "/api/auth/register");
        assert_eq!(resp.0.status, 400);
        let errors = resp.0.errors.unwrap();
        assert_eq!(errors[0].pointer, "/birthYear");
    }

    #[test]
    fn internal_errors_are_opaque() {
        let err = DomainError::database("connection refused to 10.0.0.1");
        let resp = map_domain_error(&err, "/api/auth/login");
        assert_eq!(resp.0.status, 500);
        assert!(!resp.0.detail.contains("10.0.0.1"));
    }

    #[test]
    fn not_found_maps_to_404() {
        let resp = map_domain_error(
            &DomainError::user_not_found(Uuid::nil()),
            "/api/auth/me",
        );
        assert_eq!(resp.0.status, 404);
    }
}
