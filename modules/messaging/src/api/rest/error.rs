use api_core::problem::{from_parts, ProblemResponse, ValidationError};
use axum::http::StatusCode;

use crate::domain::error::DomainError;

/// Map domain error to RFC 9457 ProblemResponse.
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::ConversationNotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "MESSAGING_CONVERSATION_NOT_FOUND",
            "Conversation not found",
            format!("Conversation with id {} was not found", id),
            instance,
        ),
        DomainError::NotParticipant => from_parts(
            StatusCode::FORBIDDEN,
            "MESSAGING_FORBIDDEN",
            "Forbidden",
            "You are not a participant in this conversation",
            instance,
        ),
        DomainError::Validation { field, message } => {
            let resp = from_parts(
                StatusCode::BAD_REQUEST,
                "MESSAGING_VALIDATION",
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
            tracing::error!(error = ?e, "Database error in messaging");
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
