use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Profile not found: {id}")]
    ProfileNotFound { id: Uuid },

    #[error("Profile already exists")]
    ProfileAlreadyExists,

    #[error("Nickname '{nickname}' already taken")]
    NicknameTaken { nickname: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn profile_not_found(id: Uuid) -> Self {
        Self::ProfileNotFound { id }
    }

    pub fn nickname_taken(nickname: impl Into<String>) -> Self {
        Self::NicknameTaken {
            nickname: nickname.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
