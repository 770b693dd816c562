use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("You cannot report yourself")]
    SelfReport,

    #[error("You have already reported this content")]
    DuplicateReport,

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
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
