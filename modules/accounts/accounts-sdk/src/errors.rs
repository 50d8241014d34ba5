use thiserror::Error;

/// Errors returned by [`crate::AccountsApi`]; each carries the client-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountsError {
    /// Empty required field.
    #[error("{message}")]
    Validation { message: String },

    /// Username or email already taken.
    #[error("{message}")]
    Conflict { message: String },

    /// Unknown login or wrong password.
    #[error("{message}")]
    Unauthorized { message: String },

    /// Account exists but is deactivated.
    #[error("{message}")]
    Forbidden { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Internal { message: String },
}

impl AccountsError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
