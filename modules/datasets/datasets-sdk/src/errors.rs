use thiserror::Error;

/// Errors returned by [`crate::DatasetsApi`].
///
/// Each variant carries the message shown to clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatasetsError {
    /// Missing field or unknown upstream dependency.
    #[error("{message}")]
    Validation { message: String },

    /// Dataset id already taken.
    #[error("{message}")]
    Conflict { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Internal { message: String },
}

impl DatasetsError {
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
