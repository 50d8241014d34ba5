use accounts_sdk::AccountsError;
use modkit_auth::AuthError;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("Username and password are required")]
    MissingCredentials,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Email already exists")]
    EmailTaken,

    #[error("Email already in use")]
    EmailInUse,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User account is inactive")]
    Inactive { user_id: Uuid },

    #[error("User not found")]
    NotFound { user_id: Uuid },

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    #[must_use]
    pub fn not_found(user_id: Uuid) -> Self {
        Self::NotFound { user_id }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        Self::database(e.to_string())
    }
}

impl From<DomainError> for AccountsError {
    fn from(e: DomainError) -> Self {
        let message = e.to_string();
        match e {
            DomainError::MissingField { .. } | DomainError::MissingCredentials => {
                AccountsError::validation(message)
            }
            DomainError::UsernameTaken | DomainError::EmailTaken | DomainError::EmailInUse => {
                AccountsError::conflict(message)
            }
            DomainError::InvalidCredentials => AccountsError::unauthorized(message),
            DomainError::Inactive { .. } => AccountsError::forbidden(message),
            DomainError::NotFound { .. } => AccountsError::not_found(message),
            DomainError::Auth(_) | DomainError::Database { .. } => {
                AccountsError::internal(message)
            }
        }
    }
}
