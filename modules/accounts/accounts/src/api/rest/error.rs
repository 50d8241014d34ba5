use modkit_errors::ApiError;

use crate::domain::error::DomainError;

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match &e {
            DomainError::MissingField { .. }
            | DomainError::MissingCredentials
            | DomainError::UsernameTaken
            | DomainError::EmailTaken
            | DomainError::EmailInUse => ApiError::bad_request(e.to_string()),
            DomainError::InvalidCredentials => ApiError::unauthorized(e.to_string()),
            DomainError::Inactive { .. } => ApiError::forbidden(e.to_string()),
            DomainError::NotFound { .. } => ApiError::not_found(e.to_string()),
            DomainError::Auth(_) | DomainError::Database { .. } => {
                ApiError::internal(e.to_string())
            }
        }
    }
}
