use modkit_errors::ApiError;

use crate::domain::error::DomainError;

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match &e {
            DomainError::MissingField { .. }
            | DomainError::UnknownDependencies { .. }
            | DomainError::AlreadyExists { .. } => ApiError::bad_request(e.to_string()),
            DomainError::NotFound { .. } => ApiError::not_found(e.to_string()),
            DomainError::Database { .. } => ApiError::internal(e.to_string()),
        }
    }
}
