use datasets_sdk::DatasetsError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("Dataset ID already exists")]
    AlreadyExists { dataset_id: String },

    #[error("Upstream dependencies not found: {}", .missing.join(", "))]
    UnknownDependencies { missing: Vec<String> },

    #[error("Dataset not found")]
    NotFound { dataset_id: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    pub fn already_exists(dataset_id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            dataset_id: dataset_id.into(),
        }
    }

    pub fn not_found(dataset_id: impl Into<String>) -> Self {
        Self::NotFound {
            dataset_id: dataset_id.into(),
        }
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

impl From<DomainError> for DatasetsError {
    fn from(e: DomainError) -> Self {
        let message = e.to_string();
        match e {
            DomainError::MissingField { .. } | DomainError::UnknownDependencies { .. } => {
                DatasetsError::validation(message)
            }
            DomainError::AlreadyExists { .. } => DatasetsError::conflict(message),
            DomainError::NotFound { .. } => DatasetsError::not_found(message),
            DomainError::Database { .. } => DatasetsError::internal(message),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn unknown_dependencies_lists_every_id() {
        let e = DomainError::UnknownDependencies {
            missing: vec!["Z".to_owned(), "Y".to_owned()],
        };
        assert_eq!(e.to_string(), "Upstream dependencies not found: Z, Y");
    }

    #[test]
    fn maps_to_sdk_kinds() {
        assert!(matches!(
            DatasetsError::from(DomainError::missing_field("layer")),
            DatasetsError::Validation { message } if message == "layer is required"
        ));
        assert!(matches!(
            DatasetsError::from(DomainError::already_exists("a")),
            DatasetsError::Conflict { .. }
        ));
        assert!(matches!(
            DatasetsError::from(DomainError::not_found("a")),
            DatasetsError::NotFound { .. }
        ));
        assert!(matches!(
            DatasetsError::from(DomainError::database("boom")),
            DatasetsError::Internal { .. }
        ));
    }
}
