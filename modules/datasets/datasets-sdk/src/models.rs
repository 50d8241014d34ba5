//! Public models for the datasets module.
//!
//! Transport-agnostic; the REST layer owns the JSON shapes.

use time::OffsetDateTime;

/// Status given to a dataset created without one.
pub const DEFAULT_STATUS: &str = "active";

/// A registered dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    /// Caller-supplied identifier (UUID, path-like string, ...).
    pub dataset_id: String,
    /// Free-form; often a storage path or a catalog-qualified table name.
    pub dataset_name: String,
    pub dataset_type: String,
    /// Pipeline stage tag such as `bronze`, `silver` or `gold`.
    pub layer: String,
    /// Ids of the datasets this one is derived from, in declared order.
    pub upstream_dependencies: Vec<String>,
    pub status: String,
    pub created_ts: OffsetDateTime,
    pub updated_ts: OffsetDateTime,
}

/// Data for registering a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewDataset {
    pub dataset_id: String,
    pub dataset_name: String,
    pub dataset_type: String,
    pub layer: String,
    pub upstream_dependencies: Vec<String>,
    /// `None` means [`DEFAULT_STATUS`].
    pub status: Option<String>,
}

/// Partial update. `None` leaves a field unchanged; `Some` replaces it
/// wholesale. `upstream_dependencies: Some(vec![])` clears the list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DatasetPatch {
    pub dataset_name: Option<String>,
    pub dataset_type: Option<String>,
    pub layer: Option<String>,
    pub upstream_dependencies: Option<Vec<String>>,
    pub status: Option<String>,
}

impl DatasetPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dataset_name.is_none()
            && self.dataset_type.is_none()
            && self.layer.is_none()
            && self.upstream_dependencies.is_none()
            && self.status.is_none()
    }
}

/// Equality filters combined with AND. `None` imposes no constraint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DatasetFilter {
    pub status: Option<String>,
    pub dataset_type: Option<String>,
    pub layer: Option<String>,
}

/// Requested page. Missing or zero values fall back to the module defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// One page of datasets plus paging metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPage {
    pub items: Vec<Dataset>,
    /// Number of datasets matching the filter across all pages.
    pub total: u64,
    /// Effective page number.
    pub page: u64,
    /// Effective page size.
    pub per_page: u64,
    pub pages: u64,
}
