//! `DatasetsApi` trait definition.

use async_trait::async_trait;

use crate::errors::DatasetsError;
use crate::models::{Dataset, DatasetFilter, DatasetPage, DatasetPatch, NewDataset, PageRequest};

/// Public API of the Dataset Registry, registered in the `ClientHub` as
/// `Arc<dyn DatasetsApi>`.
///
/// Every write checks that each upstream dependency names a dataset that
/// exists at the time of the write. Nothing else about the dependency graph
/// is enforced: cycles are allowed and deletes do not cascade.
#[async_trait]
pub trait DatasetsApi: Send + Sync {
    /// Datasets matching every provided filter, oldest first, one page at a time.
    async fn list_datasets(
        &self,
        filter: DatasetFilter,
        page: PageRequest,
    ) -> Result<DatasetPage, DatasetsError>;

    async fn get_dataset(&self, dataset_id: &str) -> Result<Dataset, DatasetsError>;

    /// Register a dataset. All missing dependency ids are reported at once.
    async fn create_dataset(&self, new_dataset: NewDataset) -> Result<Dataset, DatasetsError>;

    /// Apply a partial update. The dataset's own id never counts as a missing
    /// dependency here.
    async fn update_dataset(
        &self,
        dataset_id: &str,
        patch: DatasetPatch,
    ) -> Result<Dataset, DatasetsError>;

    /// Remove a dataset. Datasets that reference it keep the dangling id.
    async fn delete_dataset(&self, dataset_id: &str) -> Result<(), DatasetsError>;

    /// Remove every dataset; returns how many were deleted.
    async fn clear_datasets(&self) -> Result<u64, DatasetsError>;
}
