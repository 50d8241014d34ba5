use std::sync::Arc;

use async_trait::async_trait;
use datasets_sdk::{
    Dataset, DatasetFilter, DatasetPage, DatasetPatch, DatasetsApi, DatasetsError, NewDataset,
    PageRequest,
};

use crate::domain::repo::DatasetsRepository;
use crate::domain::service::DatasetsService;

/// In-process [`DatasetsApi`] backed by the domain service.
pub struct DatasetsLocalClient<R: DatasetsRepository> {
    service: Arc<DatasetsService<R>>,
}

impl<R: DatasetsRepository> DatasetsLocalClient<R> {
    #[must_use]
    pub fn new(service: Arc<DatasetsService<R>>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<R: DatasetsRepository + 'static> DatasetsApi for DatasetsLocalClient<R> {
    async fn list_datasets(
        &self,
        filter: DatasetFilter,
        page: PageRequest,
    ) -> Result<DatasetPage, DatasetsError> {
        self.service
            .list_datasets(filter, page)
            .await
            .map_err(Into::into)
    }

    async fn get_dataset(&self, dataset_id: &str) -> Result<Dataset, DatasetsError> {
        self.service.get_dataset(dataset_id).await.map_err(Into::into)
    }

    async fn create_dataset(&self, new_dataset: NewDataset) -> Result<Dataset, DatasetsError> {
        self.service
            .create_dataset(new_dataset)
            .await
            .map_err(Into::into)
    }

    async fn update_dataset(
        &self,
        dataset_id: &str,
        patch: DatasetPatch,
    ) -> Result<Dataset, DatasetsError> {
        self.service
            .update_dataset(dataset_id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_dataset(&self, dataset_id: &str) -> Result<(), DatasetsError> {
        self.service
            .delete_dataset(dataset_id)
            .await
            .map_err(Into::into)
    }

    async fn clear_datasets(&self) -> Result<u64, DatasetsError> {
        self.service.clear_datasets().await.map_err(Into::into)
    }
}
