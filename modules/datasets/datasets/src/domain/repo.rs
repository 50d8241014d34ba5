use std::collections::HashSet;

use async_trait::async_trait;
use datasets_sdk::{Dataset, DatasetFilter};
use modkit::db::DbConnTrait;

use crate::domain::error::DomainError;

/// Persistence for datasets. Every method runs on the connection or
/// transaction it is given, so the service decides the unit of work.
#[async_trait]
pub trait DatasetsRepository: Send + Sync {
    async fn get<C: DbConnTrait>(
        &self,
        conn: &C,
        dataset_id: &str,
    ) -> Result<Option<Dataset>, DomainError>;

    async fn exists<C: DbConnTrait>(&self, conn: &C, dataset_id: &str)
    -> Result<bool, DomainError>;

    /// The subset of `ids` that name stored datasets.
    async fn existing_ids<C: DbConnTrait>(
        &self,
        conn: &C,
        ids: &[String],
    ) -> Result<HashSet<String>, DomainError>;

    /// One page (1-based) of matching datasets, oldest first, plus the total
    /// number of matches.
    async fn list_page<C: DbConnTrait>(
        &self,
        conn: &C,
        filter: &DatasetFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Dataset>, u64), DomainError>;

    /// Fails with `AlreadyExists` when the id is taken.
    async fn insert<C: DbConnTrait>(&self, conn: &C, dataset: &Dataset)
    -> Result<(), DomainError>;

    async fn update<C: DbConnTrait>(&self, conn: &C, dataset: &Dataset)
    -> Result<(), DomainError>;

    /// Returns `false` when nothing was deleted.
    async fn delete<C: DbConnTrait>(&self, conn: &C, dataset_id: &str)
    -> Result<bool, DomainError>;

    async fn delete_all<C: DbConnTrait>(&self, conn: &C) -> Result<u64, DomainError>;
}
