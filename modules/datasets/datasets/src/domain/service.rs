use std::collections::HashSet;
use std::sync::Arc;

use datasets_sdk::models::DEFAULT_STATUS;
use datasets_sdk::{Dataset, DatasetFilter, DatasetPage, DatasetPatch, NewDataset, PageRequest};
use modkit::db::transaction_mapped;
use sea_orm::DatabaseConnection;
use time::OffsetDateTime;
use tracing::{debug, info, instrument};

use crate::config::DatasetsConfig;
use crate::domain::error::DomainError;
use crate::domain::repo::DatasetsRepository;

/// Dataset Registry business logic.
///
/// Every operation is one transaction: dependency checks and the write they
/// guard see the same snapshot.
pub struct DatasetsService<R: DatasetsRepository> {
    db: DatabaseConnection,
    repo: Arc<R>,
    config: DatasetsConfig,
}

impl<R: DatasetsRepository + 'static> DatasetsService<R> {
    pub fn new(db: DatabaseConnection, repo: Arc<R>, config: DatasetsConfig) -> Self {
        Self { db, repo, config }
    }

    #[instrument(skip(self, filter), fields(page = ?req.page, per_page = ?req.per_page))]
    pub async fn list_datasets(
        &self,
        filter: DatasetFilter,
        req: PageRequest,
    ) -> Result<DatasetPage, DomainError> {
        let (page, per_page) = self.effective_paging(req);
        let filter = DatasetFilter {
            status: non_empty(filter.status),
            dataset_type: non_empty(filter.dataset_type),
            layer: non_empty(filter.layer),
        };

        let repo = self.repo.clone();
        let (items, total) = transaction_mapped(&self.db, move |txn| {
            Box::pin(async move { repo.list_page(txn, &filter, page, per_page).await })
        })
        .await?;

        debug!(total, returned = items.len(), "listed datasets");
        Ok(DatasetPage {
            items,
            total,
            page,
            per_page,
            pages: total.div_ceil(per_page),
        })
    }

    #[instrument(skip(self))]
    pub async fn get_dataset(&self, dataset_id: &str) -> Result<Dataset, DomainError> {
        self.repo
            .get(&self.db, dataset_id)
            .await?
            .ok_or_else(|| DomainError::not_found(dataset_id))
    }

    /// Checks run in order: required fields, id conflict, then upstream
    /// dependencies. A self-reference is reported missing.
    #[instrument(skip(self, new_dataset), fields(dataset_id = %new_dataset.dataset_id))]
    pub async fn create_dataset(&self, new_dataset: NewDataset) -> Result<Dataset, DomainError> {
        for (field, value) in [
            ("dataset_id", &new_dataset.dataset_id),
            ("dataset_name", &new_dataset.dataset_name),
            ("dataset_type", &new_dataset.dataset_type),
            ("layer", &new_dataset.layer),
        ] {
            if value.is_empty() {
                return Err(DomainError::missing_field(field));
            }
        }

        let now = now_micros();
        let dataset = Dataset {
            dataset_id: new_dataset.dataset_id,
            dataset_name: new_dataset.dataset_name,
            dataset_type: new_dataset.dataset_type,
            layer: new_dataset.layer,
            upstream_dependencies: new_dataset.upstream_dependencies,
            status: new_dataset
                .status
                .unwrap_or_else(|| DEFAULT_STATUS.to_owned()),
            created_ts: now,
            updated_ts: now,
        };

        let repo = self.repo.clone();
        let created = transaction_mapped(&self.db, move |txn| {
            Box::pin(async move {
                if repo.exists(txn, &dataset.dataset_id).await? {
                    return Err(DomainError::already_exists(&dataset.dataset_id));
                }
                ensure_dependencies_exist(&*repo, txn, &dataset.upstream_dependencies, None)
                    .await?;
                repo.insert(txn, &dataset).await?;
                Ok(dataset)
            })
        })
        .await?;

        info!(
            dataset_id = %created.dataset_id,
            layer = %created.layer,
            upstream = created.upstream_dependencies.len(),
            "dataset created"
        );
        Ok(created)
    }

    /// Fields present in `patch` replace the stored values wholesale.
    #[instrument(skip(self, patch))]
    pub async fn update_dataset(
        &self,
        dataset_id: &str,
        patch: DatasetPatch,
    ) -> Result<Dataset, DomainError> {
        let repo = self.repo.clone();
        let id = dataset_id.to_owned();
        let updated = transaction_mapped(&self.db, move |txn| {
            Box::pin(async move {
                let mut current = repo
                    .get(txn, &id)
                    .await?
                    .ok_or_else(|| DomainError::not_found(&id))?;

                if let Some(deps) = &patch.upstream_dependencies
                    && !deps.is_empty()
                {
                    ensure_dependencies_exist(&*repo, txn, deps, Some(&id)).await?;
                }

                if let Some(v) = patch.dataset_name {
                    current.dataset_name = v;
                }
                if let Some(v) = patch.dataset_type {
                    current.dataset_type = v;
                }
                if let Some(v) = patch.layer {
                    current.layer = v;
                }
                if let Some(v) = patch.upstream_dependencies {
                    current.upstream_dependencies = v;
                }
                if let Some(v) = patch.status {
                    current.status = v;
                }
                current.updated_ts = now_micros();

                repo.update(txn, &current).await?;
                Ok::<_, DomainError>(current)
            })
        })
        .await?;

        info!(dataset_id = %updated.dataset_id, "dataset updated");
        Ok(updated)
    }

    /// Datasets that list this one upstream are left untouched.
    #[instrument(skip(self))]
    pub async fn delete_dataset(&self, dataset_id: &str) -> Result<(), DomainError> {
        let repo = self.repo.clone();
        let id = dataset_id.to_owned();
        transaction_mapped(&self.db, move |txn| {
            Box::pin(async move {
                if repo.delete(txn, &id).await? {
                    Ok(())
                } else {
                    Err(DomainError::not_found(&id))
                }
            })
        })
        .await?;

        info!(dataset_id, "dataset deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn clear_datasets(&self) -> Result<u64, DomainError> {
        let repo = self.repo.clone();
        let removed = transaction_mapped(&self.db, move |txn| {
            Box::pin(async move { repo.delete_all(txn).await })
        })
        .await?;

        info!(removed, "dataset registry cleared");
        Ok(removed)
    }

    fn effective_paging(&self, req: PageRequest) -> (u64, u64) {
        let page = req.page.filter(|p| *p >= 1).unwrap_or(1);
        let per_page = req
            .per_page
            .filter(|p| *p >= 1)
            .unwrap_or(self.config.default_page_size)
            .min(self.config.max_page_size);
        (page, per_page)
    }
}

/// Fails with every unknown id, in request order and without repeats.
/// `skip` is never reported missing.
async fn ensure_dependencies_exist<R, C>(
    repo: &R,
    conn: &C,
    deps: &[String],
    skip: Option<&str>,
) -> Result<(), DomainError>
where
    R: DatasetsRepository,
    C: modkit::db::DbConnTrait,
{
    let mut seen = HashSet::new();
    let wanted: Vec<String> = deps
        .iter()
        .filter(|d| Some(d.as_str()) != skip)
        .filter(|d| seen.insert(d.as_str()))
        .cloned()
        .collect();
    if wanted.is_empty() {
        return Ok(());
    }

    let found = repo.existing_ids(conn, &wanted).await?;
    let missing: Vec<String> = wanted.into_iter().filter(|d| !found.contains(d)).collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DomainError::UnknownDependencies { missing })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// Stored timestamps keep microsecond precision on every backend, so a
// created record compares equal to what a later read returns.
fn now_micros() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_microsecond(now.microsecond()).unwrap_or(now)
}
