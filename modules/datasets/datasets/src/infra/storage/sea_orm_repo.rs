use std::collections::HashSet;

use async_trait::async_trait;
use datasets_sdk::{Dataset, DatasetFilter};
use modkit::db::DbConnTrait;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    SqlErr,
};

use crate::domain::error::DomainError;
use crate::domain::repo::DatasetsRepository;

use super::entity::{ActiveModel, Column, Entity as DatasetEntity};

/// SeaORM-backed dataset storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrmDatasetsRepository;

impl OrmDatasetsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn filter_condition(filter: &DatasetFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(status) = &filter.status {
        cond = cond.add(Column::Status.eq(status.as_str()));
    }
    if let Some(dataset_type) = &filter.dataset_type {
        cond = cond.add(Column::DatasetType.eq(dataset_type.as_str()));
    }
    if let Some(layer) = &filter.layer {
        cond = cond.add(Column::Layer.eq(layer.as_str()));
    }
    cond
}

#[async_trait]
impl DatasetsRepository for OrmDatasetsRepository {
    async fn get<C: DbConnTrait>(
        &self,
        conn: &C,
        dataset_id: &str,
    ) -> Result<Option<Dataset>, DomainError> {
        let found = DatasetEntity::find_by_id(dataset_id.to_owned())
            .one(conn)
            .await?;
        Ok(found.map(Into::into))
    }

    async fn exists<C: DbConnTrait>(
        &self,
        conn: &C,
        dataset_id: &str,
    ) -> Result<bool, DomainError> {
        let count = DatasetEntity::find()
            .filter(Column::DatasetId.eq(dataset_id))
            .count(conn)
            .await?;
        Ok(count > 0)
    }

    async fn existing_ids<C: DbConnTrait>(
        &self,
        conn: &C,
        ids: &[String],
    ) -> Result<HashSet<String>, DomainError> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let found: Vec<String> = DatasetEntity::find()
            .select_only()
            .column(Column::DatasetId)
            .filter(Column::DatasetId.is_in(ids.iter().map(String::as_str)))
            .into_tuple()
            .all(conn)
            .await?;
        Ok(found.into_iter().collect())
    }

    async fn list_page<C: DbConnTrait>(
        &self,
        conn: &C,
        filter: &DatasetFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Dataset>, u64), DomainError> {
        let query = DatasetEntity::find().filter(filter_condition(filter));
        let total = query.clone().count(conn).await?;

        let offset = page.saturating_sub(1).saturating_mul(per_page);
        // SQL binds LIMIT/OFFSET as signed 64-bit.
        if i64::try_from(offset).is_err() || i64::try_from(per_page).is_err() {
            return Ok((Vec::new(), total));
        }
        let rows = query
            .order_by_asc(Column::CreatedTs)
            .order_by_asc(Column::DatasetId)
            .offset(offset)
            .limit(per_page)
            .all(conn)
            .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn insert<C: DbConnTrait>(
        &self,
        conn: &C,
        dataset: &Dataset,
    ) -> Result<(), DomainError> {
        let am = ActiveModel::from(dataset);
        match DatasetEntity::insert(am).exec_without_returning(conn).await {
            Ok(_) => Ok(()),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(DomainError::already_exists(&dataset.dataset_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update<C: DbConnTrait>(
        &self,
        conn: &C,
        dataset: &Dataset,
    ) -> Result<(), DomainError> {
        let am = ActiveModel::from(dataset);
        DatasetEntity::update_many()
            .set(am)
            .filter(Column::DatasetId.eq(dataset.dataset_id.as_str()))
            .exec(conn)
            .await?;
        Ok(())
    }

    async fn delete<C: DbConnTrait>(
        &self,
        conn: &C,
        dataset_id: &str,
    ) -> Result<bool, DomainError> {
        let res = DatasetEntity::delete_by_id(dataset_id.to_owned())
            .exec(conn)
            .await?;
        Ok(res.rows_affected > 0)
    }

    async fn delete_all<C: DbConnTrait>(&self, conn: &C) -> Result<u64, DomainError> {
        let res = DatasetEntity::delete_many().exec(conn).await?;
        Ok(res.rows_affected)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use modkit::db::{DatabaseConfig, connect};
    use sea_orm_migration::MigratorTrait;
    use time::OffsetDateTime;

    use super::*;
    use crate::infra::storage::migrations::Migrator;

    fn dataset(id: &str) -> Dataset {
        let now = OffsetDateTime::now_utc().replace_nanosecond(0).unwrap();
        Dataset {
            dataset_id: id.to_owned(),
            dataset_name: format!("/mnt/bronze/{id}"),
            dataset_type: "delta".to_owned(),
            layer: "bronze".to_owned(),
            upstream_dependencies: Vec::new(),
            status: "active".to_owned(),
            created_ts: now,
            updated_ts: now,
        }
    }

    #[tokio::test]
    async fn second_insert_with_the_same_id_already_exists() {
        let db = connect(&DatabaseConfig::in_memory()).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let repo = OrmDatasetsRepository::new();

        repo.insert(&db, &dataset("A")).await.unwrap();
        let err = repo.insert(&db, &dataset("A")).await.unwrap_err();
        assert!(
            matches!(&err, DomainError::AlreadyExists { dataset_id } if dataset_id == "A"),
            "{err:?}"
        );
        assert!(repo.exists(&db, "A").await.unwrap());
    }

    #[tokio::test]
    async fn page_past_the_signed_range_is_empty() {
        let db = connect(&DatabaseConfig::in_memory()).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let repo = OrmDatasetsRepository::new();
        repo.insert(&db, &dataset("A")).await.unwrap();

        let (rows, total) = repo
            .list_page(&db, &DatasetFilter::default(), u64::MAX, 1000)
            .await
            .unwrap();
        assert!(rows.is_empty());
        assert_eq!(total, 1);
    }
}
