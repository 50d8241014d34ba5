use accounts_sdk::User;
use async_trait::async_trait;
use modkit::db::DbConnTrait;
use sea_orm::{ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, SqlErr};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repo::{UserRecord, UsersRepository};

use super::entity::{ActiveModel, Column, Entity as UserEntity};
use super::mapper::profile_update;

/// SeaORM-backed user storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrmUsersRepository;

impl OrmUsersRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

// The constraint text names the violated column on every supported backend.
fn unique_violation(e: &DbErr) -> Option<DomainError> {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) if detail.contains("email") => {
            Some(DomainError::EmailTaken)
        }
        Some(SqlErr::UniqueConstraintViolation(_)) => Some(DomainError::UsernameTaken),
        _ => None,
    }
}

#[async_trait]
impl UsersRepository for OrmUsersRepository {
    async fn find_by_id<C: DbConnTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<UserRecord>, DomainError> {
        Ok(UserEntity::find_by_id(id).one(conn).await?.map(Into::into))
    }

    async fn find_by_username<C: DbConnTrait>(
        &self,
        conn: &C,
        username: &str,
    ) -> Result<Option<UserRecord>, DomainError> {
        let found = UserEntity::find()
            .filter(Column::Username.eq(username))
            .one(conn)
            .await?;
        Ok(found.map(Into::into))
    }

    async fn find_by_email<C: DbConnTrait>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<Option<UserRecord>, DomainError> {
        let found = UserEntity::find()
            .filter(Column::Email.eq(email))
            .one(conn)
            .await?;
        Ok(found.map(Into::into))
    }

    async fn email_taken_by_other<C: DbConnTrait>(
        &self,
        conn: &C,
        email: &str,
        except: Uuid,
    ) -> Result<bool, DomainError> {
        let count = UserEntity::find()
            .filter(Column::Email.eq(email))
            .filter(Column::Id.ne(except))
            .count(conn)
            .await?;
        Ok(count > 0)
    }

    async fn insert<C: DbConnTrait>(
        &self,
        conn: &C,
        record: &UserRecord,
    ) -> Result<(), DomainError> {
        UserEntity::insert(ActiveModel::from(record))
            .exec_without_returning(conn)
            .await
            .map_err(|e| unique_violation(&e).unwrap_or_else(|| e.into()))?;
        Ok(())
    }

    async fn update<C: DbConnTrait>(&self, conn: &C, user: &User) -> Result<(), DomainError> {
        UserEntity::update_many()
            .set(profile_update(user))
            .filter(Column::Id.eq(user.id))
            .exec(conn)
            .await
            .map_err(|e| match unique_violation(&e) {
                Some(_) => DomainError::EmailInUse,
                None => e.into(),
            })?;
        Ok(())
    }
}
