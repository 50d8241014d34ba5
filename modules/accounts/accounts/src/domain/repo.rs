use accounts_sdk::User;
use async_trait::async_trait;
use modkit::db::DbConnTrait;
use uuid::Uuid;

use crate::domain::error::DomainError;

/// A stored user plus its password hash. Never leaves the crate.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn find_by_id<C: DbConnTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<UserRecord>, DomainError>;

    async fn find_by_username<C: DbConnTrait>(
        &self,
        conn: &C,
        username: &str,
    ) -> Result<Option<UserRecord>, DomainError>;

    async fn find_by_email<C: DbConnTrait>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<Option<UserRecord>, DomainError>;

    /// Whether a user other than `except` owns `email`.
    async fn email_taken_by_other<C: DbConnTrait>(
        &self,
        conn: &C,
        email: &str,
        except: Uuid,
    ) -> Result<bool, DomainError>;

    /// Fails with `UsernameTaken` or `EmailTaken` on a unique violation.
    async fn insert<C: DbConnTrait>(&self, conn: &C, record: &UserRecord)
    -> Result<(), DomainError>;

    /// Writes the mutable profile columns and the active flag.
    async fn update<C: DbConnTrait>(&self, conn: &C, user: &User) -> Result<(), DomainError>;
}
