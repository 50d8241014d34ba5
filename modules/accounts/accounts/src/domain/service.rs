use std::sync::Arc;

use accounts_sdk::{AuthSession, NewUser, ProfilePatch, User};
use modkit::db::transaction_mapped;
use modkit_auth::{PasswordHasher, TokenIssuer};
use sea_orm::DatabaseConnection;
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repo::{UserRecord, UsersRepository};

/// User Store business logic.
pub struct AccountsService<R: UsersRepository> {
    db: DatabaseConnection,
    repo: Arc<R>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: Arc<dyn TokenIssuer>,
}

impl<R: UsersRepository + 'static> AccountsService<R> {
    pub fn new(
        db: DatabaseConnection,
        repo: Arc<R>,
        hasher: Arc<dyn PasswordHasher>,
        issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            db,
            repo,
            hasher,
            issuer,
        }
    }

    /// Creates an active user and signs them in.
    #[instrument(skip_all, fields(username = %new_user.username))]
    pub async fn register(&self, new_user: NewUser) -> Result<AuthSession, DomainError> {
        for (field, value) in [
            ("username", &new_user.username),
            ("email", &new_user.email),
            ("password", &new_user.password),
            ("first_name", &new_user.first_name),
            ("last_name", &new_user.last_name),
        ] {
            if value.is_empty() {
                return Err(DomainError::missing_field(field));
            }
        }

        // Hashing runs before the transaction opens.
        let password_hash = self.hasher.hash(&new_user.password).await?;
        let now = now_micros();
        let record = UserRecord {
            user: User {
                id: Uuid::now_v7(),
                username: new_user.username,
                email: new_user.email,
                first_name: new_user.first_name,
                last_name: new_user.last_name,
                is_active: true,
                created_at: now,
                updated_at: now,
            },
            password_hash,
        };

        let repo = self.repo.clone();
        let user = transaction_mapped(&self.db, move |txn| {
            Box::pin(async move {
                if repo
                    .find_by_username(txn, &record.user.username)
                    .await?
                    .is_some()
                {
                    return Err(DomainError::UsernameTaken);
                }
                if repo.find_by_email(txn, &record.user.email).await?.is_some() {
                    return Err(DomainError::EmailTaken);
                }
                repo.insert(txn, &record).await?;
                Ok(record.user)
            })
        })
        .await?;

        info!(user_id = %user.id, username = %user.username, "user registered");
        self.session_for(user)
    }

    /// `login` is tried as a username first, then as an email.
    #[instrument(skip_all, fields(login = %login))]
    pub async fn authenticate(
        &self,
        login: &str,
        password: &str,
    ) -> Result<AuthSession, DomainError> {
        if login.is_empty() || password.is_empty() {
            return Err(DomainError::MissingCredentials);
        }

        let found = match self.repo.find_by_username(&self.db, login).await? {
            Some(record) => Some(record),
            None => self.repo.find_by_email(&self.db, login).await?,
        };
        let Some(record) = found else {
            warn!("login rejected: unknown user");
            return Err(DomainError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &record.password_hash).await? {
            warn!(user_id = %record.user.id, "login rejected: wrong password");
            return Err(DomainError::InvalidCredentials);
        }
        if !record.user.is_active {
            warn!(user_id = %record.user.id, "login rejected: account inactive");
            return Err(DomainError::Inactive {
                user_id: record.user.id,
            });
        }

        info!(user_id = %record.user.id, "user logged in");
        self.session_for(record.user)
    }

    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: Uuid) -> Result<User, DomainError> {
        let record = self
            .repo
            .find_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(user_id))?;
        debug!("profile loaded");
        Ok(record.user)
    }

    /// Applies the given fields and bumps `updated_at`.
    #[instrument(skip(self, patch))]
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        patch: ProfilePatch,
    ) -> Result<User, DomainError> {
        let repo = self.repo.clone();
        let user = transaction_mapped(&self.db, move |txn| {
            Box::pin(async move {
                let mut user = repo
                    .find_by_id(txn, user_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found(user_id))?
                    .user;

                if let Some(email) = patch.email {
                    if repo.email_taken_by_other(txn, &email, user_id).await? {
                        return Err(DomainError::EmailInUse);
                    }
                    user.email = email;
                }
                if let Some(first_name) = patch.first_name {
                    user.first_name = first_name;
                }
                if let Some(last_name) = patch.last_name {
                    user.last_name = last_name;
                }
                user.updated_at = now_micros();

                repo.update(txn, &user).await?;
                Ok(user)
            })
        })
        .await?;

        info!(user_id = %user.id, "profile updated");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn set_active(&self, user_id: Uuid, active: bool) -> Result<User, DomainError> {
        let repo = self.repo.clone();
        let user = transaction_mapped(&self.db, move |txn| {
            Box::pin(async move {
                let mut user = repo
                    .find_by_id(txn, user_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found(user_id))?
                    .user;
                user.is_active = active;
                user.updated_at = now_micros();
                repo.update(txn, &user).await?;
                Ok::<_, DomainError>(user)
            })
        })
        .await?;

        info!(user_id = %user.id, active, "account active flag changed");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .repo
            .find_by_username(&self.db, username)
            .await?
            .map(|r| r.user))
    }

    fn session_for(&self, user: User) -> Result<AuthSession, DomainError> {
        let token = self.issuer.issue(user.id)?;
        Ok(AuthSession {
            user,
            access_token: token.access_token,
            expires_at: token.expires_at,
        })
    }
}

fn now_micros() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_microsecond(now.microsecond()).unwrap_or(now)
}
