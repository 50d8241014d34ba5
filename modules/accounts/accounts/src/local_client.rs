use std::sync::Arc;

use accounts_sdk::{AccountsApi, AccountsError, AuthSession, NewUser, ProfilePatch, User};
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::repo::UsersRepository;
use crate::domain::service::AccountsService;

/// In-process [`AccountsApi`] backed by the domain service.
pub struct AccountsLocalClient<R: UsersRepository> {
    service: Arc<AccountsService<R>>,
}

impl<R: UsersRepository> AccountsLocalClient<R> {
    #[must_use]
    pub fn new(service: Arc<AccountsService<R>>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<R: UsersRepository + 'static> AccountsApi for AccountsLocalClient<R> {
    async fn register(&self, new_user: NewUser) -> Result<AuthSession, AccountsError> {
        self.service.register(new_user).await.map_err(Into::into)
    }

    async fn authenticate(
        &self,
        login: &str,
        password: &str,
    ) -> Result<AuthSession, AccountsError> {
        self.service
            .authenticate(login, password)
            .await
            .map_err(Into::into)
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<User, AccountsError> {
        self.service.get_profile(user_id).await.map_err(Into::into)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        patch: ProfilePatch,
    ) -> Result<User, AccountsError> {
        self.service
            .update_profile(user_id, patch)
            .await
            .map_err(Into::into)
    }

    async fn set_active(&self, user_id: Uuid, active: bool) -> Result<User, AccountsError> {
        self.service
            .set_active(user_id, active)
            .await
            .map_err(Into::into)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AccountsError> {
        self.service
            .find_by_username(username)
            .await
            .map_err(Into::into)
    }
}
