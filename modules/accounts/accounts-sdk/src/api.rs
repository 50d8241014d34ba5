//! `AccountsApi` trait definition.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AccountsError;
use crate::models::{AuthSession, NewUser, ProfilePatch, User};

/// Public API of the User Store, registered in the `ClientHub` as
/// `Arc<dyn AccountsApi>`.
#[async_trait]
pub trait AccountsApi: Send + Sync {
    /// Create a user and issue a token for it.
    async fn register(&self, new_user: NewUser) -> Result<AuthSession, AccountsError>;

    /// Check credentials. `login` matches either the username or the email.
    /// The same error is returned for an unknown login and a wrong password.
    async fn authenticate(&self, login: &str, password: &str)
    -> Result<AuthSession, AccountsError>;

    async fn get_profile(&self, user_id: Uuid) -> Result<User, AccountsError>;

    async fn update_profile(
        &self,
        user_id: Uuid,
        patch: ProfilePatch,
    ) -> Result<User, AccountsError>;

    /// Activate or deactivate an account. Inactive accounts cannot log in.
    async fn set_active(&self, user_id: Uuid, active: bool) -> Result<User, AccountsError>;

    /// Exact, case-sensitive username lookup.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AccountsError>;
}
