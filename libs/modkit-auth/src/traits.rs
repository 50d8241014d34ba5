use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{claims::Claims, errors::AuthError};

/// A freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_at: OffsetDateTime,
}

/// Issues identity tokens for authenticated users.
pub trait TokenIssuer: Send + Sync {
    /// Issue a token whose subject is `user_id`.
    ///
    /// # Errors
    /// Returns [`AuthError::Internal`] when signing fails.
    fn issue(&self, user_id: Uuid) -> Result<IssuedToken, AuthError>;
}

/// Validates bearer tokens and returns their claims.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate_and_parse(&self, token: &str) -> Result<Claims, AuthError>;
}
