//! HS256 identity tokens.

use async_trait::async_trait;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    claims::Claims,
    config::AuthConfig,
    errors::AuthError,
    traits::{IssuedToken, TokenIssuer, TokenValidator},
};

/// Signs and verifies identity tokens with a shared HMAC secret.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl_secs: u64,
}

impl JwtTokenService {
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.expose().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_aud = false;
        validation.leeway = config.leeway_seconds;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            issuer: config.issuer.clone(),
            ttl_secs: config.token_ttl_secs,
        }
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))
    }
}

impl std::fmt::Debug for JwtTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("issuer", &self.issuer)
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer for JwtTokenService {
    fn issue(&self, user_id: Uuid) -> Result<IssuedToken, AuthError> {
        let claims = Claims::new(user_id, &self.issuer, OffsetDateTime::now_utc(), self.ttl_secs);
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| AuthError::Internal("token expiry out of range".to_owned()))?;
        let access_token = self.sign(&claims)?;
        Ok(IssuedToken {
            access_token,
            expires_at,
        })
    }
}

#[async_trait]
impl TokenValidator for JwtTokenService {
    async fn validate_and_parse(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }
}
