use serde::{Deserialize, Serialize};

use crate::secret::SecretString;

/// Authentication settings (`auth` section of the server config).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC key for HS256 identity tokens.
    pub jwt_secret: SecretString,
    /// Lifetime of an issued token.
    pub token_ttl_secs: u64,
    /// `iss` claim written into and required from every token.
    pub issuer: String,
    /// Clock skew tolerated when checking `exp`.
    pub leeway_seconds: u64,
    /// bcrypt work factor (4..=31).
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: SecretString::new("jwt-secret-key"),
            token_ttl_secs: 3600,
            issuer: "parkour-api".to_owned(),
            leeway_seconds: 0,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AuthConfig {
    /// Validate the configuration for consistency.
    ///
    /// # Errors
    /// Returns a description of the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.expose().is_empty() {
            return Err("auth.jwt_secret must not be empty".to_owned());
        }
        if self.token_ttl_secs == 0 {
            return Err("auth.token_ttl_secs must be greater than zero".to_owned());
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(format!(
                "auth.bcrypt_cost must be between 4 and 31, got {}",
                self.bcrypt_cost
            ));
        }
        Ok(())
    }
}
