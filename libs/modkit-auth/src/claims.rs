use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Claims carried by a Parkour identity token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: Uuid,
    pub iss: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
    /// Token id, unique per issue.
    pub jti: Uuid,
}

impl Claims {
    #[must_use]
    pub fn new(sub: Uuid, issuer: &str, issued_at: OffsetDateTime, ttl_secs: u64) -> Self {
        let iat = issued_at.unix_timestamp();
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        Self {
            sub,
            iss: issuer.to_owned(),
            iat,
            exp: iat.saturating_add(ttl),
            jti: Uuid::new_v4(),
        }
    }

    #[must_use]
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(self.exp).ok()
    }

    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.exp <= now.unix_timestamp()
    }
}
