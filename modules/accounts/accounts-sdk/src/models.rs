use std::fmt;

use time::OffsetDateTime;
use uuid::Uuid;

/// A registered user. Never carries the password or its hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Registration data. All fields are required.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    /// Plaintext; hashed before it reaches storage.
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Profile fields a user may change. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// A user together with a freshly issued identity token.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: User,
    pub access_token: String,
    pub expires_at: OffsetDateTime,
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("user", &self.user)
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secrets() {
        let nu = NewUser {
            username: "alice".to_owned(),
            password: "s3cret-pass".to_owned(),
            ..NewUser::default()
        };
        let out = format!("{nu:?}");
        assert!(out.contains("alice"));
        assert!(!out.contains("s3cret-pass"));
    }
}
