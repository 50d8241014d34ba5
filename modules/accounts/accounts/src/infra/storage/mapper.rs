use accounts_sdk::User;
use sea_orm::ActiveValue::{NotSet, Set};

use super::entity::{ActiveModel, Model};
use crate::domain::repo::UserRecord;

impl From<Model> for UserRecord {
    fn from(m: Model) -> Self {
        Self {
            user: User {
                id: m.id,
                username: m.username,
                email: m.email,
                first_name: m.first_name,
                last_name: m.last_name,
                is_active: m.is_active,
                created_at: m.created_at,
                updated_at: m.updated_at,
            },
            password_hash: m.password_hash,
        }
    }
}

impl From<&UserRecord> for ActiveModel {
    fn from(r: &UserRecord) -> Self {
        let u = &r.user;
        Self {
            id: Set(u.id),
            username: Set(u.username.clone()),
            email: Set(u.email.clone()),
            first_name: Set(u.first_name.clone()),
            last_name: Set(u.last_name.clone()),
            password_hash: Set(r.password_hash.clone()),
            is_active: Set(u.is_active),
            created_at: Set(u.created_at),
            updated_at: Set(u.updated_at),
        }
    }
}

/// Profile update: identity, credentials and creation time stay untouched.
pub fn profile_update(u: &User) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        username: NotSet,
        email: Set(u.email.clone()),
        first_name: Set(u.first_name.clone()),
        last_name: Set(u.last_name.clone()),
        password_hash: NotSet,
        is_active: Set(u.is_active),
        created_at: NotSet,
        updated_at: Set(u.updated_at),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn user() -> User {
        let now = OffsetDateTime::UNIX_EPOCH;
        User {
            id: Uuid::nil(),
            username: "alice".to_owned(),
            email: "alice@example.com".to_owned(),
            first_name: "Alice".to_owned(),
            last_name: "Liddell".to_owned(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn profile_update_never_touches_credentials() {
        let am = profile_update(&user());
        assert_eq!(am.password_hash, ActiveValue::NotSet);
        assert_eq!(am.username, ActiveValue::NotSet);
        assert_eq!(am.email, ActiveValue::Set("alice@example.com".to_owned()));
    }

    #[test]
    fn record_keeps_the_hash() {
        let record = UserRecord {
            user: user(),
            password_hash: "$2b$04$hash".to_owned(),
        };
        let am = ActiveModel::from(&record);
        assert_eq!(am.password_hash, ActiveValue::Set("$2b$04$hash".to_owned()));
        assert!(!format!("{record:?}").contains("$2b$"));
    }
}
