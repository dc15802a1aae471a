use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database. A single row may carry several identity
/// keys at once (password email, Google id, wallet address) as paths get
/// linked over time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>, // NULL for OAuth-only and wallet-only users
    pub google_id: Option<String>,
    pub wallet_address: Option<String>, // always stored lower-cased
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    /// Display name: first+last, else whichever is set, else username, else
    /// email.
    pub fn full_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => self
                .username
                .clone()
                .unwrap_or_else(|| self.email.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "a@x.com".into(),
            username: None,
            first_name: None,
            last_name: None,
            password_hash: Some("secret-hash".into()),
            google_id: None,
            wallet_address: None,
            is_active: true,
            is_verified: false,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn full_name_prefers_both_names() {
        let mut u = user();
        u.first_name = Some("Ada".into());
        u.last_name = Some("Lovelace".into());
        assert_eq!(u.full_name(), "Ada Lovelace");
    }

    #[test]
    fn full_name_falls_back_through_the_chain() {
        let mut u = user();
        u.first_name = Some("Ada".into());
        assert_eq!(u.full_name(), "Ada");

        let mut u = user();
        u.last_name = Some("Lovelace".into());
        assert_eq!(u.full_name(), "Lovelace");

        let mut u = user();
        u.username = Some("ada".into());
        assert_eq!(u.full_name(), "ada");

        assert_eq!(user().full_name(), "a@x.com");
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let json = serde_json::to_string(&user()).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("secret-hash"));
    }
}
