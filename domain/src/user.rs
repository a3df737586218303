use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl UserId {
    pub fn from_i64(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub external_id: String,
    pub email: String,
    pub display_name: String,
    pub avatar_url: String,
}

/// Identity fields for a user that has not been persisted yet.
///
/// Users created from a payment notification only carry an email; the other
/// fields stay empty until nothing else is known about them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub external_id: String,
    pub email: String,
    pub display_name: String,
    pub avatar_url: String,
}

impl NewUser {
    pub fn email_only(email: impl Into<String>) -> Self {
        Self {
            external_id: String::new(),
            email: email.into(),
            display_name: String::new(),
            avatar_url: String::new(),
        }
    }
}

/// Profile returned by the identity provider after a successful code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProfile {
    pub provider_user_id: String,
    pub email: String,
    pub display_name: String,
    pub avatar_url: String,
}

impl From<IdentityProfile> for NewUser {
    fn from(profile: IdentityProfile) -> Self {
        Self {
            external_id: profile.provider_user_id,
            email: profile.email,
            display_name: profile.display_name,
            avatar_url: profile.avatar_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_only_user_leaves_profile_fields_empty() {
        let user = NewUser::email_only("buyer@example.com");

        assert_eq!(user.email, "buyer@example.com");
        assert!(user.external_id.is_empty());
        assert!(user.display_name.is_empty());
        assert!(user.avatar_url.is_empty());
    }

    #[test]
    fn identity_profile_maps_provider_id_to_external_id() {
        let profile = IdentityProfile {
            provider_user_id: "1099".to_string(),
            email: "ada@example.com".to_string(),
            display_name: "Ada".to_string(),
            avatar_url: "https://example.com/ada.png".to_string(),
        };

        let user = NewUser::from(profile);

        assert_eq!(user.external_id, "1099");
        assert_eq!(user.display_name, "Ada");
    }
}
