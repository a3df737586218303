use axum_login::{AuthUser, AuthnBackend, UserId as AxumUserId};
use serde::{Deserialize, Serialize};

use domain::user::{User, UserId};
use postflow_application::error::AppError;
use postflow_application::ports::outgoing::user_store::DynUserStorePort;

/// What the session remembers about a logged-in caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub email: String,
}

impl SessionUser {
    pub fn user_id(&self) -> UserId {
        UserId::from_i64(self.id)
    }
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id.as_i64(),
            email: user.email,
        }
    }
}

impl AuthUser for SessionUser {
    type Id = i64;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn session_auth_hash(&self) -> &[u8] {
        self.email.as_bytes()
    }
}

/// Login only happens through the identity provider callback, so there are no
/// credentials to check here; the backend just resolves session user ids.
#[derive(Clone)]
pub struct AuthBackend {
    user_store: DynUserStorePort,
}

impl AuthBackend {
    pub fn new(user_store: DynUserStorePort) -> Self {
        Self { user_store }
    }
}

#[derive(Debug, Clone)]
pub struct NoCredentials;

impl AuthnBackend for AuthBackend {
    type User = SessionUser;
    type Credentials = NoCredentials;
    type Error = AppError;

    async fn authenticate(
        &self,
        _creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        Ok(None)
    }

    async fn get_user(
        &self,
        user_id: &AxumUserId<Self>,
    ) -> Result<Option<Self::User>, Self::Error> {
        let user = self
            .user_store
            .find_user_by_id(&UserId::from_i64(*user_id))
            .await
            .map_err(|_| AppError::InternalServerError)?;

        Ok(user.map(SessionUser::from))
    }
}
