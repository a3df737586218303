use tracing::{info, instrument};

use domain::user::{NewUser, User};

use crate::error::{AppError, AppResult};
use crate::ports::incoming::auth::IdentityUseCase;
use crate::ports::outgoing::identity_provider::{AuthorizationRequest, DynIdentityProviderPort};
use crate::ports::outgoing::user_store::DynUserStorePort;

pub struct IdentityService {
    identity_provider: DynIdentityProviderPort,
    user_store: DynUserStorePort,
    initial_credits: i64,
}

impl IdentityService {
    pub fn new(
        identity_provider: DynIdentityProviderPort,
        user_store: DynUserStorePort,
        initial_credits: i64,
    ) -> Self {
        Self {
            identity_provider,
            user_store,
            initial_credits,
        }
    }
}

#[async_trait::async_trait]
impl IdentityUseCase for IdentityService {
    fn begin_login(&self) -> AppResult<AuthorizationRequest> {
        self.identity_provider.authorization_request()
    }

    #[instrument(skip_all)]
    async fn complete_login(&self, code: String, pkce_verifier: String) -> AppResult<User> {
        let profile = self
            .identity_provider
            .exchange_code(&code, &pkce_verifier)
            .await?;

        if let Some(user) = self.user_store.find_user_by_email(&profile.email).await? {
            return Ok(user);
        }

        let new_user = NewUser::from(profile);
        match self
            .user_store
            .create_user_with_credits(&new_user, self.initial_credits)
            .await
        {
            Ok(user) => {
                info!(user_id = %user.id, "Registered user on first login");
                Ok(user)
            }
            Err(AppError::Conflict { .. }) => self
                .user_store
                .find_user_by_email(&new_user.email)
                .await?
                .ok_or(AppError::Unauthorized),
            Err(e) => Err(e),
        }
    }
}
