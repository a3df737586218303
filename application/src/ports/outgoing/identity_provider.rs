use std::sync::Arc;

use crate::error::AppResult;
use domain::user::IdentityProfile;

/// Everything needed to send the caller to the provider's consent screen and
/// to verify the callback afterwards.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub authorize_url: String,
    pub csrf_state: String,
    pub pkce_verifier: String,
}

#[async_trait::async_trait]
pub trait IdentityProviderPort: Send + Sync {
    fn authorization_request(&self) -> AppResult<AuthorizationRequest>;
    async fn exchange_code(&self, code: &str, pkce_verifier: &str) -> AppResult<IdentityProfile>;
}

pub type DynIdentityProviderPort = Arc<dyn IdentityProviderPort>;
