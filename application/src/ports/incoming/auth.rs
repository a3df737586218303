use crate::error::AppResult;
use crate::ports::outgoing::identity_provider::AuthorizationRequest;
use domain::user::User;

#[async_trait::async_trait]
pub trait IdentityUseCase: Send + Sync {
    fn begin_login(&self) -> AppResult<AuthorizationRequest>;
    /// Exchanges the callback code and returns the local user, creating it
    /// (with its initial credit grant) on first sight of the email.
    async fn complete_login(&self, code: String, pkce_verifier: String) -> AppResult<User>;
}
