use crate::error::AppResult;
use domain::user::UserId;

#[async_trait::async_trait]
pub trait CreditsUseCase: Send + Sync {
    async fn get_credits(&self, user_id: &UserId) -> AppResult<i64>;
}
