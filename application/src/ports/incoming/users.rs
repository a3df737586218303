use crate::error::AppResult;
use domain::user::{User, UserId};

#[async_trait::async_trait]
pub trait UserUseCase: Send + Sync {
    async fn get_user_info(&self, user_id: &UserId) -> AppResult<User>;
    async fn remove_user(&self, user_id: &UserId) -> AppResult<()>;
}
