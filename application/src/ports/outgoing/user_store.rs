use std::sync::Arc;

use crate::error::AppResult;
use domain::user::{NewUser, User, UserId};

#[async_trait::async_trait]
pub trait UserStorePort: Send + Sync {
    async fn find_user_by_id(&self, id: &UserId) -> AppResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    /// Inserts the user and its initial credit balance as one unit; neither row
    /// exists without the other.
    async fn create_user_with_credits(
        &self,
        new_user: &NewUser,
        initial_credits: i64,
    ) -> AppResult<User>;
    async fn delete_user(&self, id: &UserId) -> AppResult<()>;
}

pub type DynUserStorePort = Arc<dyn UserStorePort>;
