use tracing::{info, instrument};

use domain::user::{User, UserId};

use crate::error::{AppError, AppResult};
use crate::ports::incoming::users::UserUseCase;
use crate::ports::outgoing::user_store::DynUserStorePort;

pub struct UserService {
    user_store: DynUserStorePort,
}

impl UserService {
    pub fn new(user_store: DynUserStorePort) -> Self {
        Self { user_store }
    }
}

#[async_trait::async_trait]
impl UserUseCase for UserService {
    #[instrument(skip(self))]
    async fn get_user_info(&self, user_id: &UserId) -> AppResult<User> {
        self.user_store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                message: format!("User {} not found", user_id),
            })
    }

    /// Credits and media assets go with the user.
    #[instrument(skip(self))]
    async fn remove_user(&self, user_id: &UserId) -> AppResult<()> {
        self.user_store.delete_user(user_id).await?;
        info!(user_id = %user_id, "User deleted");
        Ok(())
    }
}
