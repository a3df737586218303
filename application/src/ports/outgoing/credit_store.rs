use std::sync::Arc;

use crate::error::AppResult;
use domain::credits::CreditBalance;
use domain::user::UserId;

#[async_trait::async_trait]
pub trait CreditStorePort: Send + Sync {
    /// Fails with `NotFound` when the user has no ledger row.
    async fn get_balance(&self, user_id: &UserId) -> AppResult<CreditBalance>;
    /// Fails with `Conflict` when a row already exists.
    async fn create_initial(&self, user_id: &UserId, amount: i64) -> AppResult<UserId>;
    /// Unconditional last-writer-wins overwrite.
    async fn set_balance(&self, user_id: &UserId, new_balance: i64) -> AppResult<()>;
}

pub type DynCreditStorePort = Arc<dyn CreditStorePort>;
