use tracing::instrument;

use domain::user::UserId;

use crate::error::{AppError, AppResult};
use crate::ports::incoming::credits::CreditsUseCase;
use crate::ports::outgoing::credit_store::DynCreditStorePort;

pub struct CreditsService {
    credit_store: DynCreditStorePort,
}

impl CreditsService {
    pub fn new(credit_store: DynCreditStorePort) -> Self {
        Self { credit_store }
    }
}

#[async_trait::async_trait]
impl CreditsUseCase for CreditsService {
    #[instrument(skip(self))]
    async fn get_credits(&self, user_id: &UserId) -> AppResult<i64> {
        match self.credit_store.get_balance(user_id).await {
            Ok(balance) => Ok(balance.balance),
            Err(AppError::NotFound { .. }) => Err(AppError::NoCreditsRecord { user_id: *user_id }),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_support::InMemoryStore;

    #[tokio::test]
    async fn returns_current_balance() {
        let store = Arc::new(InMemoryStore::new());
        let user = store.insert_user("ada@example.com", Some(7));
        let service = CreditsService::new(store);

        assert_eq!(service.get_credits(&user).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn missing_row_is_no_credits_record() {
        let store = Arc::new(InMemoryStore::new());
        let user = store.insert_user("ada@example.com", None);
        let service = CreditsService::new(store);

        let err = service.get_credits(&user).await.unwrap_err();

        assert!(matches!(err, AppError::NoCreditsRecord { .. }));
    }

    #[tokio::test]
    async fn storage_errors_pass_through() {
        let store = Arc::new(InMemoryStore::new());
        let user = store.insert_user("ada@example.com", Some(1));
        store.fail_reads();
        let service = CreditsService::new(store);

        let err = service.get_credits(&user).await.unwrap_err();

        assert!(matches!(err, AppError::DatabaseError { .. }));
    }
}
