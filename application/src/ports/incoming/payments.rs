use crate::error::AppResult;
use domain::user::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentNotification {
    pub email: String,
    pub product_id: String,
    pub price: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentOutcome {
    pub user_id: UserId,
    pub credits_added: i64,
    pub new_balance: i64,
}

#[async_trait::async_trait]
pub trait PaymentUseCase: Send + Sync {
    async fn handle_payment(&self, notification: PaymentNotification) -> AppResult<PaymentOutcome>;
}
