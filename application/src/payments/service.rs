use tracing::{info, instrument};

use domain::credits::CreditPricing;
use domain::user::{NewUser, User};

use crate::error::{AppError, AppResult};
use crate::ports::incoming::payments::{PaymentNotification, PaymentOutcome, PaymentUseCase};
use crate::ports::outgoing::credit_store::DynCreditStorePort;
use crate::ports::outgoing::user_store::DynUserStorePort;

pub struct PaymentService {
    pricing: CreditPricing,
    user_store: DynUserStorePort,
    credit_store: DynCreditStorePort,
    initial_credits: i64,
}

impl PaymentService {
    pub fn new(
        pricing: CreditPricing,
        user_store: DynUserStorePort,
        credit_store: DynCreditStorePort,
        initial_credits: i64,
    ) -> Self {
        Self {
            pricing,
            user_store,
            credit_store,
            initial_credits,
        }
    }

    async fn find_or_create_buyer(&self, email: &str) -> AppResult<User> {
        if let Some(user) = self.user_store.find_user_by_email(email).await? {
            return Ok(user);
        }

        match self
            .user_store
            .create_user_with_credits(&NewUser::email_only(email), self.initial_credits)
            .await
        {
            Ok(user) => {
                info!(user_id = %user.id, "Created user from payment notification");
                Ok(user)
            }
            // A concurrent notification or login registered the email first.
            Err(AppError::Conflict { .. }) => self.registered_buyer(email).await,
            Err(e) => Err(e),
        }
    }

    async fn registered_buyer(&self, email: &str) -> AppResult<User> {
        self.user_store
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound {
                message: format!("User with email {} vanished after conflict", email),
            })
    }
}

#[async_trait::async_trait]
impl PaymentUseCase for PaymentService {
    #[instrument(
        skip(self, notification),
        fields(product_id = %notification.product_id, price = %notification.price)
    )]
    async fn handle_payment(&self, notification: PaymentNotification) -> AppResult<PaymentOutcome> {
        self.pricing.ensure_known_product(&notification.product_id)?;
        let increment = self.pricing.credits_for_price(&notification.price)?;

        let user = self.find_or_create_buyer(&notification.email).await?;

        let new_balance = match self.credit_store.get_balance(&user.id).await {
            Ok(balance) => {
                let new_balance = balance.balance + increment;
                self.credit_store.set_balance(&user.id, new_balance).await?;
                new_balance
            }
            Err(AppError::NotFound { .. }) => {
                self.credit_store.create_initial(&user.id, increment).await?;
                increment
            }
            Err(e) => return Err(e),
        };

        info!(
            user_id = %user.id,
            credits_added = increment,
            new_balance,
            "Payment credited"
        );

        Ok(PaymentOutcome {
            user_id: user.id,
            credits_added: increment,
            new_balance,
        })
    }
}
