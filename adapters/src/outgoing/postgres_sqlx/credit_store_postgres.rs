use sqlx::{PgPool, Row};
use time::OffsetDateTime;
use tracing::{debug, instrument};

use domain::credits::CreditBalance;
use domain::user::UserId;
use postflow_application::{
    error::{AppError, AppResult},
    ports::outgoing::credit_store::CreditStorePort,
};

use super::utils::PostgresExecutor;

pub struct PostgresCreditStoreAdapter {
    pool: PgPool,
    executor: PostgresExecutor,
}

impl PostgresCreditStoreAdapter {
    pub fn new(pool: PgPool, query_timeout_secs: u64) -> Self {
        Self {
            pool,
            executor: PostgresExecutor::new(query_timeout_secs),
        }
    }
}

#[async_trait::async_trait]
impl CreditStorePort for PostgresCreditStoreAdapter {
    #[instrument(skip(self))]
    async fn get_balance(&self, user_id: &UserId) -> AppResult<CreditBalance> {
        let row = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query(
                        r"
                    SELECT balance, created_at, updated_at
                    FROM credits
                    WHERE user_id = $1
                    ",
                    )
                    .bind(user_id.as_i64())
                    .fetch_optional(&self.pool)
                },
                &format!("Failed to get credits for user {}", user_id),
            )
            .await?;

        let Some(record) = row else {
            return Err(AppError::NotFound {
                message: format!("No credits record for user {}", user_id),
            });
        };

        let balance: i64 = record
            .try_get("balance")
            .map_err(|e| AppError::DatabaseError {
                message: format!("Failed to get balance: {}", e),
            })?;
        let created_at: OffsetDateTime =
            record
                .try_get("created_at")
                .map_err(|e| AppError::DatabaseError {
                    message: format!("Failed to get created_at: {}", e),
                })?;
        let updated_at: OffsetDateTime =
            record
                .try_get("updated_at")
                .map_err(|e| AppError::DatabaseError {
                    message: format!("Failed to get updated_at: {}", e),
                })?;

        Ok(CreditBalance {
            user_id: *user_id,
            balance,
            created_at,
            updated_at,
        })
    }

    #[instrument(skip(self))]
    async fn create_initial(&self, user_id: &UserId, amount: i64) -> AppResult<UserId> {
        let inserted: Option<i64> = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_scalar(
                        r"
                    INSERT INTO credits (user_id, balance)
                    VALUES ($1, $2)
                    ON CONFLICT (user_id) DO NOTHING
                    RETURNING user_id
                    ",
                    )
                    .bind(user_id.as_i64())
                    .bind(amount)
                    .fetch_optional(&self.pool)
                },
                &format!("Failed to create credits for user {}", user_id),
            )
            .await?;

        let Some(id) = inserted else {
            return Err(AppError::Conflict {
                message: format!("Credits already exist for user {}", user_id),
            });
        };

        debug!("Created credits for user {} with balance {}", id, amount);

        Ok(UserId::from_i64(id))
    }

    #[instrument(skip(self))]
    async fn set_balance(&self, user_id: &UserId, new_balance: i64) -> AppResult<()> {
        let result = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query(
                        r"
                    UPDATE credits
                    SET balance = $2, updated_at = NOW()
                    WHERE user_id = $1
                    ",
                    )
                    .bind(user_id.as_i64())
                    .bind(new_balance)
                    .execute(&self.pool)
                },
                &format!("Failed to update credits for user {}", user_id),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound {
                message: format!("No credits record for user {}", user_id),
            });
        }

        debug!("Set credits for user {} to {}", user_id, new_balance);

        Ok(())
    }
}
