use sqlx::PgPool;
use tracing::{debug, instrument};

use domain::media::NewMediaAsset;
use domain::user::UserId;
use postflow_application::{
    error::{AppError, AppResult},
    ports::outgoing::generation_ledger::{GenerationLedgerPort, GenerationSettlement},
};

use super::media_asset_store_postgres::insert_media_asset;
use super::utils::{PostgresExecutor, begin_transaction, commit_transaction};

pub struct PostgresGenerationLedgerAdapter {
    pool: PgPool,
    executor: PostgresExecutor,
}

impl PostgresGenerationLedgerAdapter {
    pub fn new(pool: PgPool, query_timeout_secs: u64) -> Self {
        Self {
            pool,
            executor: PostgresExecutor::new(query_timeout_secs),
        }
    }
}

#[async_trait::async_trait]
impl GenerationLedgerPort for PostgresGenerationLedgerAdapter {
    #[instrument(skip(self, asset))]
    async fn settle_generation(
        &self,
        user_id: &UserId,
        cost: i64,
        asset: &NewMediaAsset,
    ) -> AppResult<GenerationSettlement> {
        let mut tx = begin_transaction(&self.pool, "Failed to begin settlement")
            .await
            .map_err(|e| AppError::LedgerUpdateFailed {
                message: e.to_string(),
            })?;

        let conn = &mut *tx;
        let remaining: Option<i64> = self
            .executor
            .execute_with_timeout(
                move || {
                    sqlx::query_scalar(
                        r"
                    UPDATE credits
                    SET balance = balance - $2, updated_at = NOW()
                    WHERE user_id = $1 AND balance >= $2
                    RETURNING balance
                    ",
                    )
                    .bind(user_id.as_i64())
                    .bind(cost)
                    .fetch_optional(conn)
                },
                &format!("Failed to debit credits for user {}", user_id),
            )
            .await
            .map_err(|e| AppError::LedgerUpdateFailed {
                message: e.to_string(),
            })?;

        let Some(remaining_credits) = remaining else {
            let conn = &mut *tx;
            let current: Option<i64> = self
                .executor
                .execute_with_timeout(
                    move || {
                        sqlx::query_scalar("SELECT balance FROM credits WHERE user_id = $1")
                            .bind(user_id.as_i64())
                            .fetch_optional(conn)
                    },
                    &format!("Failed to read credits for user {}", user_id),
                )
                .await
                .map_err(|e| AppError::LedgerUpdateFailed {
                    message: e.to_string(),
                })?;

            return Err(match current {
                None => AppError::NoCreditsRecord { user_id: *user_id },
                Some(available) => AppError::InsufficientCredits {
                    message: format!("Required {} credits, but only {} available", cost, available),
                },
            });
        };

        // Dropping the transaction on failure rolls the debit back.
        let stored = insert_media_asset(&self.executor, &mut *tx, asset)
            .await
            .map_err(|e| AppError::AssetRecordFailed {
                message: e.to_string(),
            })?;

        commit_transaction(tx, "Failed to commit settlement")
            .await
            .map_err(|e| AppError::LedgerUpdateFailed {
                message: e.to_string(),
            })?;

        debug!(
            "Settled generation for user {}: asset {}, {} credits remaining",
            user_id,
            stored.id.as_i64(),
            remaining_credits
        );

        Ok(GenerationSettlement {
            remaining_credits,
            asset: stored,
        })
    }
}
