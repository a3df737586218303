use postflow_application::error::{AppError, AppResult};
use sqlx::{PgPool, Postgres, Transaction};
use std::{future::Future, time::Duration};
use tokio::time::timeout;

/// Runs one query under the configured deadline. Unique violations surface as
/// `AppError::Conflict`; timeouts and other driver errors as
/// `AppError::DatabaseError`, both prefixed with the caller's context.
#[derive(Debug, Clone, Copy)]
pub struct PostgresExecutor {
    query_timeout: Duration,
}

impl PostgresExecutor {
    pub fn new(query_timeout_secs: u64) -> Self {
        Self {
            query_timeout: Duration::from_secs(query_timeout_secs),
        }
    }

    pub async fn execute_with_timeout<T, F, Fut>(
        &self,
        operation: F,
        error_context: &str,
    ) -> AppResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, sqlx::Error>>,
    {
        match timeout(self.query_timeout, operation()).await {
            Ok(result) => result.map_err(|e| database_error(error_context, &e)),
            Err(_) => Err(AppError::DatabaseError {
                message: format!(
                    "{}: query exceeded {}s",
                    error_context,
                    self.query_timeout.as_secs()
                ),
            }),
        }
    }
}

fn database_error(context: &str, err: &sqlx::Error) -> AppError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => AppError::Conflict {
            message: format!("{}: {}", context, db_err.message()),
        },
        _ => AppError::DatabaseError {
            message: format!("{}: {}", context, err),
        },
    }
}

pub async fn begin_transaction<'a>(
    pool: &'a PgPool,
    context: &str,
) -> AppResult<Transaction<'a, Postgres>> {
    pool.begin().await.map_err(|e| database_error(context, &e))
}

pub async fn commit_transaction(tx: Transaction<'_, Postgres>, context: &str) -> AppResult<()> {
    tx.commit().await.map_err(|e| database_error(context, &e))
}
