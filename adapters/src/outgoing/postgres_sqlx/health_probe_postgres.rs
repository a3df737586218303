use sqlx::PgPool;
use tracing::warn;

use postflow_application::{
    error::{AppError, AppResult},
    ports::outgoing::health_probe::HealthProbePort,
};

use super::utils::PostgresExecutor;

pub struct PostgresHealthProbe {
    pool: PgPool,
    executor: PostgresExecutor,
}

impl PostgresHealthProbe {
    pub fn new(pool: PgPool, query_timeout_secs: u64) -> Self {
        Self {
            pool,
            executor: PostgresExecutor::new(query_timeout_secs),
        }
    }
}

#[async_trait::async_trait]
impl HealthProbePort for PostgresHealthProbe {
    async fn ping(&self) -> AppResult<()> {
        self.executor
            .execute_with_timeout(
                || sqlx::query("SELECT 1").execute(&self.pool),
                "Database ping failed",
            )
            .await
            .map_err(|e| {
                warn!("{}", e);
                AppError::ServiceUnavailable
            })?;

        Ok(())
    }
}
