use sqlx::PgPool;
use tracing::{debug, instrument};

use domain::user::{NewUser, User, UserId};
use postflow_application::{
    error::{AppError, AppResult},
    ports::outgoing::user_store::UserStorePort,
};

use super::utils::{PostgresExecutor, begin_transaction, commit_transaction};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    external_id: String,
    email: String,
    display_name: String,
    avatar_url: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_i64(row.id),
            external_id: row.external_id,
            email: row.email,
            display_name: row.display_name,
            avatar_url: row.avatar_url,
        }
    }
}

pub struct PostgresUserStoreAdapter {
    pool: PgPool,
    executor: PostgresExecutor,
}

impl PostgresUserStoreAdapter {
    pub fn new(pool: PgPool, query_timeout_secs: u64) -> Self {
        Self {
            pool,
            executor: PostgresExecutor::new(query_timeout_secs),
        }
    }
}

#[async_trait::async_trait]
impl UserStorePort for PostgresUserStoreAdapter {
    #[instrument(skip(self))]
    async fn find_user_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        let row: Option<UserRow> = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as(
                        r"
                    SELECT id, external_id, email, display_name, avatar_url
                    FROM users
                    WHERE id = $1
                    ",
                    )
                    .bind(id.as_i64())
                    .fetch_optional(&self.pool)
                },
                &format!("Failed to find user {}", id),
            )
            .await?;

        Ok(row.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row: Option<UserRow> = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as(
                        r"
                    SELECT id, external_id, email, display_name, avatar_url
                    FROM users
                    WHERE email = $1
                    ",
                    )
                    .bind(email)
                    .fetch_optional(&self.pool)
                },
                &format!("Failed to find user by email {}", email),
            )
            .await?;

        Ok(row.map(User::from))
    }

    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    async fn create_user_with_credits(
        &self,
        new_user: &NewUser,
        initial_credits: i64,
    ) -> AppResult<User> {
        let mut tx = begin_transaction(&self.pool, "Failed to begin user creation").await?;

        let conn = &mut *tx;
        let row: UserRow = self
            .executor
            .execute_with_timeout(
                move || {
                    sqlx::query_as(
                        r"
                    INSERT INTO users (external_id, email, display_name, avatar_url)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id, external_id, email, display_name, avatar_url
                    ",
                    )
                    .bind(&new_user.external_id)
                    .bind(&new_user.email)
                    .bind(&new_user.display_name)
                    .bind(&new_user.avatar_url)
                    .fetch_one(conn)
                },
                &format!("Failed to create user with email {}", new_user.email),
            )
            .await?;

        let user_id = row.id;
        let conn = &mut *tx;
        self.executor
            .execute_with_timeout(
                move || {
                    sqlx::query(
                        r"
                    INSERT INTO credits (user_id, balance)
                    VALUES ($1, $2)
                    ",
                    )
                    .bind(user_id)
                    .bind(initial_credits)
                    .execute(conn)
                },
                &format!("Failed to create credits for user {}", user_id),
            )
            .await?;

        commit_transaction(tx, "Failed to commit user creation").await?;

        debug!(
            "Created user {} with email {} and {} initial credits",
            user_id, new_user.email, initial_credits
        );

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: &UserId) -> AppResult<()> {
        let result = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query("DELETE FROM users WHERE id = $1")
                        .bind(id.as_i64())
                        .execute(&self.pool)
                },
                &format!("Failed to delete user {}", id),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound {
                message: format!("User {} not found", id),
            });
        }

        debug!("Deleted user {}", id);

        Ok(())
    }
}
