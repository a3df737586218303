use sqlx::PgPool;

use domain::media::NewMediaAsset;
use domain::user::{NewUser, UserId};
use postflow_application::ports::outgoing::user_store::UserStorePort;

use super::user_store_postgres::PostgresUserStoreAdapter;

pub const QUERY_TIMEOUT_SECS: u64 = 5;

/// Registers an email-only user whose ledger row holds `balance`.
pub async fn seed_user(pool: &PgPool, email: &str, balance: i64) -> UserId {
    PostgresUserStoreAdapter::new(pool.clone(), QUERY_TIMEOUT_SECS)
        .create_user_with_credits(&NewUser::email_only(email), balance)
        .await
        .unwrap()
        .id
}

/// Registers a user with no credits row at all.
pub async fn seed_user_without_credits(pool: &PgPool, email: &str) -> UserId {
    let id: i64 = sqlx::query_scalar("INSERT INTO users (email) VALUES ($1) RETURNING id")
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap();
    UserId::from_i64(id)
}

pub fn video(owner: UserId, reference: &str) -> NewMediaAsset {
    NewMediaAsset {
        owner,
        filename: reference.to_string(),
        content_type: "video/mp4".to_string(),
        url: format!("https://cdn.example.com/videos/{reference}.mp4"),
    }
}

pub async fn balance_of(pool: &PgPool, user_id: UserId) -> Option<i64> {
    sqlx::query_scalar("SELECT balance FROM credits WHERE user_id = $1")
        .bind(user_id.as_i64())
        .fetch_optional(pool)
        .await
        .unwrap()
}

pub async fn asset_count(pool: &PgPool, owner: UserId) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM media_assets WHERE owner_user_id = $1")
        .bind(owner.as_i64())
        .fetch_one(pool)
        .await
        .unwrap()
}
