use sqlx::{Executor, PgPool, Postgres};
use time::OffsetDateTime;
use tracing::{debug, instrument};

use domain::media::{MediaAsset, MediaAssetId, NewMediaAsset};
use domain::user::UserId;
use postflow_application::{
    error::AppResult, ports::outgoing::media_asset_store::MediaAssetStorePort,
};

use super::utils::PostgresExecutor;

#[derive(sqlx::FromRow)]
pub(super) struct MediaAssetRow {
    id: i64,
    owner_user_id: i64,
    filename: String,
    content_type: String,
    url: String,
    created_at: OffsetDateTime,
}

impl From<MediaAssetRow> for MediaAsset {
    fn from(row: MediaAssetRow) -> Self {
        Self {
            id: MediaAssetId(row.id),
            owner: UserId::from_i64(row.owner_user_id),
            filename: row.filename,
            content_type: row.content_type,
            url: row.url,
            created_at: row.created_at,
        }
    }
}

/// Shared by the plain store and the generation settlement so both write the
/// same row shape, on a pool or inside a transaction.
pub(super) async fn insert_media_asset<'c, E>(
    executor: &PostgresExecutor,
    conn: E,
    asset: &NewMediaAsset,
) -> AppResult<MediaAsset>
where
    E: Executor<'c, Database = Postgres>,
{
    let row: MediaAssetRow = executor
        .execute_with_timeout(
            move || {
                sqlx::query_as(
                    r"
                INSERT INTO media_assets (owner_user_id, filename, content_type, url)
                VALUES ($1, $2, $3, $4)
                RETURNING id, owner_user_id, filename, content_type, url, created_at
                ",
                )
                .bind(asset.owner.as_i64())
                .bind(&asset.filename)
                .bind(&asset.content_type)
                .bind(&asset.url)
                .fetch_one(conn)
            },
            &format!("Failed to record media asset for user {}", asset.owner),
        )
        .await?;

    Ok(row.into())
}

pub struct PostgresMediaAssetStoreAdapter {
    pool: PgPool,
    executor: PostgresExecutor,
}

impl PostgresMediaAssetStoreAdapter {
    pub fn new(pool: PgPool, query_timeout_secs: u64) -> Self {
        Self {
            pool,
            executor: PostgresExecutor::new(query_timeout_secs),
        }
    }
}

#[async_trait::async_trait]
impl MediaAssetStorePort for PostgresMediaAssetStoreAdapter {
    #[instrument(skip(self, asset), fields(owner = %asset.owner))]
    async fn record(&self, asset: &NewMediaAsset) -> AppResult<MediaAsset> {
        let stored = insert_media_asset(&self.executor, &self.pool, asset).await?;
        debug!("Recorded media asset {} for user {}", stored.id.as_i64(), stored.owner);
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn list_by_owner(&self, owner: &UserId) -> AppResult<Vec<MediaAsset>> {
        let rows: Vec<MediaAssetRow> = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as(
                        r"
                    SELECT id, owner_user_id, filename, content_type, url, created_at
                    FROM media_assets
                    WHERE owner_user_id = $1
                    ORDER BY created_at ASC, id ASC
                    ",
                    )
                    .bind(owner.as_i64())
                    .fetch_all(&self.pool)
                },
                &format!("Failed to list media assets for user {}", owner),
            )
            .await?;

        Ok(rows.into_iter().map(MediaAsset::from).collect())
    }
}
