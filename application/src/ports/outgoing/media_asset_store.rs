use std::sync::Arc;

use crate::error::AppResult;
use domain::media::{MediaAsset, NewMediaAsset};
use domain::user::UserId;

#[async_trait::async_trait]
pub trait MediaAssetStorePort: Send + Sync {
    async fn record(&self, asset: &NewMediaAsset) -> AppResult<MediaAsset>;
    /// Oldest first.
    async fn list_by_owner(&self, owner: &UserId) -> AppResult<Vec<MediaAsset>>;
}

pub type DynMediaAssetStorePort = Arc<dyn MediaAssetStorePort>;
