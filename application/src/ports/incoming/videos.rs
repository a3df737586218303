use bytes::Bytes;

use crate::error::AppResult;
use domain::media::MediaAsset;
use domain::user::UserId;

#[async_trait::async_trait]
pub trait VideoUseCase: Send + Sync {
    async fn get_videos(&self, user_id: &UserId) -> AppResult<Vec<MediaAsset>>;
    /// Returns the public URL of the generated video.
    async fn request_video(&self, user_id: &UserId, request_body: Bytes) -> AppResult<String>;
}
