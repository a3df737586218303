use axum::{Json, body::Bytes, extract::State};

use crate::incoming::http_axum::{
    core::extractors::{CurrentSession, current_user_id},
    dto::responses::{GenerateVideoResponse, VideoResponse},
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;

pub async fn list_videos(
    auth_session: CurrentSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<VideoResponse>>, HttpError> {
    let user_id = current_user_id(&auth_session)?;
    let videos = state.video_use_case.get_videos(&user_id).await?;
    Ok(Json(videos.into_iter().map(VideoResponse::from).collect()))
}

/// The body is handed to the generation engine untouched.
pub async fn generate_video(
    auth_session: CurrentSession,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateVideoResponse>, HttpError> {
    let user_id = current_user_id(&auth_session)?;
    let video_url = state.video_use_case.request_video(&user_id, body).await?;
    Ok(Json(GenerateVideoResponse { video_url }))
}
