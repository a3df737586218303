use axum::{Json, extract::State};

use crate::incoming::http_axum::{
    core::extractors::{CurrentSession, current_user_id},
    dto::responses::CreditsResponse,
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;

pub async fn get_credits(
    auth_session: CurrentSession,
    State(state): State<AppState>,
) -> Result<Json<CreditsResponse>, HttpError> {
    let user_id = current_user_id(&auth_session)?;
    let credits = state.credits_use_case.get_credits(&user_id).await?;
    Ok(Json(CreditsResponse { credits }))
}
