use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tracing::error;

use crate::incoming::http_axum::{
    core::extractors::{CurrentSession, ValidatedForm, current_user_id},
    dto::{requests::DeleteAccountForm, responses::UserInfoResponse},
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;
use postflow_application::error::AppError;

pub async fn get_user_info(
    auth_session: CurrentSession,
    State(state): State<AppState>,
) -> Result<Json<UserInfoResponse>, HttpError> {
    let user_id = current_user_id(&auth_session)?;
    let user = state.user_use_case.get_user_info(&user_id).await?;
    Ok(Json(user.into()))
}

pub async fn delete_user(
    mut auth_session: CurrentSession,
    State(state): State<AppState>,
    ValidatedForm(_confirmed): ValidatedForm<DeleteAccountForm>,
) -> Result<Response, HttpError> {
    let user_id = current_user_id(&auth_session)?;

    // Any failure here is reported to the caller as a rejected request.
    state
        .user_use_case
        .remove_user(&user_id)
        .await
        .map_err(|e| {
            error!(user_id = %user_id, "Failed to delete account: {}", e);
            HttpError(AppError::ValidationError {
                message: "Failed to delete account".to_string(),
            })
        })?;

    auth_session
        .logout()
        .await
        .map_err(|_| HttpError(AppError::InternalServerError))?;

    Ok(Redirect::temporary(&state.config.auth.frontend_url).into_response())
}
