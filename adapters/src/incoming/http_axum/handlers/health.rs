use axum::{Json, extract::State};

use crate::incoming::http_axum::{dto::responses::ApiResponse, error_mapper::HttpError};
use crate::shared::app_state::AppState;

pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, HttpError> {
    state.health_probe.ping().await?;

    Ok(Json(ApiResponse::success_with_data(Some(
        serde_json::json!({ "database": "up" }),
    ))))
}
