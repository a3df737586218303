use axum::{extract::Request, middleware::Next, response::Response};

use crate::incoming::http_axum::{core::extractors::CurrentSession, error_mapper::HttpError};
use postflow_application::error::AppError;

pub async fn require_authenticated_user(
    auth_session: CurrentSession,
    request: Request,
    next: Next,
) -> Result<Response, HttpError> {
    if auth_session.user.is_none() {
        return Err(HttpError(AppError::Unauthorized));
    }

    Ok(next.run(request).await)
}
