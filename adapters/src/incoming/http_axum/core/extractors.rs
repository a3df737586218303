use axum::{
    Form,
    extract::{FromRequest, Request},
};
use axum_login::AuthSession;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::incoming::http_axum::{auth::backend::AuthBackend, error_mapper::HttpError};
use domain::user::UserId;
use postflow_application::error::AppError;

pub type CurrentSession = AuthSession<AuthBackend>;

pub fn current_user_id(auth_session: &CurrentSession) -> Result<UserId, HttpError> {
    auth_session
        .user
        .as_ref()
        .map(|user| user.user_id())
        .ok_or(HttpError(AppError::Unauthorized))
}

/// Url-encoded form that has passed its `validator` rules. Undecodable bodies
/// and wrong content types are reported as 400 validation errors.
pub struct ValidatedForm<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedForm<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                HttpError(AppError::ValidationError {
                    message: rejection.body_text(),
                })
            })?;

        value.validate().map_err(|e| {
            HttpError(AppError::ValidationError {
                message: e.to_string(),
            })
        })?;

        Ok(Self(value))
    }
}
