use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{error, info, warn};

use crate::incoming::http_axum::{
    auth::backend::SessionUser, core::extractors::CurrentSession,
    dto::requests::LoginCallbackQuery, error_mapper::HttpError,
};
use crate::shared::app_state::AppState;
use postflow_application::{error::AppError, infrastructure_config::AuthConfig};

const LOGIN_STATE_KEY: &str = "oauth_state";

#[derive(Debug, Serialize, Deserialize)]
struct PendingLogin {
    csrf_state: String,
    pkce_verifier: String,
}

pub async fn login_start(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, HttpError> {
    let request = state.identity_use_case.begin_login()?;

    let pending = PendingLogin {
        csrf_state: request.csrf_state,
        pkce_verifier: request.pkce_verifier,
    };

    session
        .insert(LOGIN_STATE_KEY, &pending)
        .await
        .map_err(|e| {
            error!("Failed to store login state in session: {}", e);
            HttpError(AppError::InternalServerError)
        })?;

    info!("Redirecting to identity provider");

    Ok(Redirect::to(&request.authorize_url).into_response())
}

fn redirect_to_error(config: &AuthConfig, error_type: &str) -> Response {
    let Ok(mut url) = url::Url::parse(&config.frontend_url) else {
        error!("Invalid frontend URL configuration");
        return Redirect::to("/?error=config_error").into_response();
    };
    url.query_pairs_mut().append_pair("error", error_type);
    warn!("Login failed, redirecting to: {}", url);
    Redirect::to(url.as_str()).into_response()
}

async fn take_pending_login(
    session: &Session,
    state_param: &str,
    config: &AuthConfig,
) -> Result<PendingLogin, Response> {
    let pending: PendingLogin = match session.get(LOGIN_STATE_KEY).await {
        Ok(Some(pending)) => pending,
        Ok(None) => {
            error!("Login state not found in session");
            return Err(redirect_to_error(config, "invalid_state"));
        }
        Err(e) => {
            error!("Failed to retrieve login state from session: {}", e);
            return Err(redirect_to_error(config, "session_error"));
        }
    };

    if pending.csrf_state != state_param {
        error!("CSRF state validation failed");
        return Err(redirect_to_error(config, "invalid_state"));
    }

    if let Err(e) = session.remove::<PendingLogin>(LOGIN_STATE_KEY).await {
        error!("Failed to remove login state from session: {}", e);
        return Err(redirect_to_error(config, "session_error"));
    }

    Ok(pending)
}

pub async fn login_callback(
    State(state): State<AppState>,
    session: Session,
    mut auth_session: CurrentSession,
    Query(params): Query<LoginCallbackQuery>,
) -> Response {
    let config = &state.config.auth;

    if let Some(provider_error) = params.error {
        warn!("Identity provider reported an error: {}", provider_error);
        return redirect_to_error(config, "access_denied");
    }

    let (Some(code), Some(state_param)) = (params.code, params.state) else {
        return redirect_to_error(config, "missing_code");
    };

    let pending = match take_pending_login(&session, &state_param, config).await {
        Ok(pending) => pending,
        Err(response) => return response,
    };

    let user = match state
        .identity_use_case
        .complete_login(code, pending.pkce_verifier)
        .await
    {
        Ok(user) => user,
        Err(AppError::ExternalServiceError { message }) => {
            return redirect_to_error(config, &message);
        }
        Err(e) => {
            error!("Failed to complete login: {}", e);
            return redirect_to_error(config, "auth_failed");
        }
    };

    let session_user = SessionUser::from(user);
    if let Err(e) = auth_session.login(&session_user).await {
        error!("Failed to log user into session: {}", e);
        return redirect_to_error(config, "login_failed");
    }

    info!(user_id = session_user.id, "Login successful");

    Redirect::to(&config.frontend_url).into_response()
}
