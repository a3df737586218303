use axum::{
    Router,
    routing::{get, post},
};
use axum_login::AuthManagerLayerBuilder;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::incoming::http_axum::{
    auth::backend::AuthBackend,
    handlers::{
        credits::get_credits,
        health::health_check,
        login::{login_callback, login_start},
        payments::payment_webhook,
        users::{delete_user, get_user_info},
        videos::{generate_video, list_videos},
    },
    router_ext::RouterExt,
};
use crate::shared::app_state::AppState;
use postflow_application::ports::outgoing::user_store::DynUserStorePort;

/// Builds every route; the session store is injected so tests can run on an
/// in-memory store.
pub fn build_application_router<S>(
    session_layer: SessionManagerLayer<S>,
    user_store: DynUserStorePort,
) -> Router<AppState>
where
    S: SessionStore + Clone,
{
    let auth_layer =
        AuthManagerLayerBuilder::new(AuthBackend::new(user_store), session_layer).build();

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/payment/webhook", post(payment_webhook));

    let login_routes = Router::new()
        .route("/login", get(login_start))
        .route("/login/callback", get(login_callback));

    let api_routes = Router::new()
        .route("/api/user/info", get(get_user_info))
        .route("/api/user/delete", post(delete_user))
        .route("/api/credits", get(get_credits))
        .route("/api/videos", get(list_videos))
        .route("/api/generate", post(generate_video))
        .with_required_login();

    public_routes
        .merge(login_routes.merge(api_routes).layer(auth_layer))
        .with_request_id()
}
