use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::bootstrap::state::AppState;
use postflow_adapters::incoming::http_axum::{
    auth::session::{SessionConfig, create_session_layer},
    routes::build_application_router,
};
use postflow_application::error::AppError;
use postflow_application::infrastructure_config::Config;

pub async fn create_router(state: AppState) -> Result<Router, AppError> {
    let cors_layer = create_cors_layer(&state.config);
    let session_layer = create_session_layer(
        &state.config.redis.redis_url,
        &SessionConfig::from(&state.config.auth),
    )
    .await?;

    let (adapters_state, user_store) = state.to_adapters_state();
    let application_router = build_application_router(session_layer, user_store);

    Ok(application_router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer),
        )
        .with_state(adapters_state))
}

fn create_cors_layer(config: &Config) -> CorsLayer {
    let base_cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static("x-requested-with"),
        ])
        .allow_credentials(true);

    let origin = config
        .server
        .cors_origin
        .as_deref()
        .unwrap_or(&config.auth.frontend_url);

    match origin.parse::<HeaderValue>() {
        Ok(origin) => base_cors.allow_origin(origin),
        Err(_) => base_cors.allow_origin(HeaderValue::from_static("http://localhost:5173")),
    }
}
