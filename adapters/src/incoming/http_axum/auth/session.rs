use tower_sessions::{
    Expiry, SessionManagerLayer, SessionStore, cookie::SameSite, cookie::time::Duration,
};
use tower_sessions_redis_store::{RedisStore, fred::prelude::*};

use postflow_application::error::AppError;
use postflow_application::infrastructure_config::AuthConfig;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub secure: bool,
    pub same_site: SameSite,
    pub ttl_days: i64,
}

impl From<&AuthConfig> for SessionConfig {
    fn from(config: &AuthConfig) -> Self {
        // Cross-site cookies need SameSite=None, which browsers only accept
        // together with Secure.
        let same_site = if config.cookie_secure {
            SameSite::None
        } else {
            SameSite::Lax
        };

        Self {
            cookie_name: config.cookie_name.clone(),
            secure: config.cookie_secure,
            same_site,
            ttl_days: config.session_ttl_days,
        }
    }
}

pub fn session_layer_with_store<S>(
    store: S,
    session_config: &SessionConfig,
) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(session_config.cookie_name.clone())
        .with_same_site(session_config.same_site)
        .with_secure(session_config.secure)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::days(session_config.ttl_days)))
}

pub async fn create_session_layer(
    redis_url: &str,
    session_config: &SessionConfig,
) -> Result<SessionManagerLayer<RedisStore<Client>>, AppError> {
    let redis_config = Config::from_url(redis_url).map_err(|e| AppError::ConfigError {
        message: format!("Invalid redis_url: {e}"),
    })?;

    let redis_client = Client::new(redis_config, None, None, None);
    redis_client.connect();
    redis_client
        .wait_for_connect()
        .await
        .map_err(|e| AppError::ExternalServiceError {
            message: format!("Failed to connect to Redis: {e}"),
        })?;

    Ok(session_layer_with_store(RedisStore::new(redis_client), session_config))
}
