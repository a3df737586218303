use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
    basic::BasicClient,
};
use reqwest::redirect::Policy;
use serde::Deserialize;
use tracing::{error, info, instrument};
use url::ParseError;

use domain::user::IdentityProfile;
use postflow_application::{
    error::{AppError, AppResult},
    infrastructure_config::AuthConfig,
    ports::outgoing::identity_provider::{AuthorizationRequest, IdentityProviderPort},
};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://www.googleapis.com/oauth2/v4/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

type GoogleClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    email: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    picture: String,
}

impl From<GoogleUserInfo> for IdentityProfile {
    fn from(info: GoogleUserInfo) -> Self {
        Self {
            provider_user_id: info.sub,
            email: info.email,
            display_name: info.name,
            avatar_url: info.picture,
        }
    }
}

/// Endpoints of the provider; Google's unless overridden.
#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        }
    }
}

pub struct GoogleIdentityProvider {
    client: GoogleClient,
    http_client: reqwest::Client,
    userinfo_url: String,
}

impl GoogleIdentityProvider {
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        Self::with_endpoints(config, GoogleEndpoints::default())
    }

    pub fn with_endpoints(config: &AuthConfig, endpoints: GoogleEndpoints) -> AppResult<Self> {
        let config_error = |what: &str, e: ParseError| AppError::ConfigError {
            message: format!("Invalid OAuth {what}: {e}"),
        };

        let client = BasicClient::new(ClientId::new(
            config.google_client_id.clone().unwrap_or_default(),
        ))
        .set_client_secret(ClientSecret::new(config.google_client_secret().to_string()))
        .set_auth_uri(AuthUrl::new(endpoints.auth_url).map_err(|e| config_error("auth url", e))?)
        .set_token_uri(
            TokenUrl::new(endpoints.token_url).map_err(|e| config_error("token url", e))?,
        )
        .set_redirect_uri(
            RedirectUrl::new(config.redirect_url()).map_err(|e| config_error("redirect url", e))?,
        );

        // The token endpoint must not be allowed to redirect the code exchange.
        let http_client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()
            .map_err(|e| AppError::ConfigError {
                message: format!("Failed to build OAuth HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            http_client,
            userinfo_url: endpoints.userinfo_url,
        })
    }

    async fn fetch_user_info(&self, access_token: &str) -> AppResult<GoogleUserInfo> {
        let response = self
            .http_client
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to fetch user info: {}", e);
                AppError::ExternalServiceError {
                    message: "userinfo_fetch_failed".to_string(),
                }
            })?;

        if !response.status().is_success() {
            error!("Identity provider returned error: {}", response.status());
            return Err(AppError::ExternalServiceError {
                message: "userinfo_api_error".to_string(),
            });
        }

        response.json().await.map_err(|e| {
            error!("Failed to parse user info: {}", e);
            AppError::ExternalServiceError {
                message: "userinfo_parse_failed".to_string(),
            }
        })
    }
}

#[async_trait::async_trait]
impl IdentityProviderPort for GoogleIdentityProvider {
    fn authorization_request(&self) -> AppResult<AuthorizationRequest> {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (authorize_url, csrf_state) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("openid".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .set_pkce_challenge(pkce_challenge)
            .url();

        Ok(AuthorizationRequest {
            authorize_url: authorize_url.to_string(),
            csrf_state: csrf_state.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
        })
    }

    #[instrument(skip_all)]
    async fn exchange_code(&self, code: &str, pkce_verifier: &str) -> AppResult<IdentityProfile> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| {
                error!("Failed to exchange authorization code: {}", e);
                AppError::ExternalServiceError {
                    message: "token_exchange_failed".to_string(),
                }
            })?;

        let user_info = self.fetch_user_info(token.access_token().secret()).await?;
        info!("Identity provider returned profile for {}", user_info.email);

        Ok(user_info.into())
    }
}
