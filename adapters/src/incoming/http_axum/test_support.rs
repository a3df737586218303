use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header},
};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use crate::incoming::http_axum::{
    auth::session::{SessionConfig, session_layer_with_store},
    routes::build_application_router,
};
use crate::shared::app_state::AppState;
use domain::media::{MediaAsset, MediaAssetId};
use domain::user::{NewUser, User, UserId};
use postflow_application::{
    error::{AppError, AppResult},
    infrastructure_config::Config,
    ports::{
        incoming::{
            auth::IdentityUseCase,
            credits::CreditsUseCase,
            payments::{PaymentNotification, PaymentOutcome, PaymentUseCase},
            users::UserUseCase,
            videos::VideoUseCase,
        },
        outgoing::{
            health_probe::HealthProbePort, identity_provider::AuthorizationRequest,
            user_store::UserStorePort,
        },
    },
};

pub const CSRF_STATE: &str = "csrf-token";
pub const GOOD_CODE: &str = "good-code";

#[derive(Default)]
struct FakeState {
    users: HashMap<i64, User>,
    balances: HashMap<i64, i64>,
    videos: Vec<MediaAsset>,
}

/// Stands in for every use case behind the router.
#[derive(Default)]
pub struct FakeApp {
    state: Mutex<FakeState>,
    database_down: AtomicBool,
}

impl FakeApp {
    pub fn with_user(email: &str, balance: i64) -> Arc<Self> {
        let app = Self::default();
        {
            let mut state = app.state.lock().unwrap();
            state.users.insert(
                1,
                User {
                    id: UserId(1),
                    external_id: "google-1".to_string(),
                    email: email.to_string(),
                    display_name: "Ada".to_string(),
                    avatar_url: "https://images.example.com/ada.png".to_string(),
                },
            );
            state.balances.insert(1, balance);
        }
        Arc::new(app)
    }

    pub fn set_database_down(&self) {
        self.database_down.store(true, Ordering::SeqCst);
    }

    pub fn balance(&self, id: i64) -> Option<i64> {
        self.state.lock().unwrap().balances.get(&id).copied()
    }
}

#[async_trait::async_trait]
impl UserStorePort for FakeApp {
    async fn find_user_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        Ok(self.state.lock().unwrap().users.get(&id.as_i64()).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_user_with_credits(
        &self,
        _new_user: &NewUser,
        _initial: i64,
    ) -> AppResult<User> {
        Err(AppError::InternalServerError)
    }

    async fn delete_user(&self, id: &UserId) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state.balances.remove(&id.as_i64());
        state.users.remove(&id.as_i64()).map(|_| ()).ok_or(AppError::NotFound {
            message: format!("User {} not found", id),
        })
    }
}

#[async_trait::async_trait]
impl IdentityUseCase for FakeApp {
    fn begin_login(&self) -> AppResult<AuthorizationRequest> {
        Ok(AuthorizationRequest {
            authorize_url: format!("https://accounts.example.com/auth?state={CSRF_STATE}"),
            csrf_state: CSRF_STATE.to_string(),
            pkce_verifier: "verifier".to_string(),
        })
    }

    async fn complete_login(&self, code: String, _pkce_verifier: String) -> AppResult<User> {
        if code != GOOD_CODE {
            return Err(AppError::ExternalServiceError {
                message: "token_exchange_failed".to_string(),
            });
        }
        self.find_user_by_id(&UserId(1))
            .await?
            .ok_or(AppError::InternalServerError)
    }
}

#[async_trait::async_trait]
impl UserUseCase for FakeApp {
    async fn get_user_info(&self, user_id: &UserId) -> AppResult<User> {
        self.find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                message: format!("User {} not found", user_id),
            })
    }

    async fn remove_user(&self, user_id: &UserId) -> AppResult<()> {
        self.delete_user(user_id).await
    }
}

#[async_trait::async_trait]
impl CreditsUseCase for FakeApp {
    async fn get_credits(&self, user_id: &UserId) -> AppResult<i64> {
        self.balance(user_id.as_i64())
            .ok_or(AppError::NoCreditsRecord { user_id: *user_id })
    }
}

#[async_trait::async_trait]
impl VideoUseCase for FakeApp {
    async fn get_videos(&self, user_id: &UserId) -> AppResult<Vec<MediaAsset>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .videos
            .iter()
            .filter(|v| v.owner == *user_id)
            .cloned()
            .collect())
    }

    async fn request_video(&self, user_id: &UserId, request_body: Bytes) -> AppResult<String> {
        if request_body.as_ref() == b"engine-down" {
            return Err(AppError::UpstreamError {
                message: "engine returned 502".to_string(),
            });
        }

        let mut state = self.state.lock().unwrap();
        let balance = state
            .balances
            .get_mut(&user_id.as_i64())
            .ok_or(AppError::NoCreditsRecord { user_id: *user_id })?;
        if *balance < 1 {
            return Err(AppError::InsufficientCredits {
                message: format!("Required 1 credits, but only {} available", balance),
            });
        }
        *balance -= 1;

        let id = state.videos.len() as i64 + 1;
        let url = format!("https://cdn.example.com/clip-{id}.mp4");
        state.videos.push(MediaAsset {
            id: MediaAssetId(id),
            owner: *user_id,
            filename: format!("clip-{id}"),
            content_type: "video/mp4".to_string(),
            url: url.clone(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        });
        Ok(url)
    }
}

#[async_trait::async_trait]
impl PaymentUseCase for FakeApp {
    async fn handle_payment(&self, notification: PaymentNotification) -> AppResult<PaymentOutcome> {
        if notification.product_id != "ehajql" {
            return Err(AppError::UnknownProduct {
                product_id: notification.product_id,
            });
        }
        if notification.price != "500" {
            return Err(AppError::UnknownPrice {
                price: notification.price,
            });
        }
        let user = self
            .find_user_by_email(&notification.email)
            .await?
            .ok_or(AppError::InternalServerError)?;
        let mut state = self.state.lock().unwrap();
        let balance = state.balances.entry(user.id.as_i64()).or_insert(0);
        *balance += 10;
        Ok(PaymentOutcome {
            user_id: user.id,
            credits_added: 10,
            new_balance: *balance,
        })
    }
}

#[async_trait::async_trait]
impl HealthProbePort for FakeApp {
    async fn ping(&self) -> AppResult<()> {
        if self.database_down.load(Ordering::SeqCst) {
            return Err(AppError::ServiceUnavailable);
        }
        Ok(())
    }
}

pub fn test_router(app: &Arc<FakeApp>) -> Router {
    let config = Arc::new(Config::default());
    let state = AppState::new(
        Arc::clone(&config),
        Arc::clone(app) as Arc<dyn IdentityUseCase>,
        Arc::clone(app) as Arc<dyn UserUseCase>,
        Arc::clone(app) as Arc<dyn CreditsUseCase>,
        Arc::clone(app) as Arc<dyn VideoUseCase>,
        Arc::clone(app) as Arc<dyn PaymentUseCase>,
        Arc::clone(app) as Arc<dyn HealthProbePort>,
    );
    let session_layer =
        session_layer_with_store(MemoryStore::default(), &SessionConfig::from(&config.auth));

    build_application_router(session_layer, Arc::clone(app) as Arc<dyn UserStorePort>)
        .with_state(state)
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(ToString::to_string)
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Walks the login redirect and callback and returns the logged-in cookie.
pub async fn log_in(router: &Router) -> String {
    let start = send(router, Request::get("/login").body(Body::empty()).unwrap()).await;
    let cookie = session_cookie(&start).unwrap();

    let callback = send(
        router,
        Request::get(format!("/login/callback?code={GOOD_CODE}&state={CSRF_STATE}"))
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(callback.status(), StatusCode::SEE_OTHER);

    session_cookie(&callback).unwrap_or(cookie)
}
