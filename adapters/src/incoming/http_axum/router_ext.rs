use axum::{Router, middleware};

use crate::incoming::http_axum::middleware::{
    request_id::request_id_middleware, require_auth::require_authenticated_user,
};

pub trait RouterExt<State> {
    fn with_request_id(self) -> Self;
    fn with_required_login(self) -> Self;
}

impl<State> RouterExt<State> for Router<State>
where
    State: Clone + Send + Sync + 'static,
{
    fn with_request_id(self) -> Self {
        self.layer(middleware::from_fn(request_id_middleware))
    }

    /// Must sit inside the auth manager layer so the session user is known.
    fn with_required_login(self) -> Self {
        self.layer(middleware::from_fn(require_authenticated_user))
    }
}
