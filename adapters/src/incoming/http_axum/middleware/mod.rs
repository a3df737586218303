pub mod request_id;
pub mod require_auth;
