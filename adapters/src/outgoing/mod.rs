pub mod generation_http;
pub mod identity_google;
pub mod postgres_sqlx;
