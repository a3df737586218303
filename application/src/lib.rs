#[cfg(any(
    feature = "adapters",
    feature = "axum",
    feature = "sqlx",
    feature = "reqwest"
))]
compile_error!("application must not depend on adapters/framework crates");

pub mod auth;
pub mod credits;
pub mod error;
pub mod infrastructure_config;
pub mod payments;
pub mod ports;
pub mod users;
pub mod videos;

#[cfg(test)]
pub(crate) mod test_support;
