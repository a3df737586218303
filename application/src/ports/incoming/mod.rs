pub mod auth;
pub mod credits;
pub mod payments;
pub mod users;
pub mod videos;
