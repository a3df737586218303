pub mod credits;
pub mod health;
pub mod login;
pub mod payments;
pub mod users;
pub mod videos;
