pub mod credits;
pub mod error;
pub mod media;
pub mod user;
