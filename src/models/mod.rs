pub mod auth;
pub mod donation;
pub mod fund;
pub mod user;
