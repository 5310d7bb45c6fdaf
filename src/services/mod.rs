pub mod auth;
pub mod donation;
pub mod email;
