pub mod auth;
pub mod donations;
pub mod funds;
