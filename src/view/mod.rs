//! Fund detail page: donation form, immutable page state and the API client
//! it drives.

pub mod client;
pub mod controller;
pub mod form;
pub mod state;
