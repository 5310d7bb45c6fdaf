//! Blossom crowdfunding backend.
//!
//! Organizers register, open fundraises and get mailed when they close;
//! anyone can donate to an open fundraise without an account. The `view`
//! module is the fund detail page's client: form validation, view state and
//! the calls it makes against this API.

pub mod config;
pub mod database;
pub mod handlers;
pub mod jobs;
pub mod middleware;
pub mod models;
pub mod requests;
pub mod routes;
pub mod services;
pub mod utils;
pub mod view;

use actix_web::web;

use crate::database::connection::DbPool;
use crate::services::auth::AuthService;

/// Registers shared state and every route on an actix `App`.
pub fn configure(
    pool: web::Data<DbPool>,
    auth: web::Data<AuthService>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(pool)
            .app_data(auth)
            .app_data(utils::helpers::json_config())
            .configure(routes::api::scoped_config);
    }
}
