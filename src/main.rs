use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, middleware::Logger, web};
use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use blossom::config::Settings;
use blossom::database::connection::DbPool;
use blossom::jobs::close_funds;
use blossom::services::{auth::AuthService, email::EmailService};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load().context("failed to load configuration")?;

    let pool = DbPool::connect(&settings.database)
        .await
        .context("failed to connect to the database")?;

    let mailer = match EmailService::from_env() {
        Ok(service) => Some(Arc::new(service)),
        Err(e) => {
            warn!("Email disabled: {}", e);
            None
        }
    };
    close_funds::spawn(
        pool.clone(),
        Duration::from_secs(settings.scheduler.close_funds_interval_secs),
        mailer,
    );

    let pool = web::Data::new(pool);
    let auth = web::Data::new(AuthService::new(&settings.auth));
    let origins = settings.server.allowed_origins.clone();
    let address = settings.bind_address();

    info!("Server is running on {}", address);

    HttpServer::new(move || {
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .configure(blossom::configure(pool.clone(), auth.clone()))
    })
    .bind(&address)
    .with_context(|| format!("failed to bind {}", address))?
    .run()
    .await?;

    Ok(())
}
