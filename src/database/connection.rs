use std::sync::Arc;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::config::DatabaseSettings;
use crate::database::memory::MemoryStore;

/// Handle to the document store backing funds, donations and users.
///
/// Model functions take `&DbPool` and dispatch on the variant, so handlers
/// never care which backend is live.
#[derive(Clone)]
pub enum DbPool {
    Postgres(PgPool),
    Memory(Arc<MemoryStore>),
}

impl DbPool {
    pub fn in_memory() -> Self {
        DbPool::Memory(Arc::new(MemoryStore::default()))
    }

    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, sqlx::Error> {
        let Some(url) = settings.url.as_deref() else {
            warn!("No database url configured, falling back to the in-memory store");
            return Ok(Self::in_memory());
        };

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(url)
            .await?;
        info!("Connected to PostgreSQL");

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Migrations applied");

        Ok(DbPool::Postgres(pool))
    }
}
