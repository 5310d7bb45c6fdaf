use config::{Config, ConfigError, Environment, Map};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// PostgreSQL connection string. Without one the in-memory store is used.
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSettings {
    pub close_funds_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub scheduler: SchedulerSettings,
}

impl Settings {
    /// Defaults overlaid by `BLOSSOM__SECTION__KEY` environment variables,
    /// e.g. `BLOSSOM__SERVER__PORT=8080`. `BLOSSOM__AUTH__JWT_SECRET` has no
    /// default and must be set.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_env(None)
    }

    /// Same as [`Settings::load`], reading variables from `vars` instead of
    /// the process environment when given.
    pub fn from_env(vars: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default(
                "server.allowed_origins",
                vec!["http://localhost:3000".to_string()],
            )?
            .set_default("database.max_connections", 5)?
            .set_default("auth.token_ttl_hours", 24)?
            .set_default("scheduler.close_funds_interval_secs", 3600)?
            .add_source(
                Environment::with_prefix("BLOSSOM")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true)
                    .source(vars),
            )
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
