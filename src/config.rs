use anyhow::Context;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .password(&self.password)
    }
}

// Hand-written so the password never ends up in a log line.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("max_connections", &self.max_connections)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source, falling back to
    /// the documented defaults for anything unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.into());

        let database = DatabaseConfig {
            host: var("POSTGRES_HOST", "127.0.0.1"),
            port: var("POSTGRES_PORT", "5431")
                .parse()
                .context("POSTGRES_PORT must be a port number")?,
            name: var("POSTGRES_DB", "classifieds"),
            user: var("POSTGRES_USER", "postgres"),
            password: var("POSTGRES_PASSWORD", "postgres"),
            max_connections: var("POSTGRES_MAX_CONNECTIONS", "10")
                .parse()
                .context("POSTGRES_MAX_CONNECTIONS must be a positive integer")?,
        };

        Ok(Self {
            database,
            host: var("APP_HOST", "0.0.0.0"),
            port: var("APP_PORT", "8080")
                .parse()
                .context("APP_PORT must be a port number")?,
        })
    }
}
