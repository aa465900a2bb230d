//! Database layer: connection settings, pool construction, liveness check,
//! startup schema initialization, models, and repositories.

pub mod init;
pub mod models;
pub mod repositories;

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub type DbPool = sqlx::PgPool;

/// Connection settings for the Postgres store.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Budget for acquiring a connection, in seconds.
    pub connect_timeout_secs: u64,
}

impl DbConfig {
    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
    }
}

/// Create a connection pool from the given settings.
///
/// The pool connects lazily: an unreachable database is not an error here,
/// it surfaces on first use so the startup initializer owns the retry.
pub fn create_pool(config: &DbConfig) -> DbPool {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect_lazy_with(config.connect_options())
}

/// Round-trip liveness check. Does not validate schema presence.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
