use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::Config;
use crate::error::{Error, Result};

pub async fn create_pool(config: &Config) -> Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| Error::Config("DATABASE_URL is required for postgres storage".to_string()))?;
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(url)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("database migrations applied");
    Ok(())
}
