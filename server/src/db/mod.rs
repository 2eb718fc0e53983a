//! Database pool setup.
//!
//! The pool is built once at startup and migrations run to completion
//! before the router binds, so handlers never observe a partially
//! migrated schema.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

const DEFAULT_POOL_SIZE: u32 = 5;

fn pool_size() -> u32 {
    std::env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(DEFAULT_POOL_SIZE)
}

/// Connect to Postgres and bring the schema up to date.
///
/// # Errors
///
/// Fails when the database is unreachable or a migration cannot apply.
pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(pool_size())
        .connect(database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;

    Ok(pool)
}
