//! Database connection pool construction
//!
//! Uses sqlx PgPool with explicit connection limits. The pool connects
//! eagerly, so an unreachable database fails here instead of on the
//! first query.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DbConfig;

/// Create a PostgreSQL connection pool and verify one connection.
///
/// # Errors
///
/// Returns an error if the connection fails or does not complete within
/// `config.connect_timeout`.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&DbConfig::new("postgres://localhost/evently")).await?;
/// ```
pub async fn create_pool(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
        .test_before_acquire(true)
        .connect(&config.database_url)
        .await
}
