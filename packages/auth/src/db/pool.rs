//! PostgreSQL connection pool and migrations.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::error::AuthError;

/// Open a connection pool for `database_url`.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Open a connection pool using the `DATABASE_URL` environment variable.
pub async fn connect_from_env() -> Result<PgPool, AuthError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| AuthError::Configuration("DATABASE_URL not set".into()))?;

    connect(&database_url)
        .await
        .map_err(|e| AuthError::Persistence(format!("failed to connect to database: {e}")))
}

/// Run the embedded migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
