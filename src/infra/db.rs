use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

/// Connect to Postgres and bring the `subscribers` schema up to date.
pub async fn init_db(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(|e| {
            anyhow::anyhow!("Postgres connection failed (check DATABASE_URL/password): {e}")
        })?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Subscriber migrations failed: {e}"))?;

    info!("Connected to subscriber database");
    Ok(pool)
}
