use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::config::DbConfig;

/// Opens the bounded pool. Callers past `max_connections` wait up to
/// `acquire_timeout` and then fail with `PoolTimedOut`.
pub async fn connect(cfg: &DbConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(cfg.acquire_timeout())
        .connect(&cfg.url)
        .await
        .context("connect to database")?;

    let mut conn = db.acquire().await.context("acquire connection")?;
    let (version,): (String,) = sqlx::query_as("SELECT version()")
        .fetch_one(&mut *conn)
        .await
        .context("query server version")?;
    drop(conn);
    info!(%version, max_connections = cfg.max_connections, "database connected");

    Ok(db)
}

/// Applies the embedded `./migrations`. Any failure here is a database
/// error, so startup stops.
pub async fn migrate(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    info!("migrations applied");
    Ok(())
}
