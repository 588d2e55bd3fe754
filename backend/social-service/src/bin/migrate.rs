//! Apply the embedded schema migrations to `DATABASE_URL` and exit.
use anyhow::Context;
use db_pool::{create_pool, DbConfig};
use social_service::{db::MIGRATOR, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing("info,sqlx=warn");

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let db_config = DbConfig::new("social-service-migrate", &database_url).with_max_connections(1);
    let pool = create_pool(db_config)
        .await
        .context("Failed to connect to database")?;

    MIGRATOR.run(&pool).await.context("Migration failed")?;

    let applied = MIGRATOR.iter().count();
    tracing::info!(migrations = applied, "Migration complete");
    pool.close().await;
    Ok(())
}
