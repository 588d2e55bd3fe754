use actix_cors::Cors;
use actix_web::{App, HttpServer};
use anyhow::{anyhow, Context};
use db_pool::{create_pool, DbConfig};
use tracing_actix_web::TracingLogger;

use social_service::config::{Config, StorageBackend};
use social_service::db::{Repositories, MIGRATOR};
use social_service::security::JwtKeys;
use social_service::services::ImageStore;
use social_service::{configure, telemetry, AppState};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing("info,social_service=debug,sqlx=warn");

    let config = Config::from_env().map_err(|e| anyhow!("Invalid configuration: {}", e))?;
    tracing::info!(env = %config.app.env, storage = ?config.storage, "Starting social-service");

    let repos = match config.storage {
        StorageBackend::Postgres => {
            let db_config = DbConfig::new("social-service", &config.database.url)
                .with_max_connections(config.database.max_connections);
            let pool = create_pool(db_config)
                .await
                .context("Failed to create database pool")?;

            if config.database.run_migrations {
                MIGRATOR
                    .run(&pool)
                    .await
                    .context("Failed to run database migrations")?;
                tracing::info!("Database migrations applied");
            }

            Repositories::postgres(pool)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Repositories::memory()
        }
    };

    tokio::fs::create_dir_all(&config.uploads.dir)
        .await
        .with_context(|| format!("Failed to create {}", config.uploads.dir.display()))?;

    let state = AppState::new(
        repos,
        JwtKeys::new(&config.auth.jwt_secret, config.auth.jwt_expires_in_minutes),
        ImageStore::new(config.uploads.dir.clone(), config.uploads.max_bytes),
    );

    let bind_address = config.bind_address();
    let allowed_origins = config.cors.allowed_origins.clone();
    tracing::info!("Starting HTTP server at {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(TracingLogger::default())
            .configure(|cfg| configure(cfg, &state))
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run()
    .await?;

    tracing::info!("social-service stopped");
    Ok(())
}
