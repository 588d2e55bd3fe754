use actix_web::{App, HttpServer};
use anyhow::{anyhow, Context};
use tracing_actix_web::TracingLogger;

use ping_service::config::{Config, StorageBackend};
use ping_service::store::Stores;
use ping_service::{configure, telemetry, AppState};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    telemetry::init_tracing("info,ping_service=debug");

    let config = Config::from_env().map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    let stores = match config.storage {
        StorageBackend::Redis => {
            tracing::info!(redis = %redis_utils::redact_url(&config.redis_url), "Using Redis storage");
            let conn = redis_utils::connect(&config.redis_url)
                .await
                .context("Failed to connect to Redis")?;
            Stores::redis(conn)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; state is lost on restart");
            Stores::memory()
        }
    };

    let bind_address = config.bind_address();
    tracing::info!(
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window.as_secs(),
        "Starting HTTP server at {}",
        bind_address
    );

    let state = AppState::new(config, stores);

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(TracingLogger::default())
            .configure(move |cfg| configure(cfg, state))
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run()
    .await?;

    Ok(())
}
