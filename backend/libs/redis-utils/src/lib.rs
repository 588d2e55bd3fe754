//! Redis connection helpers shared by Trellis services.

use anyhow::{bail, Context, Result};
use redis::aio::ConnectionManager;
use redis::{Client, IntoConnectionInfo};
use tokio::time::{timeout, Duration};
use tracing::info;

const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a connection manager for `redis_url` and make sure the server answers PING.
///
/// The manager reconnects on its own after startup; a failed PING here is
/// treated as fatal so misconfiguration surfaces before the HTTP server binds.
pub async fn connect(redis_url: &str) -> Result<ConnectionManager> {
    let info = redis_url
        .into_connection_info()
        .context("failed to parse REDIS_URL connection string")?;
    let addr = info.addr.to_string();

    let client = Client::open(info).context("failed to construct Redis client")?;
    let mut manager = ConnectionManager::new(client)
        .await
        .context("failed to initialize Redis connection manager")?;

    let pong: String = timeout(PING_TIMEOUT, redis::cmd("PING").query_async(&mut manager))
        .await
        .context("Redis PING timed out")?
        .context("Redis PING failed")?;

    if pong != "PONG" {
        bail!("unexpected PING response from Redis: {}", pong);
    }

    info!(%addr, "Connected to Redis");
    Ok(manager)
}

/// Render a Redis URL for logs without its password.
pub fn redact_url(redis_url: &str) -> String {
    match redis_url.split_once('@') {
        Some((scheme_and_auth, host)) => {
            let scheme = scheme_and_auth
                .split_once("://")
                .map(|(scheme, _)| scheme)
                .unwrap_or("redis");
            format!("{}://***@{}", scheme, host)
        }
        None => redis_url.to_string(),
    }
}
