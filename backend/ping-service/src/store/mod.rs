//! Session and ping bookkeeping behind async traits.
//!
//! `RedisStore` is the production backend; `MemoryStore` mirrors its
//! semantics in process (with an exact set standing in for HyperLogLog).
mod memory;
mod redis_store;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

pub const SESSION_KEY_PREFIX: &str = "session:";
pub const RATE_LIMIT_KEY_PREFIX: &str = "rate_limit:";
pub const UNIQUE_USERS_KEY: &str = "ping_hyperloglog";
pub const LEADERBOARD_KEY: &str = "top_users";

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserScore {
    pub username: String,
    pub count: u64,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a session for `username` and return its id.
    async fn create_session(&self, username: &str, ttl: Duration) -> StoreResult<String>;

    /// Username owning the session, if it exists and has not expired.
    async fn session_user(&self, session_id: &str) -> StoreResult<Option<String>>;

    async fn delete_session(&self, session_id: &str) -> StoreResult<()>;
}

#[async_trait]
pub trait PingStore: Send + Sync {
    /// Atomically admit one request for `username` if fewer than `max`
    /// were admitted in the current window. Each admission restarts the window.
    async fn try_acquire(&self, username: &str, max: u32, window: Duration) -> StoreResult<bool>;

    /// Add `username` to the unique-user estimate and bump its leaderboard score.
    async fn record_ping(&self, username: &str) -> StoreResult<()>;

    async fn unique_users(&self) -> StoreResult<u64>;

    /// Highest scores first
    async fn top_users(&self, limit: usize) -> StoreResult<Vec<UserScore>>;
}

pub fn session_key(session_id: &str) -> String {
    format!("{}{}", SESSION_KEY_PREFIX, session_id)
}

pub fn rate_limit_key(username: &str) -> String {
    format!("{}{}", RATE_LIMIT_KEY_PREFIX, username)
}

/// Both stores behind trait objects
#[derive(Clone)]
pub struct Stores {
    pub sessions: Arc<dyn SessionStore>,
    pub pings: Arc<dyn PingStore>,
}

impl Stores {
    pub fn redis(conn: redis::aio::ConnectionManager) -> Self {
        let store = Arc::new(RedisStore::new(conn));
        Self {
            sessions: store.clone(),
            pings: store,
        }
    }

    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            sessions: store.clone(),
            pings: store,
        }
    }
}
