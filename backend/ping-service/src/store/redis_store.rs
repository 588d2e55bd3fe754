use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::Script;
use uuid::Uuid;

use super::{
    rate_limit_key, session_key, PingStore, SessionStore, StoreResult, UserScore,
    LEADERBOARD_KEY, UNIQUE_USERS_KEY,
};

/// Check-and-increment in one round trip. Returns the new count, or -1 when
/// the caller is already at the limit. Every admission refreshes the TTL.
const RATE_LIMIT_LUA: &str = r#"
    local current = tonumber(redis.call('GET', KEYS[1]) or '0')
    if current >= tonumber(ARGV[1]) then
        return -1
    end
    current = redis.call('INCR', KEYS[1])
    redis.call('EXPIRE', KEYS[1], ARGV[2])
    return current
"#;

#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    rate_limit: Script,
}

impl RedisStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            conn,
            rate_limit: Script::new(RATE_LIMIT_LUA),
        }
    }
}

#[async_trait]
impl SessionStore for RedisStore {
    async fn create_session(&self, username: &str, ttl: Duration) -> StoreResult<String> {
        let mut conn = self.conn.clone();
        let session_id = Uuid::new_v4().simple().to_string();

        let _: () = redis::cmd("SET")
            .arg(session_key(&session_id))
            .arg(username)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await?;

        Ok(session_id)
    }

    async fn session_user(&self, session_id: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        let username: Option<String> = redis::cmd("GET")
            .arg(session_key(session_id))
            .query_async(&mut conn)
            .await?;
        Ok(username)
    }

    async fn delete_session(&self, session_id: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let _: i64 = redis::cmd("DEL")
            .arg(session_key(session_id))
            .query_async(&mut conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl PingStore for RedisStore {
    async fn try_acquire(&self, username: &str, max: u32, window: Duration) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let count: i64 = self
            .rate_limit
            .key(rate_limit_key(username))
            .arg(max)
            .arg(window.as_secs().max(1))
            .invoke_async(&mut conn)
            .await?;
        Ok(count > 0)
    }

    async fn record_ping(&self, username: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let _: (i64, f64) = redis::pipe()
            .atomic()
            .cmd("PFADD")
            .arg(UNIQUE_USERS_KEY)
            .arg(username)
            .cmd("ZINCRBY")
            .arg(LEADERBOARD_KEY)
            .arg(1)
            .arg(username)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn unique_users(&self) -> StoreResult<u64> {
        let mut conn = self.conn.clone();
        let count: u64 = redis::cmd("PFCOUNT")
            .arg(UNIQUE_USERS_KEY)
            .query_async(&mut conn)
            .await?;
        Ok(count)
    }

    async fn top_users(&self, limit: usize) -> StoreResult<Vec<UserScore>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut conn = self.conn.clone();
        let entries: Vec<(String, f64)> = redis::cmd("ZREVRANGE")
            .arg(LEADERBOARD_KEY)
            .arg(0)
            .arg(limit as isize - 1)
            .arg("WITHSCORES")
            .query_async(&mut conn)
            .await?;

        Ok(entries
            .into_iter()
            .map(|(username, score)| UserScore {
                username,
                count: score.max(0.0) as u64,
            })
            .collect())
    }
}
