use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use super::{PingStore, SessionStore, StoreResult, UserScore};

#[derive(Default)]
struct State {
    sessions: HashMap<String, (String, Instant)>,
    rate_limits: HashMap<String, (u32, Instant)>,
    unique_users: HashSet<String>,
    scores: HashMap<String, u64>,
}

/// In-process store with the same expiry and ordering rules as Redis
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(&self, username: &str, ttl: Duration) -> StoreResult<String> {
        let session_id = Uuid::new_v4().simple().to_string();
        let mut state = self.state.lock().await;
        state
            .sessions
            .insert(session_id.clone(), (username.to_string(), Instant::now() + ttl));
        Ok(session_id)
    }

    async fn session_user(&self, session_id: &str) -> StoreResult<Option<String>> {
        let mut state = self.state.lock().await;
        match state.sessions.get(session_id) {
            Some((username, expires_at)) if *expires_at > Instant::now() => {
                Ok(Some(username.clone()))
            }
            Some(_) => {
                state.sessions.remove(session_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete_session(&self, session_id: &str) -> StoreResult<()> {
        self.state.lock().await.sessions.remove(session_id);
        Ok(())
    }
}

#[async_trait]
impl PingStore for MemoryStore {
    async fn try_acquire(&self, username: &str, max: u32, window: Duration) -> StoreResult<bool> {
        let now = Instant::now();
        let mut state = self.state.lock().await;
        let entry = state
            .rate_limits
            .entry(username.to_string())
            .or_insert((0, now));

        if entry.1 <= now {
            entry.0 = 0;
        }
        if entry.0 >= max {
            return Ok(false);
        }

        entry.0 += 1;
        entry.1 = now + window;
        Ok(true)
    }

    async fn record_ping(&self, username: &str) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        state.unique_users.insert(username.to_string());
        *state.scores.entry(username.to_string()).or_insert(0) += 1;
        Ok(())
    }

    async fn unique_users(&self) -> StoreResult<u64> {
        Ok(self.state.lock().await.unique_users.len() as u64)
    }

    async fn top_users(&self, limit: usize) -> StoreResult<Vec<UserScore>> {
        let state = self.state.lock().await;
        let mut scores: Vec<UserScore> = state
            .scores
            .iter()
            .map(|(username, count)| UserScore {
                username: username.clone(),
                count: *count,
            })
            .collect();
        // ZREVRANGE breaks score ties by member, descending
        scores.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| b.username.cmp(&a.username)));
        scores.truncate(limit);
        Ok(scores)
    }
}
