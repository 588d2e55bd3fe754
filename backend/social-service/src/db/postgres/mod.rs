//! PostgreSQL repositories (sqlx)
mod comments;
mod follows;
mod likes;
mod posts;
mod users;

use async_trait::async_trait;
use sqlx::PgPool;

use super::{RepoResult, StoreHealth};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    async fn ping(&self) -> RepoResult<()> {
        db_pool::ping(&self.pool).await?;
        Ok(())
    }
}
