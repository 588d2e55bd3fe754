use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::db::{LikeRepository, RepoResult};
use crate::models::Like;

#[async_trait]
impl LikeRepository for PgStore {
    async fn toggle(&self, post_id: Uuid, user_id: Uuid) -> RepoResult<bool> {
        let removed = sqlx::query("DELETE FROM likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if removed > 0 {
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO likes (post_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (post_id, user_id) DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(true)
    }

    async fn count_by_post(&self, post_id: Uuid) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn list_by_post(&self, post_id: Uuid) -> RepoResult<Vec<Like>> {
        let likes = sqlx::query_as::<_, Like>(
            "SELECT id, post_id, user_id, created_at FROM likes \
             WHERE post_id = $1 ORDER BY created_at ASC, id",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(likes)
    }

    async fn list_by_posts(&self, post_ids: &[Uuid]) -> RepoResult<Vec<Like>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let likes = sqlx::query_as::<_, Like>(
            "SELECT id, post_id, user_id, created_at FROM likes \
             WHERE post_id = ANY($1) ORDER BY created_at ASC, id",
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(likes)
    }
}
