use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::db::{CommentRepository, RepoResult};
use crate::models::Comment;

const COMMENT_COLUMNS: &str = "id, post_id, user_id, content, created_at, updated_at";

#[async_trait]
impl CommentRepository for PgStore {
    async fn create(&self, post_id: Uuid, user_id: Uuid, content: &str) -> RepoResult<Comment> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "INSERT INTO comments (post_id, user_id, content) \
             VALUES ($1, $2, $3) \
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(post_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn list_by_post(&self, post_id: Uuid) -> RepoResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments \
             WHERE post_id = $1 ORDER BY created_at ASC, id"
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn list_by_posts(&self, post_ids: &[Uuid]) -> RepoResult<Vec<Comment>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments \
             WHERE post_id = ANY($1) ORDER BY created_at ASC, id"
        ))
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn update(
        &self,
        comment_id: Uuid,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> RepoResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "UPDATE comments SET content = $4, updated_at = NOW() \
             WHERE id = $1 AND post_id = $2 AND user_id = $3 \
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(comment_id)
        .bind(post_id)
        .bind(author_id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn delete(&self, comment_id: Uuid, post_id: Uuid, author_id: Uuid) -> RepoResult<bool> {
        let result =
            sqlx::query("DELETE FROM comments WHERE id = $1 AND post_id = $2 AND user_id = $3")
                .bind(comment_id)
                .bind(post_id)
                .bind(author_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
