use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::db::{PostRepository, RepoResult};
use crate::models::{NewPost, Post, PostChanges};

const POST_COLUMNS: &str = "id, title, content, image, user_id, created_at, updated_at";

#[async_trait]
impl PostRepository for PgStore {
    async fn create(&self, new_post: NewPost) -> RepoResult<Post> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "INSERT INTO posts (title, content, image, user_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(&new_post.title)
        .bind(&new_post.content)
        .bind(&new_post.image)
        .bind(new_post.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts \
             ORDER BY created_at DESC, id \
             LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: PostChanges,
    ) -> RepoResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
            SET title = COALESCE($3, title),
                content = COALESCE($4, content),
                image = COALESCE($5, image),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .bind(changes.title)
        .bind(changes.content)
        .bind(changes.image)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
