use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::db::{FollowRepository, RepoResult};
use crate::models::User;

const JOINED_USER_COLUMNS: &str = "u.id, u.username, u.email, u.password_hash, u.age, u.role, \
                                   u.provider, u.profile_image, u.verified, u.created_at, \
                                   u.updated_at";

#[async_trait]
impl FollowRepository for PgStore {
    async fn follow(&self, follower_id: Uuid, following_id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_followers (follower_id, following_id)
            VALUES ($1, $2)
            ON CONFLICT (follower_id, following_id) DO NOTHING
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn unfollow(&self, follower_id: Uuid, following_id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query(
            "DELETE FROM user_followers WHERE follower_id = $1 AND following_id = $2",
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn followers(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> RepoResult<(Vec<User>, i64)> {
        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {JOINED_USER_COLUMNS}
            FROM user_followers f
            JOIN users u ON u.id = f.follower_id
            WHERE f.following_id = $1
            ORDER BY f.created_at DESC, u.id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM user_followers WHERE following_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((users, total))
    }

    async fn following(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> RepoResult<(Vec<User>, i64)> {
        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {JOINED_USER_COLUMNS}
            FROM user_followers f
            JOIN users u ON u.id = f.following_id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC, u.id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM user_followers WHERE follower_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((users, total))
    }
}
