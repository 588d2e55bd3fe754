//! Storage seam for social-service.
//!
//! Each aggregate has an async repository trait. `PgStore` implements them on
//! PostgreSQL; `MemoryStore` implements them in process with the same
//! constraint behavior (unique keys, checks, cascading deletes) for tests and demos.
mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Comment, Like, NewPost, NewUser, Post, PostChanges, User, UserChanges};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub type RepoResult<T> = std::result::Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    /// A unique constraint rejected the write; carries the constraint name
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("check constraint violated: {0}")]
    CheckViolation(String),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_unique_violation() {
                return RepoError::UniqueViolation(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return RepoError::ForeignKeyViolation(constraint);
            }
            if db_err.is_check_violation() {
                return RepoError::CheckViolation(constraint);
            }
        }
        RepoError::Database(err)
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new_user: NewUser) -> RepoResult<User>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Apply a partial update. Returns `None` when the user does not exist.
    async fn update_profile(&self, id: Uuid, changes: UserChanges) -> RepoResult<Option<User>>;

    async fn set_profile_image(&self, id: Uuid, path: &str) -> RepoResult<Option<User>>;
}

#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Insert the edge. Returns false when it already existed.
    async fn follow(&self, follower_id: Uuid, following_id: Uuid) -> RepoResult<bool>;

    /// Remove the edge. Returns false when there was nothing to remove.
    async fn unfollow(&self, follower_id: Uuid, following_id: Uuid) -> RepoResult<bool>;

    /// Users following `user_id`, newest first, with the total count
    async fn followers(&self, user_id: Uuid, limit: i64, offset: i64)
        -> RepoResult<(Vec<User>, i64)>;

    /// Users `user_id` follows, newest first, with the total count
    async fn following(&self, user_id: Uuid, limit: i64, offset: i64)
        -> RepoResult<(Vec<User>, i64)>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, new_post: NewPost) -> RepoResult<Post>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Post>>;

    /// Newest first
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<Post>>;

    /// Update a post owned by `owner_id`. `None` if missing or owned by someone else.
    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: PostChanges,
    ) -> RepoResult<Option<Post>>;

    /// Delete a post owned by `owner_id`; comments and likes go with it.
    async fn delete(&self, id: Uuid, owner_id: Uuid) -> RepoResult<bool>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, post_id: Uuid, user_id: Uuid, content: &str) -> RepoResult<Comment>;

    /// Oldest first
    async fn list_by_post(&self, post_id: Uuid) -> RepoResult<Vec<Comment>>;

    async fn list_by_posts(&self, post_ids: &[Uuid]) -> RepoResult<Vec<Comment>>;

    async fn update(
        &self,
        comment_id: Uuid,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> RepoResult<Option<Comment>>;

    async fn delete(&self, comment_id: Uuid, post_id: Uuid, author_id: Uuid) -> RepoResult<bool>;
}

#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Flip the like state of (post, user). Returns true when the post is now liked.
    async fn toggle(&self, post_id: Uuid, user_id: Uuid) -> RepoResult<bool>;

    async fn count_by_post(&self, post_id: Uuid) -> RepoResult<i64>;

    async fn list_by_post(&self, post_id: Uuid) -> RepoResult<Vec<Like>>;

    async fn list_by_posts(&self, post_ids: &[Uuid]) -> RepoResult<Vec<Like>>;
}

/// Liveness of the backing store, used by `/readiness`.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> RepoResult<()>;
}

/// All repositories the services need, behind trait objects.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub follows: Arc<dyn FollowRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub likes: Arc<dyn LikeRepository>,
    pub health: Arc<dyn StoreHealth>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self::from_store(Arc::new(PgStore::new(pool)))
    }

    pub fn memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()))
    }

    fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository
            + FollowRepository
            + PostRepository
            + CommentRepository
            + LikeRepository
            + StoreHealth
            + 'static,
    {
        Self {
            users: store.clone(),
            follows: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            likes: store.clone(),
            health: store,
        }
    }
}
