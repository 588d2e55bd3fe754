use std::collections::HashMap;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::db::Repositories;
use crate::error::{AppError, Result};
use crate::models::{Comment, Like, NewPost, Pagination, Post, PostChanges, PostWithRelations};

/// Like state after a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeState {
    pub liked: bool,
    pub likes: i64,
}

pub struct PostService {
    repos: Repositories,
}

fn post_not_found() -> AppError {
    AppError::NotFound("No post with that ID exists".to_string())
}

fn comment_not_found() -> AppError {
    AppError::NotFound("No comment with that ID exists".to_string())
}

impl PostService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn create_post(
        &self,
        user_id: Uuid,
        title: &str,
        content: &str,
        image: Option<String>,
    ) -> Result<Post> {
        let post = self
            .repos
            .posts
            .create(NewPost {
                title: title.trim().to_string(),
                content: content.to_string(),
                image,
                user_id,
            })
            .await?;

        info!(post_id = %post.id, user_id = %user_id, "post created");
        Ok(post)
    }

    /// Newest posts first, each with its comments and likes.
    pub async fn list_posts(&self, page: Pagination) -> Result<Vec<PostWithRelations>> {
        let posts = self.repos.posts.list(page.limit, page.offset()).await?;
        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();

        let mut comments: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for comment in self.repos.comments.list_by_posts(&ids).await? {
            comments.entry(comment.post_id).or_default().push(comment);
        }
        let mut likes: HashMap<Uuid, Vec<Like>> = HashMap::new();
        for like in self.repos.likes.list_by_posts(&ids).await? {
            likes.entry(like.post_id).or_default().push(like);
        }

        Ok(posts
            .into_iter()
            .map(|post| PostWithRelations {
                comments: comments.remove(&post.id).unwrap_or_default(),
                likes: likes.remove(&post.id).unwrap_or_default(),
                post,
            })
            .collect())
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<PostWithRelations> {
        let post = self.require_post(post_id).await?;
        let comments = self.repos.comments.list_by_post(post_id).await?;
        let likes = self.repos.likes.list_by_post(post_id).await?;
        Ok(PostWithRelations {
            post,
            comments,
            likes,
        })
    }

    /// Only the author may update; anyone else sees 404.
    pub async fn update_post(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        mut changes: PostChanges,
    ) -> Result<Post> {
        changes.title = changes.title.map(|t| t.trim().to_string());

        let post = self
            .repos
            .posts
            .update(post_id, user_id, changes)
            .await?
            .ok_or_else(post_not_found)?;

        info!(post_id = %post_id, user_id = %user_id, "post updated");
        Ok(post)
    }

    pub async fn delete_post(&self, post_id: Uuid, user_id: Uuid) -> Result<()> {
        if !self.repos.posts.delete(post_id, user_id).await? {
            return Err(post_not_found());
        }
        info!(post_id = %post_id, user_id = %user_id, "post deleted");
        Ok(())
    }

    pub async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<LikeState> {
        self.require_post(post_id).await?;
        let liked = self.repos.likes.toggle(post_id, user_id).await?;
        let likes = self.repos.likes.count_by_post(post_id).await?;
        Ok(LikeState { liked, likes })
    }

    pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        self.require_post(post_id).await?;
        Ok(self.repos.comments.list_by_post(post_id).await?)
    }

    pub async fn add_comment(&self, post_id: Uuid, user_id: Uuid, content: &str) -> Result<Comment> {
        self.require_post(post_id).await?;
        let comment = self.repos.comments.create(post_id, user_id, content).await?;
        info!(post_id = %post_id, comment_id = %comment.id, "comment added");
        Ok(comment)
    }

    pub async fn update_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<Comment> {
        self.repos
            .comments
            .update(comment_id, post_id, user_id, content)
            .await?
            .ok_or_else(comment_not_found)
    }

    pub async fn delete_comment(&self, post_id: Uuid, comment_id: Uuid, user_id: Uuid) -> Result<()> {
        if !self.repos.comments.delete(comment_id, post_id, user_id).await? {
            return Err(comment_not_found());
        }
        Ok(())
    }

    async fn require_post(&self, post_id: Uuid) -> Result<Post> {
        self.repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(post_not_found)
    }
}
