use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::db::Repositories;
use crate::error::{AppError, Result};
use crate::models::{Pagination, User, UserChanges};

/// One page of a follower/following listing
#[derive(Debug, Serialize)]
pub struct FollowPage {
    pub users: Vec<User>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

pub struct UserService {
    repos: Repositories,
}

impl UserService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// The authenticated user. A token for a deleted account is rejected.
    pub async fn current_user(&self, user_id: Uuid) -> Result<User> {
        self.repos.users.find_by_id(user_id).await?.ok_or_else(|| {
            AppError::Unauthorized(
                "The user belonging to this token no longer exists".to_string(),
            )
        })
    }

    pub async fn update_profile(&self, user_id: Uuid, mut changes: UserChanges) -> Result<User> {
        changes.username = changes.username.map(|u| u.trim().to_string());
        changes.email = changes.email.map(|e| e.trim().to_lowercase());

        if changes.is_empty() {
            return self.current_user(user_id).await;
        }

        let user = self
            .repos
            .users
            .update_profile(user_id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        info!(user_id = %user_id, "profile updated");
        Ok(user)
    }

    pub async fn set_profile_image(&self, user_id: Uuid, path: &str) -> Result<User> {
        self.repos
            .users
            .set_profile_image(user_id, path)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn follow(&self, follower_id: Uuid, target_id: Uuid) -> Result<()> {
        if follower_id == target_id {
            return Err(AppError::BadRequest("You cannot follow yourself".to_string()));
        }
        self.require_user(target_id).await?;

        if !self.repos.follows.follow(follower_id, target_id).await? {
            return Err(AppError::BadRequest(
                "You are already following this user".to_string(),
            ));
        }

        info!(follower_id = %follower_id, following_id = %target_id, "user followed");
        Ok(())
    }

    pub async fn unfollow(&self, follower_id: Uuid, target_id: Uuid) -> Result<()> {
        self.require_user(target_id).await?;

        if !self.repos.follows.unfollow(follower_id, target_id).await? {
            return Err(AppError::BadRequest(
                "You are not following this user".to_string(),
            ));
        }

        info!(follower_id = %follower_id, following_id = %target_id, "user unfollowed");
        Ok(())
    }

    pub async fn followers(&self, user_id: Uuid, page: Pagination) -> Result<FollowPage> {
        self.require_user(user_id).await?;
        let (users, total) = self
            .repos
            .follows
            .followers(user_id, page.limit, page.offset())
            .await?;
        Ok(FollowPage {
            users,
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    pub async fn following(&self, user_id: Uuid, page: Pagination) -> Result<FollowPage> {
        self.require_user(user_id).await?;
        let (users, total) = self
            .repos
            .follows
            .following(user_id, page.limit, page.offset())
            .await?;
        Ok(FollowPage {
            users,
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    async fn require_user(&self, user_id: Uuid) -> Result<User> {
        self.repos
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewUser, PageQuery};

    async fn seed(repos: &Repositories, name: &str) -> User {
        repos
            .users
            .create(NewUser {
                username: name.to_string(),
                email: format!("{}@example.com", name),
                password_hash: "hash".to_string(),
                age: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_follow_edge_cases() {
        let repos = Repositories::memory();
        let service = UserService::new(repos.clone());
        let a = seed(&repos, "alice").await;
        let b = seed(&repos, "bob").await;

        // Self-follow
        assert!(matches!(
            service.follow(a.id, a.id).await,
            Err(AppError::BadRequest(_))
        ));
        // Missing target
        assert!(matches!(
            service.follow(a.id, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));

        service.follow(a.id, b.id).await.unwrap();
        assert!(matches!(
            service.follow(a.id, b.id).await,
            Err(AppError::BadRequest(_))
        ));

        let page = service.followers(b.id, PageQuery::default().into()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.users[0].id, a.id);

        let page = service.following(a.id, PageQuery::default().into()).await.unwrap();
        assert_eq!(page.users[0].id, b.id);

        service.unfollow(a.id, b.id).await.unwrap();
        assert!(matches!(
            service.unfollow(a.id, b.id).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_update_profile_conflict() {
        let repos = Repositories::memory();
        let service = UserService::new(repos.clone());
        let a = seed(&repos, "alice").await;
        seed(&repos, "bob").await;

        let err = service
            .update_profile(
                a.id,
                UserChanges {
                    username: Some("bob".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let updated = service
            .update_profile(
                a.id,
                UserChanges {
                    age: Some(41),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.age, Some(41));
        assert_eq!(updated.username, "alice");
    }

    #[tokio::test]
    async fn test_current_user_gone() {
        let service = UserService::new(Repositories::memory());
        assert!(matches!(
            service.current_user(Uuid::new_v4()).await,
            Err(AppError::Unauthorized(_))
        ));
    }
}
