//! In-process repositories with the same constraint behavior as the schema.
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    CommentRepository, FollowRepository, LikeRepository, PostRepository, RepoError, RepoResult,
    StoreHealth, UserRepository,
};
use crate::models::{Comment, Like, NewPost, NewUser, Post, PostChanges, User, UserChanges};

#[derive(Debug, Clone)]
struct FollowEdge {
    follower_id: Uuid,
    following_id: Uuid,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    follows: Vec<FollowEdge>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    likes: HashMap<Uuid, Like>,
}

impl State {
    fn username_taken(&self, username: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id) != except)
    }

    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn title_taken(&self, title: &str, except: Option<Uuid>) -> bool {
        self.posts
            .values()
            .any(|p| p.title == title && Some(p.id) != except)
    }

    fn require_user(&self, id: Uuid, constraint: &str) -> RepoResult<()> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(RepoError::ForeignKeyViolation(constraint.to_string()))
        }
    }

    fn require_post(&self, id: Uuid, constraint: &str) -> RepoResult<()> {
        if self.posts.contains_key(&id) {
            Ok(())
        } else {
            Err(RepoError::ForeignKeyViolation(constraint.to_string()))
        }
    }

    fn page_of_users(
        &self,
        mut ids: Vec<(Uuid, DateTime<Utc>)>,
        limit: i64,
        offset: i64,
    ) -> (Vec<User>, i64) {
        let total = ids.len() as i64;
        ids.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let users = ids
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .filter_map(|(id, _)| self.users.get(&id).cloned())
            .collect();
        (users, total)
    }
}

/// Repository set held entirely in memory
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn oldest_first<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> (DateTime<Utc>, Uuid),
{
    items.sort_by_key(|item| key(item));
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: NewUser) -> RepoResult<User> {
        let mut state = self.state.write().await;
        if state.username_taken(&new_user.username, None) {
            return Err(RepoError::UniqueViolation("users_username_key".to_string()));
        }
        if state.email_taken(&new_user.email, None) {
            return Err(RepoError::UniqueViolation("users_email_key".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            age: new_user.age,
            role: "user".to_string(),
            provider: "local".to_string(),
            profile_image: None,
            verified: false,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn update_profile(&self, id: Uuid, changes: UserChanges) -> RepoResult<Option<User>> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&id) {
            return Ok(None);
        }
        if let Some(username) = &changes.username {
            if state.username_taken(username, Some(id)) {
                return Err(RepoError::UniqueViolation("users_username_key".to_string()));
            }
        }
        if let Some(email) = &changes.email {
            if state.email_taken(email, Some(id)) {
                return Err(RepoError::UniqueViolation("users_email_key".to_string()));
            }
        }

        let Some(user) = state.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(age) = changes.age {
            user.age = Some(age);
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn set_profile_image(&self, id: Uuid, path: &str) -> RepoResult<Option<User>> {
        let mut state = self.state.write().await;
        Ok(state.users.get_mut(&id).map(|user| {
            user.profile_image = Some(path.to_string());
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

#[async_trait]
impl FollowRepository for MemoryStore {
    async fn follow(&self, follower_id: Uuid, following_id: Uuid) -> RepoResult<bool> {
        if follower_id == following_id {
            return Err(RepoError::CheckViolation(
                "user_followers_no_self_follow".to_string(),
            ));
        }

        let mut state = self.state.write().await;
        state.require_user(follower_id, "user_followers_follower_id_fkey")?;
        state.require_user(following_id, "user_followers_following_id_fkey")?;

        let exists = state
            .follows
            .iter()
            .any(|e| e.follower_id == follower_id && e.following_id == following_id);
        if exists {
            return Ok(false);
        }

        state.follows.push(FollowEdge {
            follower_id,
            following_id,
            created_at: Utc::now(),
        });
        Ok(true)
    }

    async fn unfollow(&self, follower_id: Uuid, following_id: Uuid) -> RepoResult<bool> {
        let mut state = self.state.write().await;
        let before = state.follows.len();
        state
            .follows
            .retain(|e| !(e.follower_id == follower_id && e.following_id == following_id));
        Ok(state.follows.len() < before)
    }

    async fn followers(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> RepoResult<(Vec<User>, i64)> {
        let state = self.state.read().await;
        let ids = state
            .follows
            .iter()
            .filter(|e| e.following_id == user_id)
            .map(|e| (e.follower_id, e.created_at))
            .collect();
        Ok(state.page_of_users(ids, limit, offset))
    }

    async fn following(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> RepoResult<(Vec<User>, i64)> {
        let state = self.state.read().await;
        let ids = state
            .follows
            .iter()
            .filter(|e| e.follower_id == user_id)
            .map(|e| (e.following_id, e.created_at))
            .collect();
        Ok(state.page_of_users(ids, limit, offset))
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create(&self, new_post: NewPost) -> RepoResult<Post> {
        let mut state = self.state.write().await;
        state.require_user(new_post.user_id, "posts_user_id_fkey")?;
        if state.title_taken(&new_post.title, None) {
            return Err(RepoError::UniqueViolation("posts_title_key".to_string()));
        }

        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            title: new_post.title,
            content: new_post.content,
            image: new_post.image,
            user_id: new_post.user_id,
            created_at: now,
            updated_at: now,
        };
        state.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Post>> {
        Ok(self.state.read().await.posts.get(&id).cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<Post>> {
        let state = self.state.read().await;
        let mut posts: Vec<Post> = state.posts.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(posts
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: PostChanges,
    ) -> RepoResult<Option<Post>> {
        let mut state = self.state.write().await;
        match state.posts.get(&id) {
            Some(post) if post.user_id == owner_id => {}
            _ => return Ok(None),
        }
        if let Some(title) = &changes.title {
            if state.title_taken(title, Some(id)) {
                return Err(RepoError::UniqueViolation("posts_title_key".to_string()));
            }
        }

        let Some(post) = state.posts.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        if let Some(image) = changes.image {
            post.image = Some(image);
        }
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> RepoResult<bool> {
        let mut state = self.state.write().await;
        match state.posts.get(&id) {
            Some(post) if post.user_id == owner_id => {}
            _ => return Ok(false),
        }

        state.posts.remove(&id);
        state.comments.retain(|_, c| c.post_id != id);
        state.likes.retain(|_, l| l.post_id != id);
        Ok(true)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, post_id: Uuid, user_id: Uuid, content: &str) -> RepoResult<Comment> {
        let mut state = self.state.write().await;
        state.require_post(post_id, "comments_post_id_fkey")?;
        state.require_user(user_id, "comments_user_id_fkey")?;

        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn list_by_post(&self, post_id: Uuid) -> RepoResult<Vec<Comment>> {
        CommentRepository::list_by_posts(self, &[post_id]).await
    }

    async fn list_by_posts(&self, post_ids: &[Uuid]) -> RepoResult<Vec<Comment>> {
        let state = self.state.read().await;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| post_ids.contains(&c.post_id))
            .cloned()
            .collect();
        oldest_first(&mut comments, |c| (c.created_at, c.id));
        Ok(comments)
    }

    async fn update(
        &self,
        comment_id: Uuid,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> RepoResult<Option<Comment>> {
        let mut state = self.state.write().await;
        Ok(state
            .comments
            .get_mut(&comment_id)
            .filter(|c| c.post_id == post_id && c.user_id == author_id)
            .map(|comment| {
                comment.content = content.to_string();
                comment.updated_at = Utc::now();
                comment.clone()
            }))
    }

    async fn delete(&self, comment_id: Uuid, post_id: Uuid, author_id: Uuid) -> RepoResult<bool> {
        let mut state = self.state.write().await;
        let owned = state
            .comments
            .get(&comment_id)
            .is_some_and(|c| c.post_id == post_id && c.user_id == author_id);
        if owned {
            state.comments.remove(&comment_id);
        }
        Ok(owned)
    }
}

#[async_trait]
impl LikeRepository for MemoryStore {
    async fn toggle(&self, post_id: Uuid, user_id: Uuid) -> RepoResult<bool> {
        let mut state = self.state.write().await;
        let existing = state
            .likes
            .values()
            .find(|l| l.post_id == post_id && l.user_id == user_id)
            .map(|l| l.id);

        if let Some(id) = existing {
            state.likes.remove(&id);
            return Ok(false);
        }

        state.require_post(post_id, "likes_post_id_fkey")?;
        state.require_user(user_id, "likes_user_id_fkey")?;
        let like = Like {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            created_at: Utc::now(),
        };
        state.likes.insert(like.id, like);
        Ok(true)
    }

    async fn count_by_post(&self, post_id: Uuid) -> RepoResult<i64> {
        let state = self.state.read().await;
        Ok(state.likes.values().filter(|l| l.post_id == post_id).count() as i64)
    }

    async fn list_by_post(&self, post_id: Uuid) -> RepoResult<Vec<Like>> {
        LikeRepository::list_by_posts(self, &[post_id]).await
    }

    async fn list_by_posts(&self, post_ids: &[Uuid]) -> RepoResult<Vec<Like>> {
        let state = self.state.read().await;
        let mut likes: Vec<Like> = state
            .likes
            .values()
            .filter(|l| post_ids.contains(&l.post_id))
            .cloned()
            .collect();
        oldest_first(&mut likes, |l| (l.created_at, l.id));
        Ok(likes)
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            email: format!("{}@example.com", name),
            password_hash: "hash".to_string(),
            age: Some(30),
        }
    }

    fn new_post(title: &str, user_id: Uuid) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: "body".to_string(),
            image: None,
            user_id,
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email() {
        let store = MemoryStore::new();
        UserRepository::create(&store, new_user("alice")).await.unwrap();

        let same_name = UserRepository::create(&store, NewUser {
            email: "other@example.com".to_string(),
            ..new_user("alice")
        })
        .await;
        assert!(matches!(same_name, Err(RepoError::UniqueViolation(c)) if c == "users_username_key"));

        let same_email = UserRepository::create(&store, NewUser {
            username: "alice2".to_string(),
            ..new_user("alice")
        })
        .await;
        assert!(matches!(same_email, Err(RepoError::UniqueViolation(c)) if c == "users_email_key"));
    }

    #[tokio::test]
    async fn test_self_follow_violates_check() {
        let store = MemoryStore::new();
        let user = UserRepository::create(&store, new_user("carol")).await.unwrap();

        let result = FollowRepository::follow(&store, user.id, user.id).await;
        assert!(
            matches!(result, Err(RepoError::CheckViolation(c)) if c == "user_followers_no_self_follow")
        );
        let (followers, total) = FollowRepository::followers(&store, user.id, 10, 0).await.unwrap();
        assert!(followers.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_delete_post_cascades() {
        let store = MemoryStore::new();
        let user = UserRepository::create(&store, new_user("bob")).await.unwrap();
        let post = PostRepository::create(&store, new_post("hello", user.id)).await.unwrap();
        CommentRepository::create(&store, post.id, user.id, "first").await.unwrap();
        LikeRepository::toggle(&store, post.id, user.id).await.unwrap();

        assert!(PostRepository::delete(&store, post.id, user.id).await.unwrap());
        assert!(CommentRepository::list_by_post(&store, post.id).await.unwrap().is_empty());
        assert_eq!(store.count_by_post(post.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_requires_owner() {
        let store = MemoryStore::new();
        let owner = UserRepository::create(&store, new_user("owner")).await.unwrap();
        let other = UserRepository::create(&store, new_user("other")).await.unwrap();
        let post = PostRepository::create(&store, new_post("mine", owner.id)).await.unwrap();

        assert!(!PostRepository::delete(&store, post.id, other.id).await.unwrap());
        assert!(PostRepository::find_by_id(&store, post.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_like_toggle_flips() {
        let store = MemoryStore::new();
        let user = UserRepository::create(&store, new_user("carol")).await.unwrap();
        let post = PostRepository::create(&store, new_post("likeable", user.id)).await.unwrap();

        assert!(store.toggle(post.id, user.id).await.unwrap());
        assert_eq!(store.count_by_post(post.id).await.unwrap(), 1);
        assert!(!store.toggle(post.id, user.id).await.unwrap());
        assert_eq!(store.count_by_post(post.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_like_missing_post_is_fk_violation() {
        let store = MemoryStore::new();
        let user = UserRepository::create(&store, new_user("dave")).await.unwrap();
        let result = store.toggle(Uuid::new_v4(), user.id).await;
        assert!(matches!(result, Err(RepoError::ForeignKeyViolation(_))));
    }

    #[tokio::test]
    async fn test_follow_is_idempotent() {
        let store = MemoryStore::new();
        let a = UserRepository::create(&store, new_user("a_user")).await.unwrap();
        let b = UserRepository::create(&store, new_user("b_user")).await.unwrap();

        assert!(store.follow(a.id, b.id).await.unwrap());
        assert!(!store.follow(a.id, b.id).await.unwrap());

        let (followers, total) = store.followers(b.id, 10, 0).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(followers[0].id, a.id);

        assert!(store.unfollow(a.id, b.id).await.unwrap());
        assert!(!store.unfollow(a.id, b.id).await.unwrap());
    }
}
